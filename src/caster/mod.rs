mod columns;
mod dda;

pub use columns::{Column, cast_columns, cast_columns_into, column_angle};
pub use dda::{RayHit, Side, WallType, cast_ray};
