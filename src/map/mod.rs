mod parse;

pub use parse::{DEFAULT_MAP, MapError, default_map, load_map, parse_map};
