mod packet;
mod run;

pub use packet::{DoorSprite, RenderPacket, ViewPoint, build_frame, door_in_view, view_offset};
pub use run::{FrameHost, FrameLoop, Pacing, StopHandle};
