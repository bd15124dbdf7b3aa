pub mod command;
pub mod coord;
pub mod move_data;

pub use command::parse_move_command;
pub use coord::{BoardCoord, ParseCoordError};
pub use move_data::ParsedMove;
