//! Game module

pub mod cell;
pub mod difficulty;
pub mod direction;
pub mod food;
pub mod game_loop;
pub mod input;
pub mod particles;
pub mod session;
pub mod snake;
pub mod timing;

pub use cell::GridCell;
pub use difficulty::Difficulty;
pub use direction::Direction;
pub use food::Food;
pub use session::GameSession;
pub use snake::Snake;
