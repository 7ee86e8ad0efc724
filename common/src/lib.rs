mod config;
mod constants;
mod error;
mod moves;
mod replay_store;

pub mod line_reader;
pub mod parser;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use moves::*;
pub use replay_store::*;
