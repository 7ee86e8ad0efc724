pub mod board;

pub use board::BoardRenderer;
