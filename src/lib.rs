pub mod error;
pub mod flow;
pub mod geometry;
pub mod grid;
pub mod math;
pub mod operations;

pub use error::{ImmerseError, Result};
