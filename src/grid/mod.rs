//! Structured background grid: node layout, search template and the node
//! arena.

mod node;
pub(crate) mod partition;
mod space;
mod template;

pub use node::{Node, Region, TimeLevel, TIME_LEVELS};
pub use partition::Partition;
pub use space::Space;
pub use template::SearchTemplate;
