//! Flow state representations and the gas model that converts between them.

mod model;
mod state;

pub use model::FlowModel;
pub use state::{Conservative, Primitive};
