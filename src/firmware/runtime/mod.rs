mod consumer;
mod context;

pub use consumer::{run_consumer, ConsumerLoop, ConsumerStep};
pub use context::NodeContext;
