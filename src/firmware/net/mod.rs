mod engine;
mod machine;
mod manager;
mod trial;
mod types;

pub use engine::NetEngine;
pub use manager::{Connectivity, NetworkResilienceManager};
pub use trial::TrialRequests;
pub use types::{ConnectionAttemptState, LinkError, NetEvent, NetOutcome, NetPhase, NetSnapshot};
