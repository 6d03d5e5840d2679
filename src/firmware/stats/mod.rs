mod ring;
mod shared;

pub use ring::{StatsRingBuffer, StatsSnapshot};
pub use shared::SharedStats;
