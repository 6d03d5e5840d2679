use heapless::String;

use crate::firmware::{
    clock::ClockSource,
    config::{NodeConfig, STATS_CAPACITY, TOPIC_MAX},
    handoff::HandoffChannel,
    ingest::ConfigIngest,
    net::TrialRequests,
    producer::RangingProducer,
    session::{SessionEvents, SessionFlag},
    stats::SharedStats,
    telemetry::NodeCounters,
};

/// State shared by the producer and consumer contexts. Both borrow it; neither owns it.
pub struct NodeContext<C, const N: usize = STATS_CAPACITY> {
    pub stats: SharedStats<C, N>,
    pub handoff: HandoffChannel,
    pub session: SessionFlag,
    pub trials: TrialRequests,
    pub counters: NodeCounters,
    pub config: NodeConfig,
    config_topic: String<TOPIC_MAX>,
}

impl<C: ClockSource, const N: usize> NodeContext<C, N> {
    pub fn new(clock: C, config: NodeConfig) -> Self {
        Self {
            stats: SharedStats::new(clock),
            handoff: HandoffChannel::new(),
            session: SessionFlag::new(),
            trials: TrialRequests::new(),
            counters: NodeCounters::new(),
            config_topic: config.config_topic(),
            config,
        }
    }

    pub fn producer(&self) -> RangingProducer<'_, C, N> {
        RangingProducer::new(
            &self.stats,
            &self.handoff,
            &self.counters,
            self.config.distance_bounds,
        )
    }

    /// Handler for the MQTT client's event callback.
    pub fn session_events(&self) -> SessionEvents<'_> {
        SessionEvents::new(
            &self.session,
            ConfigIngest::new(&self.trials, &self.counters),
            self.config_topic.as_str(),
        )
    }
}
