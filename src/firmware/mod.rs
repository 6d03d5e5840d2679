pub mod clock;
pub mod config;
pub mod handoff;
pub mod ingest;
pub mod net;
pub mod producer;
pub mod runtime;
pub mod session;
pub mod stats;
pub mod storage;
pub mod telemetry;
pub mod time;
pub mod types;
