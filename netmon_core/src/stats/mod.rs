pub use self::stats::{bytes_per_second, ProtocolCounters, Statistics, StatsSnapshot};

#[allow(clippy::module_inception)]
mod stats;
