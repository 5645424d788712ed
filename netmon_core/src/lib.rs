pub mod config;
pub mod error;
pub mod decode;
pub mod classify;
pub mod registry;
pub mod stats;
pub mod monitor;
pub mod capture;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, MonitorError};
pub use decode::{decode_ethernet, DecodeError, DecodeResult, EthernetHeader};
pub use classify::{classify, ArpOperation, Classification, Classifier, Transport};
pub use registry::{AddressRegistry, Observation};
pub use stats::{bytes_per_second, ProtocolCounters, Statistics, StatsSnapshot};
pub use monitor::{DiagnosticSink, DisplaySink, FrameOutcome, LogDiagnostics, Monitor, MonitorState, PacketEvent};
pub use capture::{FrameSource, MemorySource};
#[cfg(target_os = "linux")]
pub use capture::RawSocketSource;
pub use bytes::Bytes;
