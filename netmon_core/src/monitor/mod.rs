pub use self::monitor::{FrameOutcome, Monitor, MonitorState};
pub use self::sink::{DiagnosticSink, DisplaySink, LogDiagnostics, PacketEvent};

#[allow(clippy::module_inception)]
mod monitor;
mod sink;
