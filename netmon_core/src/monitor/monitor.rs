use super::sink::{DiagnosticSink, DisplaySink, PacketEvent};
use crate::capture::FrameSource;
use crate::classify::{Classification, Classifier};
use crate::decode::{decode_ethernet, DecodeError};
use crate::error::Result;
use crate::registry::AddressRegistry;
use crate::stats::{Statistics, StatsSnapshot};
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};

/// 监控循环状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// 没有待处理的帧
    Idle,
    /// 正在处理一帧
    Processing,
}

/// 单帧处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// 完成分类并计数（包括未知以太网类型）
    Classified(Classification),
    /// 以太网层或更深层解码失败，帧被丢弃
    Dropped(DecodeError),
}

impl FrameOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, FrameOutcome::Dropped(_))
    }
}

/// 监控循环，独占统计和两个地址集合
pub struct Monitor<S, D, G> {
    source: S,
    display: D,
    diagnostics: G,
    classifier: Classifier,
    stats: Statistics,
    macs: AddressRegistry,
    ips: AddressRegistry,
    state: MonitorState,
}

impl<S, D, G> Monitor<S, D, G>
where
    S: FrameSource,
    D: DisplaySink,
    G: DiagnosticSink,
{
    pub fn new(source: S, display: D, diagnostics: G) -> Self {
        Self::with_classifier(source, display, diagnostics, Classifier::default())
    }

    pub fn with_classifier(source: S, display: D, diagnostics: G, classifier: Classifier) -> Self {
        Self {
            source,
            display,
            diagnostics,
            classifier,
            stats: Statistics::new(),
            macs: AddressRegistry::new("MAC"),
            ips: AddressRegistry::new("IP"),
            state: MonitorState::Idle,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn mac_registry(&self) -> &AddressRegistry {
        &self.macs
    }

    pub fn ip_registry(&self) -> &AddressRegistry {
        &self.ips
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn diagnostics(&self) -> &G {
        &self.diagnostics
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.get_snapshot(self.macs.len(), self.ips.len())
    }

    pub fn into_parts(self) -> (S, D, G) {
        (self.source, self.display, self.diagnostics)
    }

    /// 一次循环：轮询一帧（可能没有），然后推送统计快照
    ///
    /// 只有帧来源的错误会返回给调用方，解码错误在内部处理。
    pub fn step(&mut self) -> Result<Option<FrameOutcome>> {
        let frame = self.source.poll_frame()?;

        let outcome = match frame {
            Some(frame) if !frame.is_empty() => {
                self.state = MonitorState::Processing;
                let outcome = self.process_frame(&frame);
                self.state = MonitorState::Idle;
                Some(outcome)
            }
            _ => None,
        };

        let snapshot = self.snapshot();
        self.display.on_stats_snapshot(&snapshot);
        Ok(outcome)
    }

    /// 循环直到取消标志被置位
    pub fn run(&mut self, cancel: &AtomicBool) -> Result<()> {
        info!("监控循环开始");
        while !cancel.load(Ordering::Relaxed) {
            self.step()?;
        }
        info!("监控循环结束: total_bytes={}, macs={}, ips={}",
              self.stats.total_bytes(), self.macs.len(), self.ips.len());
        Ok(())
    }

    /// 解码并记录一帧，按已到达的最深层计数
    pub fn process_frame(&mut self, frame: &[u8]) -> FrameOutcome {
        let eth = match decode_ethernet(frame) {
            Ok(eth) => eth,
            Err(e) => {
                debug!("丢弃数据帧: {}", e);
                return FrameOutcome::Dropped(e);
            }
        };

        let mac_src = eth.src_text();
        let mac_dest = eth.dest_text();
        self.observe_mac(&mac_src);
        self.observe_mac(&mac_dest);

        let classified = match self.classifier.classify(&eth, eth.payload(frame)) {
            Ok(classified) => classified,
            Err(e) => {
                // 以太网层已到达，只计字节数
                self.stats.record_bytes(frame.len());
                debug!("丢弃数据帧: {}", e);
                return FrameOutcome::Dropped(e);
            }
        };

        let classification = classified.classification;
        self.stats.record(&classification, frame.len());

        if let Some(link_label) = classification.link_label() {
            let event = PacketEvent {
                mac_dest,
                mac_src,
                link_label,
                sub_label: classification.sub_label(),
            };
            self.display.on_packet_event(&event);
        }

        if let Some(message) = classification.anomaly() {
            self.diagnostics.report_anomaly(&message);
        }

        if let Some((ip_src, ip_dest)) = classified.network.ip_addresses() {
            self.observe_ip(&ip_src);
            self.observe_ip(&ip_dest);
        }

        trace!("数据帧处理完成: {:?}, len={}", classification, frame.len());
        FrameOutcome::Classified(classification)
    }

    fn observe_mac(&mut self, mac: &str) {
        if self.macs.observe(mac).is_first_seen() {
            self.display.on_new_mac(mac);
        }
    }

    fn observe_ip(&mut self, ip: &str) {
        if self.ips.observe(ip).is_first_seen() {
            self.display.on_new_ip(ip);
        }
    }
}
