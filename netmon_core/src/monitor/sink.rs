use crate::stats::StatsSnapshot;
use log::warn;

/// 一帧分类完成后推送给显示端的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketEvent {
    pub mac_dest: String,
    pub mac_src: String,
    pub link_label: &'static str,
    pub sub_label: &'static str,
}

/// 显示端
pub trait DisplaySink {
    fn on_packet_event(&mut self, event: &PacketEvent);

    /// 仅在地址首次出现时调用
    fn on_new_mac(&mut self, mac: &str);

    fn on_new_ip(&mut self, ip: &str);

    /// 每次循环都会调用，无论是否收到帧
    fn on_stats_snapshot(&mut self, snapshot: &StatsSnapshot);
}

/// 诊断端，接收未知协议号等非致命异常
pub trait DiagnosticSink {
    fn report_anomaly(&mut self, message: &str);
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn on_packet_event(&mut self, event: &PacketEvent) {
        (**self).on_packet_event(event)
    }

    fn on_new_mac(&mut self, mac: &str) {
        (**self).on_new_mac(mac)
    }

    fn on_new_ip(&mut self, ip: &str) {
        (**self).on_new_ip(ip)
    }

    fn on_stats_snapshot(&mut self, snapshot: &StatsSnapshot) {
        (**self).on_stats_snapshot(snapshot)
    }
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn report_anomaly(&mut self, message: &str) {
        (**self).report_anomaly(message)
    }
}

/// 把异常写入日志，同时计数
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    reported: u64,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> u64 {
        self.reported
    }
}

impl DiagnosticSink for LogDiagnostics {
    fn report_anomaly(&mut self, message: &str) {
        self.reported += 1;
        warn!("{}", message);
    }
}
