use crate::classify::{ArpOperation, Classification, Transport};
use serde::Serialize;
use std::time::{Duration, Instant};

/// 各协议计数，只增不减
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProtocolCounters {
    // 以太网类型
    pub arp: u64,
    pub ipv4: u64,
    pub ipv6: u64,
    // 传输层协议
    pub tcp: u64,
    pub udp: u64,
    pub icmp: u64,
    pub igmp: u64,
    // ARP 操作
    pub arp_request: u64,
    pub arp_reply: u64,
}

/// 统计聚合器，由监控循环独占
#[derive(Debug)]
pub struct Statistics {
    counters: ProtocolCounters,
    /// 通过以太网解码的帧的总字节数
    total_bytes: u64,
    start_time: Instant,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    pub fn new() -> Self {
        Self::with_start_time(Instant::now())
    }

    pub fn with_start_time(start_time: Instant) -> Self {
        Self {
            counters: ProtocolCounters::default(),
            total_bytes: 0,
            start_time,
        }
    }

    /// 每帧调用一次，按分类累加对应计数器
    pub fn record(&mut self, classification: &Classification, frame_len: usize) {
        self.record_bytes(frame_len);

        let c = &mut self.counters;
        match classification {
            Classification::Arp(op) => {
                c.arp += 1;
                match op {
                    ArpOperation::Request => c.arp_request += 1,
                    ArpOperation::Reply => c.arp_reply += 1,
                    ArpOperation::Unknown(_) => {}
                }
            }
            Classification::Ipv4(transport) => {
                c.ipv4 += 1;
                Self::record_transport(c, transport);
            }
            Classification::Ipv6(transport) => {
                c.ipv6 += 1;
                Self::record_transport(c, transport);
            }
            Classification::Unknown(_) => {}
        }
    }

    /// 子头部解码失败的帧只计字节数
    pub fn record_bytes(&mut self, frame_len: usize) {
        self.total_bytes += frame_len as u64;
    }

    fn record_transport(c: &mut ProtocolCounters, transport: &Transport) {
        match transport {
            Transport::Tcp => c.tcp += 1,
            Transport::Udp => c.udp += 1,
            Transport::Icmp => c.icmp += 1,
            Transport::Igmp => c.igmp += 1,
            Transport::Unknown(_) => {}
        }
    }

    pub fn counters(&self) -> &ProtocolCounters {
        &self.counters
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.start_time)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed().as_secs()
    }

    /// 字节/秒，运行不足一秒时为 None
    pub fn throughput(&self) -> Option<u64> {
        bytes_per_second(self.total_bytes, self.elapsed_seconds())
    }

    pub fn get_snapshot(&self, mac_count: usize, ip_count: usize) -> StatsSnapshot {
        let elapsed_seconds = self.elapsed_seconds();
        StatsSnapshot {
            counters: self.counters,
            total_bytes: self.total_bytes,
            elapsed_seconds,
            bytes_per_second: bytes_per_second(self.total_bytes, elapsed_seconds),
            mac_count,
            ip_count,
        }
    }
}

pub fn bytes_per_second(total_bytes: u64, elapsed_seconds: u64) -> Option<u64> {
    if elapsed_seconds == 0 {
        return None;
    }
    Some(total_bytes / elapsed_seconds)
}

/// 推送给显示端的统计快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub counters: ProtocolCounters,
    pub total_bytes: u64,
    pub elapsed_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_second: Option<u64>,
    pub mac_count: usize,
    pub ip_count: usize,
}
