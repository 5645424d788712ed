use netmon_core::{
    Classification, DiagnosticSink, DisplaySink, FrameOutcome, MemorySource, Monitor, MonitorError, MonitorState,
    PacketEvent, ProtocolCounters, StatsSnapshot, Transport,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const MAC_A: [u8; 6] = [0x00, 0x1a, 0x2b, 0x3c, 0x4d, 0x5e];
const MAC_B: [u8; 6] = [0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb];

#[derive(Default)]
struct RecordingDisplay {
    events: Vec<PacketEvent>,
    new_macs: Vec<String>,
    new_ips: Vec<String>,
    snapshots: Vec<StatsSnapshot>,
}

impl DisplaySink for RecordingDisplay {
    fn on_packet_event(&mut self, event: &PacketEvent) {
        self.events.push(event.clone());
    }

    fn on_new_mac(&mut self, mac: &str) {
        self.new_macs.push(mac.to_string());
    }

    fn on_new_ip(&mut self, ip: &str) {
        self.new_ips.push(ip.to_string());
    }

    fn on_stats_snapshot(&mut self, snapshot: &StatsSnapshot) {
        self.snapshots.push(snapshot.clone());
    }
}

// 空转时每次循环都会推送快照，长时间运行的测试只计数
#[derive(Default)]
struct CountingDisplay {
    events: usize,
    snapshots: usize,
}

impl DisplaySink for CountingDisplay {
    fn on_packet_event(&mut self, _event: &PacketEvent) {
        self.events += 1;
    }

    fn on_new_mac(&mut self, _mac: &str) {}

    fn on_new_ip(&mut self, _ip: &str) {}

    fn on_stats_snapshot(&mut self, _snapshot: &StatsSnapshot) {
        self.snapshots += 1;
    }
}

#[derive(Default)]
struct RecordingDiagnostics {
    anomalies: Vec<String>,
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report_anomaly(&mut self, message: &str) {
        self.anomalies.push(message.to_string());
    }
}

type TestMonitor = Monitor<MemorySource, RecordingDisplay, RecordingDiagnostics>;

fn new_monitor(frames: Vec<Vec<u8>>) -> TestMonitor {
    Monitor::new(
        MemorySource::from_frames(frames),
        RecordingDisplay::default(),
        RecordingDiagnostics::default(),
    )
}

// 创建以太网头部
fn ethernet(dest: [u8; 6], src: [u8; 6], ether_type: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&dest);
    data.extend_from_slice(&src);
    data.extend_from_slice(&ether_type.to_be_bytes());
    data
}

// 创建 IPv4 数据包，协议号可指定
fn create_ipv4_packet(protocol: u8, src_ip: [u8; 4], dst_ip: [u8; 4]) -> Vec<u8> {
    let mut data = ethernet(MAC_A, MAC_B, 0x0800);
    data.extend_from_slice(&[
        0x45, 0x00, 0x00, 0x1c,               // 版本/头长度, 服务类型, 总长度(28)
        0x00, 0x01, 0x00, 0x00,               // 标识, 标志和片偏移
        0x40, protocol, 0x00, 0x00,           // TTL, 协议, 校验和
    ]);
    data.extend_from_slice(&src_ip);
    data.extend_from_slice(&dst_ip);
    data.extend_from_slice(&[0x00, 0x35, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00]);  // 8字节传输层头部
    data
}

// 创建 IPv6 数据包
fn create_ipv6_packet(next_header: u8) -> Vec<u8> {
    let mut data = ethernet(MAC_A, MAC_B, 0x86dd);
    data.extend_from_slice(&[0x60, 0x00, 0x00, 0x00, 0x00, 0x08, next_header, 0x40]);
    let mut src = [0u8; 16];
    src[0] = 0xfe;
    src[1] = 0x80;
    src[15] = 0x01;
    let mut dst = [0u8; 16];
    dst[15] = 0x01;
    data.extend_from_slice(&src);
    data.extend_from_slice(&dst);
    data
}

// 创建 ARP 数据包
fn create_arp_packet(operation: u16) -> Vec<u8> {
    let mut data = ethernet([0xff; 6], MAC_B, 0x0806);
    data.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04]);
    data.extend_from_slice(&operation.to_be_bytes());
    data.extend_from_slice(&MAC_B);
    data.extend_from_slice(&[192, 168, 0, 1]);
    data.extend_from_slice(&[0u8; 6]);
    data.extend_from_slice(&[192, 168, 0, 2]);
    data
}

#[test]
fn test_short_buffers_change_nothing() {
    for len in 0..14 {
        let mut monitor = new_monitor(vec![vec![0xab; len]]);
        let outcome = monitor.step().unwrap();
        if len == 0 {
            assert_eq!(outcome, None);
        } else {
            assert!(outcome.unwrap().is_dropped());
        }
        assert_eq!(*monitor.statistics().counters(), ProtocolCounters::default());
        assert_eq!(monitor.statistics().total_bytes(), 0);
        assert!(monitor.mac_registry().is_empty());
        assert!(monitor.display().events.is_empty());
    }
}

#[test]
fn test_ipv4_tcp_increments_exactly_ip4_and_tcp() {
    let frame = create_ipv4_packet(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    let mut monitor = new_monitor(vec![frame.clone(), frame.clone(), frame.clone()]);

    for i in 1..=3u64 {
        monitor.step().unwrap();
        assert_eq!(
            *monitor.statistics().counters(),
            ProtocolCounters { ipv4: i, tcp: i, ..Default::default() }
        );
    }
    assert_eq!(monitor.statistics().total_bytes(), 3 * frame.len() as u64);
    assert!(monitor.diagnostics().anomalies.is_empty());

    let display = monitor.display();
    assert_eq!(display.events.len(), 3);
    assert_eq!(display.events[0], PacketEvent {
        mac_dest: "00:1a:2b:3c:4d:5e".to_string(),
        mac_src: "66:77:88:99:aa:bb".to_string(),
        link_label: "IPv4",
        sub_label: "TCP",
    });
    // 每个地址只通知一次
    assert_eq!(display.new_macs, vec!["66:77:88:99:aa:bb", "00:1a:2b:3c:4d:5e"]);
    assert_eq!(display.new_ips, vec!["10.0.0.1", "10.0.0.2"]);
}

#[test]
fn test_arp_unknown_operation_reports_anomaly() {
    let mut monitor = new_monitor(vec![create_arp_packet(3)]);
    let outcome = monitor.step().unwrap();
    assert!(matches!(outcome, Some(FrameOutcome::Classified(Classification::Arp(_)))));

    let counters = monitor.statistics().counters();
    assert_eq!(counters.arp, 1);
    assert_eq!(counters.arp_request, 0);
    assert_eq!(counters.arp_reply, 0);
    assert_eq!(monitor.diagnostics().anomalies.len(), 1);
    assert_eq!(monitor.display().events[0].sub_label, "UNKNOWN");
    // ARP 不登记 IP 地址
    assert!(monitor.ip_registry().is_empty());
}

#[test]
fn test_arp_request_and_reply() {
    let mut monitor = new_monitor(vec![create_arp_packet(1), create_arp_packet(2)]);
    monitor.step().unwrap();
    monitor.step().unwrap();
    let counters = monitor.statistics().counters();
    assert_eq!((counters.arp, counters.arp_request, counters.arp_reply), (2, 1, 1));
    let labels: Vec<&str> = monitor.display().events.iter().map(|e| e.sub_label).collect();
    assert_eq!(labels, vec!["REQUEST", "REPLY"]);
}

#[test]
fn test_udp_then_truncated_frame() {
    let udp = create_ipv4_packet(17, [192, 168, 1, 1], [192, 168, 1, 2]);
    let mut monitor = new_monitor(vec![udp.clone(), vec![0u8; 10]]);

    monitor.step().unwrap();
    let after_first = *monitor.statistics().counters();
    let bytes_after_first = monitor.statistics().total_bytes();
    assert_eq!(after_first, ProtocolCounters { ipv4: 1, udp: 1, ..Default::default() });

    let outcome = monitor.step().unwrap().unwrap();
    assert!(outcome.is_dropped());
    assert_eq!(*monitor.statistics().counters(), after_first);
    assert_eq!(monitor.statistics().total_bytes(), bytes_after_first);
    assert_eq!(monitor.state(), MonitorState::Idle);
}

#[test]
fn test_truncated_ip_header_counts_bytes_only() {
    let mut frame = create_ipv4_packet(6, [10, 0, 0, 1], [10, 0, 0, 2]);
    frame.truncate(14 + 12);
    let mut monitor = new_monitor(vec![frame]);
    assert!(monitor.step().unwrap().unwrap().is_dropped());

    assert_eq!(*monitor.statistics().counters(), ProtocolCounters::default());
    assert_eq!(monitor.statistics().total_bytes(), 26);
    // 以太网层已解析，MAC 已登记
    assert_eq!(monitor.mac_registry().len(), 2);
    assert!(monitor.ip_registry().is_empty());
    assert!(monitor.display().events.is_empty());
}

#[test]
fn test_ipv4_unknown_protocol_still_counted() {
    let mut monitor = new_monitor(vec![create_ipv4_packet(0x84, [10, 0, 0, 1], [10, 0, 0, 2])]);
    monitor.step().unwrap();
    assert_eq!(*monitor.statistics().counters(), ProtocolCounters { ipv4: 1, ..Default::default() });
    assert_eq!(monitor.diagnostics().anomalies.len(), 1);
    assert_eq!(monitor.ip_registry().len(), 2);
}

#[test]
fn test_ipv6_icmp() {
    let mut monitor = new_monitor(vec![create_ipv6_packet(58), create_ipv6_packet(1)]);
    monitor.step().unwrap();
    monitor.step().unwrap();

    let counters = monitor.statistics().counters();
    assert_eq!((counters.ipv6, counters.icmp), (2, 1));
    assert_eq!(monitor.diagnostics().anomalies.len(), 1);
    let addrs: Vec<&str> = monitor.ip_registry().iter().collect();
    assert_eq!(addrs, vec!["fe80:0:0:0:0:0:0:1", "0:0:0:0:0:0:0:1"]);
    assert_eq!(monitor.display().events[0].link_label, "IPv6");
}

#[test]
fn test_unknown_ether_type_is_silent() {
    let mut frame = ethernet(MAC_A, MAC_B, 0x88cc);
    frame.extend_from_slice(&[0u8; 32]);
    let mut monitor = new_monitor(vec![frame]);
    let outcome = monitor.step().unwrap();
    assert_eq!(outcome, Some(FrameOutcome::Classified(Classification::Unknown(0x88cc))));
    assert_eq!(*monitor.statistics().counters(), ProtocolCounters::default());
    assert!(monitor.display().events.is_empty());
    assert!(monitor.diagnostics().anomalies.is_empty());
    assert_eq!(monitor.mac_registry().len(), 2);
}

#[test]
fn test_snapshot_every_iteration() {
    let frame = create_ipv4_packet(17, [10, 0, 0, 1], [10, 0, 0, 2]);
    let mut monitor = new_monitor(vec![frame]);
    for _ in 0..5 {
        monitor.step().unwrap();
    }
    let snapshots = &monitor.display().snapshots;
    assert_eq!(snapshots.len(), 5);
    assert!(snapshots.iter().all(|s| s.counters.udp == 1 && s.mac_count == 2 && s.ip_count == 2));
}

#[test]
fn test_source_unavailable_propagates() {
    let source = MemorySource::from_frames(vec![create_arp_packet(1)]).fail_when_drained();
    let mut monitor = Monitor::new(source, RecordingDisplay::default(), RecordingDiagnostics::default());
    let cancel = AtomicBool::new(false);

    let result = monitor.run(&cancel);
    assert!(matches!(result, Err(MonitorError::SourceUnavailable(_))));
    // 致命错误前处理过的帧仍然有效
    assert_eq!(monitor.statistics().counters().arp, 1);
}

#[test]
fn test_run_until_cancelled() {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();
    let handle = thread::spawn(move || {
        let frames = vec![create_ipv4_packet(6, [10, 0, 0, 1], [10, 0, 0, 2]); 4];
        let source = MemorySource::from_frames(frames);
        let mut monitor = Monitor::new(source, CountingDisplay::default(), RecordingDiagnostics::default());
        monitor.run(&flag)?;
        let (_, display, _) = monitor.into_parts();
        Ok::<_, MonitorError>(display)
    });

    thread::sleep(Duration::from_millis(50));
    cancel.store(true, Ordering::Relaxed);
    let display = handle.join().unwrap().unwrap();
    assert_eq!(display.events, 4);
    assert!(display.snapshots >= 4);
}

#[test]
fn test_snapshot_serializes() {
    let mut monitor = new_monitor(vec![create_ipv4_packet(2, [10, 0, 0, 1], [224, 0, 0, 1])]);
    monitor.step().unwrap();
    let json = serde_json::to_value(monitor.snapshot()).unwrap();
    assert_eq!(json["counters"]["igmp"], 1);
    assert_eq!(json["ip_count"], 2);
    assert_eq!(Classification::Ipv4(Transport::Igmp).sub_label(), "IGMP");
}
