use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use bytes::{Bytes, BytesMut};
use netmon_core::{DisplaySink, LogDiagnostics, MemorySource, Monitor, PacketEvent, StatsSnapshot};
use std::hint::black_box;
use std::time::Duration;

// 只计数的显示端，排除渲染开销
#[derive(Default)]
struct NullDisplay {
    events: u64,
}

impl DisplaySink for NullDisplay {
    fn on_packet_event(&mut self, _event: &PacketEvent) {
        self.events += 1;
    }
    fn on_new_mac(&mut self, _mac: &str) {}
    fn on_new_ip(&mut self, _ip: &str) {}
    fn on_stats_snapshot(&mut self, _snapshot: &StatsSnapshot) {}
}

fn ethernet(src_host: u8, ether_type: u16) -> BytesMut {
    let mut data = BytesMut::with_capacity(128);
    data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); // 目的MAC
    data.extend_from_slice(&[0x66, 0x77, 0x88, 0x99, 0xaa, src_host]); // 源MAC
    data.extend_from_slice(&ether_type.to_be_bytes());
    data
}

fn ipv4_frame(src_host: u8, protocol: u8) -> Bytes {
    let mut data = ethernet(src_host, 0x0800);
    data.extend_from_slice(&[
        0x45, 0x00, 0x00, 0x28, // 版本、头长度、总长度
        0x00, 0x01, 0x00, 0x00, // 标识、标志和片偏移
        0x40, protocol, 0x00, 0x00, // TTL、协议、校验和
        10, 0, 0, src_host, // 源IP
        10, 0, 0, 1, // 目的IP
    ]);
    data.resize(data.len() + 20, 0);
    data.freeze()
}

fn ipv6_frame(src_host: u8) -> Bytes {
    let mut data = ethernet(src_host, 0x86dd);
    data.extend_from_slice(&[0x60, 0, 0, 0, 0x00, 0x08, 17, 64]);
    let mut src = [0u8; 16];
    src[0] = 0xfe;
    src[1] = 0x80;
    src[15] = src_host;
    data.extend_from_slice(&src);
    let mut dest = [0u8; 16];
    dest[0] = 0xff;
    dest[1] = 0x02;
    dest[15] = 1;
    data.extend_from_slice(&dest);
    data.resize(data.len() + 8, 0);
    data.freeze()
}

fn arp_frame(src_host: u8) -> Bytes {
    let mut data = ethernet(src_host, 0x0806);
    data.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    data.resize(data.len() + 20, 0);
    data.freeze()
}

// 混合流量：TCP、UDP、ICMP、IPv6、ARP 以及截断帧
fn mixed_traffic(count: usize) -> Vec<Bytes> {
    (0..count)
        .map(|i| {
            let host = (i % 64) as u8;
            match i % 6 {
                0 | 1 => ipv4_frame(host, 6),
                2 => ipv4_frame(host, 17),
                3 => ipv6_frame(host),
                4 => arp_frame(host),
                _ => ipv4_frame(host, 1).slice(..20),
            }
        })
        .collect()
}

fn bench_monitor_pipeline(c: &mut Criterion) {
    let frames = mixed_traffic(4096);
    let mut group = c.benchmark_group("monitor_pipeline");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("step_4096_mixed", |b| {
        b.iter_batched(
            || Monitor::new(MemorySource::from_frames(frames.clone()), NullDisplay::default(), LogDiagnostics::new()),
            |mut monitor| {
                while monitor.source().remaining() > 0 {
                    black_box(monitor.step().unwrap());
                }
                black_box(monitor.statistics().total_bytes())
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("process_frame_ipv4_tcp", |b| {
        let frame = ipv4_frame(7, 6);
        let mut monitor = Monitor::new(MemorySource::new(), NullDisplay::default(), LogDiagnostics::new());
        b.iter(|| black_box(monitor.process_frame(black_box(&frame))))
    });

    group.finish();
}

criterion_group!(benches, bench_monitor_pipeline);
criterion_main!(benches);
