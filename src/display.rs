use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, error};
use netmon_core::{DisplaySink, PacketEvent, StatsSnapshot};
use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

// 布局常量
const MIN_STAT_DISPLAY: u16 = 5;
const MIN_IP_SPACING: usize = 20;
const MIN_MAC_SPACING: usize = 20;
const MAX_MAC_SPACING_FACTOR: f64 = 0.35;
const MIN_PROTOCOL_SPACING: usize = 10;
const MAX_PROTOCOL_SPACING_FACTOR: f64 = 0.15;

/// 三个窗格的列宽
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub mac_width: usize,
    pub protocol_width: usize,
    pub packet_pane: usize,
    pub mac_pane: usize,
    pub ip_pane: usize,
}

impl Layout {
    pub fn for_width(cols: u16) -> Self {
        let cols = cols as usize;
        let usable = cols.saturating_sub(1) as f64;

        let mac_width = ((usable * MAX_MAC_SPACING_FACTOR * 0.5) as usize).max(MIN_MAC_SPACING);
        let protocol_width = ((usable * MAX_PROTOCOL_SPACING_FACTOR * 0.5) as usize).max(MIN_PROTOCOL_SPACING);
        let packet_pane = mac_width * 2 + protocol_width * 2 + 2;
        let mac_pane = (cols.saturating_sub(packet_pane) / 2).max(MIN_MAC_SPACING);
        let ip_pane = cols.saturating_sub(packet_pane + mac_pane + 5).max(MIN_IP_SPACING);

        Self { mac_width, protocol_width, packet_pane, mac_pane, ip_pane }
    }

    pub fn packet_line(&self, event: &PacketEvent) -> String {
        format!(
            "{:<mw$} {:<mw$} {:<pw$} {:<pw$}",
            event.mac_dest,
            event.mac_src,
            event.link_label,
            event.sub_label,
            mw = self.mac_width,
            pw = self.protocol_width,
        )
    }

    pub fn header_line(&self) -> String {
        format!(
            " {:<mw$} {:<mw$} {:<pw$} {:<pw$}  {:<mp$}  {:<ip$}",
            "MAC Destination",
            "MAC Source",
            "Protocol",
            "Type",
            "MAC Addresses",
            "IP Addresses",
            mw = self.mac_width,
            pw = self.protocol_width,
            mp = self.mac_pane,
            ip = self.ip_pane,
        )
    }
}

/// 统计区的四行文本
pub fn stat_lines(snapshot: &StatsSnapshot) -> [String; 4] {
    let c = &snapshot.counters;
    let rate = match snapshot.bytes_per_second {
        Some(rate) => format!("{} bytes/sec ({} bytes in {}s)", rate, snapshot.total_bytes, snapshot.elapsed_seconds),
        None => format!("- ({} bytes)", snapshot.total_bytes),
    };
    [
        format!("ARP: {:<10} IPv4: {:<10} IPv6: {:<10}", c.arp, c.ipv4, c.ipv6),
        format!("TCP: {:<10} UDP: {:<10} IGMP: {:<10} ICMP: {:<10}", c.tcp, c.udp, c.igmp, c.icmp),
        format!("Reply: {:<8} Request: {:<8}", c.arp_reply, c.arp_request),
        format!("Rate: {}", rate),
    ]
}

fn fit(text: &str, width: usize) -> String {
    let mut line: String = text.chars().take(width).collect();
    let pad = width.saturating_sub(line.chars().count());
    line.extend(std::iter::repeat(' ').take(pad));
    line
}

/// 终端显示：上方统计，下方数据包、MAC、IP 三个滚动窗格
pub struct TerminalDisplay {
    out: Stdout,
    packets: VecDeque<PacketEvent>,
    max_packet_lines: usize,
    macs: Vec<String>,
    ips: Vec<String>,
    snapshot: Option<StatsSnapshot>,
    refresh: Duration,
    last_draw: Option<Instant>,
}

impl TerminalDisplay {
    pub fn new(refresh: Duration, max_packet_lines: usize) -> io::Result<Self> {
        let mut out = io::stdout();
        queue!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        out.flush()?;
        Ok(Self {
            out,
            packets: VecDeque::with_capacity(max_packet_lines),
            max_packet_lines,
            macs: Vec::new(),
            ips: Vec::new(),
            snapshot: None,
            refresh,
            last_draw: None,
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let layout = Layout::for_width(cols);
        let pane_rows = rows.saturating_sub(MIN_STAT_DISPLAY) as usize;

        queue!(self.out, Clear(ClearType::All))?;
        if let Some(snapshot) = &self.snapshot {
            for (row, line) in stat_lines(snapshot).iter().enumerate() {
                queue!(self.out, MoveTo(1, row as u16), Print(fit(line, cols as usize)))?;
            }
        }

        queue!(
            self.out,
            MoveTo(0, MIN_STAT_DISPLAY - 1),
            SetAttribute(Attribute::Reverse),
            Print(fit(&layout.header_line(), cols as usize)),
            SetAttribute(Attribute::Reset),
        )?;

        // 每个窗格只显示最新的若干行
        let packets: Vec<String> = self
            .packets
            .iter()
            .skip(self.packets.len().saturating_sub(pane_rows))
            .map(|event| layout.packet_line(event))
            .collect();
        let macs = &self.macs[self.macs.len().saturating_sub(pane_rows)..];
        let ips = &self.ips[self.ips.len().saturating_sub(pane_rows)..];

        for row in 0..pane_rows {
            let packet = packets.get(row).map(String::as_str).unwrap_or("");
            let mac = macs.get(row).map(String::as_str).unwrap_or("");
            let ip = ips.get(row).map(String::as_str).unwrap_or("");
            let line = format!(
                " {}  {}  {}",
                fit(packet, layout.packet_pane),
                fit(mac, layout.mac_pane),
                fit(ip, layout.ip_pane)
            );
            queue!(self.out, MoveTo(0, MIN_STAT_DISPLAY + row as u16), Print(fit(&line, cols as usize)))?;
        }

        self.out.flush()
    }
}

impl DisplaySink for TerminalDisplay {
    fn on_packet_event(&mut self, event: &PacketEvent) {
        if self.packets.len() == self.max_packet_lines {
            self.packets.pop_front();
        }
        self.packets.push_back(event.clone());
    }

    fn on_new_mac(&mut self, mac: &str) {
        self.macs.push(mac.to_string());
    }

    fn on_new_ip(&mut self, ip: &str) {
        self.ips.push(ip.to_string());
    }

    fn on_stats_snapshot(&mut self, snapshot: &StatsSnapshot) {
        self.snapshot = Some(snapshot.clone());
        let due = self.last_draw.map_or(true, |t| t.elapsed() >= self.refresh);
        if due {
            if let Err(e) = self.draw() {
                error!("终端刷新失败: {}", e);
            }
            self.last_draw = Some(Instant::now());
        }
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = queue!(self.out, Show, LeaveAlternateScreen);
        let _ = self.out.flush();
    }
}

/// 按刷新间隔输出一行 JSON 快照
pub struct JsonDisplay<W: Write> {
    out: W,
    refresh: Duration,
    last_emit: Option<Instant>,
}

impl<W: Write> JsonDisplay<W> {
    pub fn new(out: W, refresh: Duration) -> Self {
        Self { out, refresh, last_emit: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for JsonDisplay<W> {
    fn on_packet_event(&mut self, event: &PacketEvent) {
        debug!("{} -> {} {} {}", event.mac_src, event.mac_dest, event.link_label, event.sub_label);
    }

    fn on_new_mac(&mut self, mac: &str) {
        debug!("新MAC地址: {}", mac);
    }

    fn on_new_ip(&mut self, ip: &str) {
        debug!("新IP地址: {}", ip);
    }

    fn on_stats_snapshot(&mut self, snapshot: &StatsSnapshot) {
        let due = self.last_emit.map_or(true, |t| t.elapsed() >= self.refresh);
        if !due {
            return;
        }
        self.last_emit = Some(Instant::now());
        let result = serde_json::to_writer(&mut self.out, snapshot)
            .map_err(io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            error!("写出JSON快照失败: {}", e);
        }
    }
}
