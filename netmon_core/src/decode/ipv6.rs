use super::error::{ensure_len, DecodeResult, HeaderKind};
use super::format::ipv6_to_text;
use log::trace;

// IPv6相关常量
pub const IPV6_HEADER_SIZE: usize = 40;
const IPV6_VTF_OFFSET: usize = 0;  // 版本/流量类别/流标签
const IPV6_PAYLOAD_LEN_OFFSET: usize = 4;  // 负载长度偏移
const IPV6_NEXT_HEADER_OFFSET: usize = 6;  // 下一头部偏移
const IPV6_HOP_LIMIT_OFFSET: usize = 7;  // 跳数限制偏移
const IPV6_SRC_OFFSET: usize = 8;  // 源地址偏移
const IPV6_DEST_OFFSET: usize = 24;  // 目的地址偏移
const IPV6_ADDR_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_length: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src: [u8; 16],
    pub dest: [u8; 16],
}

impl Ipv6Header {
    pub fn src_text(&self) -> String {
        ipv6_to_text(&self.src)
    }

    pub fn dest_text(&self) -> String {
        ipv6_to_text(&self.dest)
    }
}

pub fn decode_ipv6(payload: &[u8]) -> DecodeResult<Ipv6Header> {
    ensure_len(payload, IPV6_HEADER_SIZE, HeaderKind::Ipv6)?;

    let vtf = u32::from_be_bytes([
        payload[IPV6_VTF_OFFSET],
        payload[IPV6_VTF_OFFSET + 1],
        payload[IPV6_VTF_OFFSET + 2],
        payload[IPV6_VTF_OFFSET + 3],
    ]);

    let mut src = [0u8; IPV6_ADDR_LEN];
    let mut dest = [0u8; IPV6_ADDR_LEN];
    src.copy_from_slice(&payload[IPV6_SRC_OFFSET..IPV6_SRC_OFFSET + IPV6_ADDR_LEN]);
    dest.copy_from_slice(&payload[IPV6_DEST_OFFSET..IPV6_DEST_OFFSET + IPV6_ADDR_LEN]);

    let header = Ipv6Header {
        version: (vtf >> 28) as u8,
        traffic_class: ((vtf >> 20) & 0xff) as u8,
        flow_label: vtf & 0x000f_ffff,
        payload_length: u16::from_be_bytes([payload[IPV6_PAYLOAD_LEN_OFFSET], payload[IPV6_PAYLOAD_LEN_OFFSET + 1]]),
        next_header: payload[IPV6_NEXT_HEADER_OFFSET],
        hop_limit: payload[IPV6_HOP_LIMIT_OFFSET],
        src,
        dest,
    };

    trace!("IPv6头部: next_header={}, payload_len={}", header.next_header, header.payload_length);

    Ok(header)
}
