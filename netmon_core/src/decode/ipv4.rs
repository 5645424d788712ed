use super::error::{ensure_len, DecodeError, DecodeResult, HeaderKind};
use super::format::ipv4_to_text;
use log::trace;

// IPv4相关常量
pub const IPV4_MIN_HEADER_SIZE: usize = 20;  // 不含选项的头部长度
const IPV4_VER_IHL_OFFSET: usize = 0;  // 版本和头部长度偏移
const IPV4_TOS_OFFSET: usize = 1;  // 服务类型偏移
const IPV4_TOTAL_LEN_OFFSET: usize = 2;  // 总长度偏移
const IPV4_ID_OFFSET: usize = 4;  // 标识偏移
const IPV4_FLAGS_OFFSET: usize = 6;  // 标志和片偏移
const IPV4_TTL_OFFSET: usize = 8;  // TTL偏移
const IPV4_PROTOCOL_OFFSET: usize = 9;  // 协议偏移
const IPV4_CHECKSUM_OFFSET: usize = 10;  // 校验和偏移
const IPV4_SRC_OFFSET: usize = 12;  // 源地址偏移
const IPV4_DEST_OFFSET: usize = 16;  // 目的地址偏移

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    pub ihl: u8,
    pub tos: u8,
    pub total_length: u16,
    pub identification: u16,
    pub flags: u8,
    pub fragment_offset: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub header_checksum: u16,
    pub src: [u8; 4],
    pub dest: [u8; 4],
}

impl Ipv4Header {
    /// IHL 指示的头部字节数
    pub fn header_len(&self) -> usize {
        self.ihl as usize * 4
    }

    pub fn src_text(&self) -> String {
        ipv4_to_text(&self.src)
    }

    pub fn dest_text(&self) -> String {
        ipv4_to_text(&self.dest)
    }

    /// 校验 IHL 与可用字节数，只在严格模式下使用
    pub fn check_header_len(&self, available: usize) -> DecodeResult<()> {
        if self.header_len() < IPV4_MIN_HEADER_SIZE {
            return Err(DecodeError::BadHeaderLength { ihl: self.ihl });
        }
        if available < self.header_len() {
            return Err(DecodeError::truncated(HeaderKind::Ipv4, self.header_len(), available));
        }
        Ok(())
    }
}

/// 按固定偏移解析，所有字段都位于前20字节内，选项不解析
pub fn decode_ipv4(payload: &[u8]) -> DecodeResult<Ipv4Header> {
    ensure_len(payload, IPV4_MIN_HEADER_SIZE, HeaderKind::Ipv4)?;

    let ver_ihl = payload[IPV4_VER_IHL_OFFSET];
    let flags_frag = u16::from_be_bytes([payload[IPV4_FLAGS_OFFSET], payload[IPV4_FLAGS_OFFSET + 1]]);

    let mut src = [0u8; 4];
    let mut dest = [0u8; 4];
    src.copy_from_slice(&payload[IPV4_SRC_OFFSET..IPV4_SRC_OFFSET + 4]);
    dest.copy_from_slice(&payload[IPV4_DEST_OFFSET..IPV4_DEST_OFFSET + 4]);

    let header = Ipv4Header {
        version: ver_ihl >> 4,
        ihl: ver_ihl & 0x0f,
        tos: payload[IPV4_TOS_OFFSET],
        total_length: u16::from_be_bytes([payload[IPV4_TOTAL_LEN_OFFSET], payload[IPV4_TOTAL_LEN_OFFSET + 1]]),
        identification: u16::from_be_bytes([payload[IPV4_ID_OFFSET], payload[IPV4_ID_OFFSET + 1]]),
        flags: (flags_frag >> 13) as u8,
        fragment_offset: flags_frag & 0x1fff,
        ttl: payload[IPV4_TTL_OFFSET],
        protocol: payload[IPV4_PROTOCOL_OFFSET],
        header_checksum: u16::from_be_bytes([payload[IPV4_CHECKSUM_OFFSET], payload[IPV4_CHECKSUM_OFFSET + 1]]),
        src,
        dest,
    };

    trace!("IPv4头部: {} -> {}, protocol={}, ihl={}",
           header.src_text(), header.dest_text(), header.protocol, header.ihl);

    Ok(header)
}
