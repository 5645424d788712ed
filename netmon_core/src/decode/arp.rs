use super::error::{ensure_len, DecodeResult, HeaderKind};
use log::trace;

// ARP相关常量（以太网 + IPv4）
pub const ARP_HEADER_SIZE: usize = 28;
const ARP_HTYPE_OFFSET: usize = 0;  // 硬件类型偏移
const ARP_PTYPE_OFFSET: usize = 2;  // 协议类型偏移
const ARP_HLEN_OFFSET: usize = 4;  // 硬件地址长度偏移
const ARP_PLEN_OFFSET: usize = 5;  // 协议地址长度偏移
const ARP_OPER_OFFSET: usize = 6;  // 操作码偏移
const ARP_SHA_OFFSET: usize = 8;  // 发送方MAC偏移
const ARP_SPA_OFFSET: usize = 14;  // 发送方IP偏移
const ARP_THA_OFFSET: usize = 18;  // 目标MAC偏移
const ARP_TPA_OFFSET: usize = 24;  // 目标IP偏移

pub const ARP_OPER_REQUEST: u16 = 1;
pub const ARP_OPER_REPLY: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpHeader {
    pub hardware_type: u16,
    pub protocol_type: u16,
    pub hardware_len: u8,
    pub protocol_len: u8,
    pub operation: u16,
    pub sender_mac: [u8; 6],
    pub sender_ip: [u8; 4],
    pub target_mac: [u8; 6],
    pub target_ip: [u8; 4],
}

fn read_u16(buffer: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buffer[offset], buffer[offset + 1]])
}

pub fn decode_arp(payload: &[u8]) -> DecodeResult<ArpHeader> {
    ensure_len(payload, ARP_HEADER_SIZE, HeaderKind::Arp)?;

    let mut sender_mac = [0u8; 6];
    let mut sender_ip = [0u8; 4];
    let mut target_mac = [0u8; 6];
    let mut target_ip = [0u8; 4];
    sender_mac.copy_from_slice(&payload[ARP_SHA_OFFSET..ARP_SHA_OFFSET + 6]);
    sender_ip.copy_from_slice(&payload[ARP_SPA_OFFSET..ARP_SPA_OFFSET + 4]);
    target_mac.copy_from_slice(&payload[ARP_THA_OFFSET..ARP_THA_OFFSET + 6]);
    target_ip.copy_from_slice(&payload[ARP_TPA_OFFSET..ARP_TPA_OFFSET + 4]);

    let header = ArpHeader {
        hardware_type: read_u16(payload, ARP_HTYPE_OFFSET),
        protocol_type: read_u16(payload, ARP_PTYPE_OFFSET),
        hardware_len: payload[ARP_HLEN_OFFSET],
        protocol_len: payload[ARP_PLEN_OFFSET],
        operation: read_u16(payload, ARP_OPER_OFFSET),
        sender_mac,
        sender_ip,
        target_mac,
        target_ip,
    };

    trace!("ARP头部: oper={}, htype={}, ptype=0x{:04x}",
           header.operation, header.hardware_type, header.protocol_type);

    Ok(header)
}
