use super::error::{ensure_len, DecodeResult, HeaderKind};
use super::format::mac_to_text;
use log::trace;

// 以太网头部常量
pub const ETHERNET_HEADER_SIZE: usize = 14;  // 目的MAC(6) + 源MAC(6) + 类型(2)
const ETH_DEST_OFFSET: usize = 0;  // 目的MAC偏移
const ETH_SRC_OFFSET: usize = 6;  // 源MAC偏移
const ETH_TYPE_OFFSET: usize = 12;  // 以太网类型偏移
const MAC_LEN: usize = 6;

pub const ETH_TYPE_IPV4: u16 = 0x0800;
pub const ETH_TYPE_ARP: u16 = 0x0806;
pub const ETH_TYPE_IPV6: u16 = 0x86DD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dest_mac: [u8; 6],
    pub src_mac: [u8; 6],
    pub ether_type: u16,
}

impl EthernetHeader {
    pub fn dest_text(&self) -> String {
        mac_to_text(&self.dest_mac)
    }

    pub fn src_text(&self) -> String {
        mac_to_text(&self.src_mac)
    }

    /// 以太网头部之后的负载
    pub fn payload<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        frame.get(ETHERNET_HEADER_SIZE..).unwrap_or(&[])
    }
}

pub fn decode_ethernet(frame: &[u8]) -> DecodeResult<EthernetHeader> {
    ensure_len(frame, ETHERNET_HEADER_SIZE, HeaderKind::Ethernet)?;

    let mut dest_mac = [0u8; MAC_LEN];
    let mut src_mac = [0u8; MAC_LEN];
    dest_mac.copy_from_slice(&frame[ETH_DEST_OFFSET..ETH_DEST_OFFSET + MAC_LEN]);
    src_mac.copy_from_slice(&frame[ETH_SRC_OFFSET..ETH_SRC_OFFSET + MAC_LEN]);
    let ether_type = u16::from_be_bytes([frame[ETH_TYPE_OFFSET], frame[ETH_TYPE_OFFSET + 1]]);

    trace!("以太网头部: type=0x{:04x}, frame_len={}", ether_type, frame.len());

    Ok(EthernetHeader { dest_mac, src_mac, ether_type })
}
