mod arp;
mod error;
mod ethernet;
mod format;
mod ipv4;
mod ipv6;

pub use arp::{decode_arp, ArpHeader, ARP_HEADER_SIZE, ARP_OPER_REPLY, ARP_OPER_REQUEST};
pub use error::{DecodeError, DecodeResult, HeaderKind};
pub use ethernet::{
    decode_ethernet, EthernetHeader, ETHERNET_HEADER_SIZE, ETH_TYPE_ARP, ETH_TYPE_IPV4, ETH_TYPE_IPV6,
};
pub use format::{ipv4_to_text, ipv6_to_text, mac_to_text, IPV4_TEXT_MAX_LEN, IPV6_TEXT_MAX_LEN, MAC_TEXT_LEN};
pub use ipv4::{decode_ipv4, Ipv4Header, IPV4_MIN_HEADER_SIZE};
pub use ipv6::{decode_ipv6, Ipv6Header, IPV6_HEADER_SIZE};
