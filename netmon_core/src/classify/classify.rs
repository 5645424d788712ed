use crate::decode::{
    decode_arp, decode_ipv4, decode_ipv6, ArpHeader, DecodeResult, EthernetHeader, Ipv4Header, Ipv6Header,
    ARP_OPER_REPLY, ARP_OPER_REQUEST, ETH_TYPE_ARP, ETH_TYPE_IPV4, ETH_TYPE_IPV6,
};
use log::{debug, trace};

// IP协议号
pub const IP_PROTOCOL_ICMP: u8 = 1;
pub const IP_PROTOCOL_IGMP: u8 = 2;
pub const IP_PROTOCOL_TCP: u8 = 6;
pub const IP_PROTOCOL_UDP: u8 = 17;
pub const IP_PROTOCOL_ICMPV6: u8 = 58;

/// 传输层协议
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
    Icmp,
    Igmp,
    Unknown(u8),
}

impl Transport {
    /// IPv4 协议字段
    pub fn from_ipv4(protocol: u8) -> Self {
        match protocol {
            IP_PROTOCOL_ICMP => Transport::Icmp,
            IP_PROTOCOL_IGMP => Transport::Igmp,
            IP_PROTOCOL_TCP => Transport::Tcp,
            IP_PROTOCOL_UDP => Transport::Udp,
            other => Transport::Unknown(other),
        }
    }

    /// IPv6 下一头部字段，ICMPv6 计入 ICMP
    pub fn from_ipv6(next_header: u8) -> Self {
        match next_header {
            IP_PROTOCOL_IGMP => Transport::Igmp,
            IP_PROTOCOL_TCP => Transport::Tcp,
            IP_PROTOCOL_UDP => Transport::Udp,
            IP_PROTOCOL_ICMPV6 => Transport::Icmp,
            other => Transport::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transport::Tcp => "TCP",
            Transport::Udp => "UDP",
            Transport::Icmp => "ICMP",
            Transport::Igmp => "IGMP",
            Transport::Unknown(_) => "UNKNOWN",
        }
    }
}

/// ARP 操作码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArpOperation {
    Request,
    Reply,
    Unknown(u16),
}

impl ArpOperation {
    pub fn from_code(code: u16) -> Self {
        match code {
            ARP_OPER_REQUEST => ArpOperation::Request,
            ARP_OPER_REPLY => ArpOperation::Reply,
            other => ArpOperation::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ArpOperation::Request => "REQUEST",
            ArpOperation::Reply => "REPLY",
            ArpOperation::Unknown(_) => "UNKNOWN",
        }
    }
}

/// 协议分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Arp(ArpOperation),
    Ipv4(Transport),
    Ipv6(Transport),
    /// 未识别的以太网类型，不计数也不显示
    Unknown(u16),
}

impl Classification {
    pub fn link_label(&self) -> Option<&'static str> {
        match self {
            Classification::Arp(_) => Some("ARP"),
            Classification::Ipv4(_) => Some("IPv4"),
            Classification::Ipv6(_) => Some("IPv6"),
            Classification::Unknown(_) => None,
        }
    }

    pub fn sub_label(&self) -> &'static str {
        match self {
            Classification::Arp(op) => op.label(),
            Classification::Ipv4(t) | Classification::Ipv6(t) => t.label(),
            Classification::Unknown(_) => "UNKNOWN",
        }
    }

    /// 需要上报诊断的未知协议号或操作码
    pub fn anomaly(&self) -> Option<String> {
        match self {
            Classification::Ipv4(Transport::Unknown(code)) => Some(format!("未知的IPv4协议: 0x{:02x}", code)),
            Classification::Ipv6(Transport::Unknown(code)) => Some(format!("未知的IPv6协议: 0x{:02x}", code)),
            Classification::Arp(ArpOperation::Unknown(code)) => Some(format!("未知的ARP操作: 0x{:04x}", code)),
            _ => None,
        }
    }
}

/// 分类时解析出的网络层头部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkHeader {
    Arp(ArpHeader),
    Ipv4(Ipv4Header),
    Ipv6(Ipv6Header),
    None,
}

impl NetworkHeader {
    /// 源地址和目的地址文本，仅 IP 包有
    pub fn ip_addresses(&self) -> Option<(String, String)> {
        match self {
            NetworkHeader::Ipv4(ip) => Some((ip.src_text(), ip.dest_text())),
            NetworkHeader::Ipv6(ip) => Some((ip.src_text(), ip.dest_text())),
            NetworkHeader::Arp(_) | NetworkHeader::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub classification: Classification,
    pub network: NetworkHeader,
}

/// 协议分类器
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    /// 为 true 时按 IHL 校验 IPv4 头部长度
    pub honor_ipv4_header_len: bool,
}

impl Classifier {
    pub fn new(honor_ipv4_header_len: bool) -> Self {
        Self { honor_ipv4_header_len }
    }

    /// 按以太网类型分派，再按协议号细分。子头部过短时返回 Truncated
    pub fn classify(&self, eth: &EthernetHeader, payload: &[u8]) -> DecodeResult<Classified> {
        let classified = match eth.ether_type {
            ETH_TYPE_IPV4 => {
                let ip = decode_ipv4(payload)?;
                if self.honor_ipv4_header_len {
                    ip.check_header_len(payload.len())?;
                }
                Classified {
                    classification: Classification::Ipv4(Transport::from_ipv4(ip.protocol)),
                    network: NetworkHeader::Ipv4(ip),
                }
            }
            ETH_TYPE_IPV6 => {
                let ip = decode_ipv6(payload)?;
                Classified {
                    classification: Classification::Ipv6(Transport::from_ipv6(ip.next_header)),
                    network: NetworkHeader::Ipv6(ip),
                }
            }
            ETH_TYPE_ARP => {
                let arp = decode_arp(payload)?;
                Classified {
                    classification: Classification::Arp(ArpOperation::from_code(arp.operation)),
                    network: NetworkHeader::Arp(arp),
                }
            }
            other => {
                debug!("未知以太网类型: 0x{:04x}", other);
                Classified {
                    classification: Classification::Unknown(other),
                    network: NetworkHeader::None,
                }
            }
        };

        trace!("分类结果: {:?}", classified.classification);
        Ok(classified)
    }
}

/// 使用默认选项分类
pub fn classify(eth: &EthernetHeader, payload: &[u8]) -> DecodeResult<Classified> {
    Classifier::default().classify(eth, payload)
}
