use std::fmt::Write;

/// MAC 地址文本长度（含冒号）
pub const MAC_TEXT_LEN: usize = 17;
/// IPv4 地址文本最大长度
pub const IPV4_TEXT_MAX_LEN: usize = 15;
/// IPv6 地址文本最大长度（不做零压缩）
pub const IPV6_TEXT_MAX_LEN: usize = 39;

/// 六个小写两位十六进制字节，以冒号连接
pub fn mac_to_text(mac: &[u8; 6]) -> String {
    format!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
}

/// 点分十进制
pub fn ipv4_to_text(ip: &[u8; 4]) -> String {
    format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3])
}

/// 八组小写十六进制（网络字节序），不做零压缩，如 `0:0:0:0:0:0:0:1`
pub fn ipv6_to_text(ip: &[u8; 16]) -> String {
    let mut text = String::with_capacity(IPV6_TEXT_MAX_LEN);
    for (i, group) in ip.chunks_exact(2).enumerate() {
        if i > 0 {
            text.push(':');
        }
        let _ = write!(text, "{:x}", u16::from_be_bytes([group[0], group[1]]));
    }
    text
}
