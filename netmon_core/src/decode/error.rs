use std::fmt;
use thiserror::Error;

/// 被解析的头部类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Ethernet,
    Arp,
    Ipv4,
    Ipv6,
}

impl fmt::Display for HeaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderKind::Ethernet => "以太网",
            HeaderKind::Arp => "ARP",
            HeaderKind::Ipv4 => "IPv4",
            HeaderKind::Ipv6 => "IPv6",
        };
        f.write_str(name)
    }
}

/// 解码错误类型
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// 缓冲区短于头部所需的最小长度
    #[error("{header}头部长度不足: 需要 {required} 字节，实际 {actual} 字节")]
    Truncated {
        header: HeaderKind,
        required: usize,
        actual: usize,
    },

    /// IHL 字段无效（仅在严格模式下检查）
    #[error("无效的IPv4头部长度: IHL={ihl}")]
    BadHeaderLength {
        ihl: u8,
    },
}

impl DecodeError {
    pub fn truncated(header: HeaderKind, required: usize, actual: usize) -> Self {
        DecodeError::Truncated { header, required, actual }
    }

    /// 返回出错的头部类型
    pub fn header(&self) -> HeaderKind {
        match self {
            DecodeError::Truncated { header, .. } => *header,
            DecodeError::BadHeaderLength { .. } => HeaderKind::Ipv4,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}

/// 结果类型别名
pub type DecodeResult<T> = Result<T, DecodeError>;

/// 长度检查，所有解码器读取字段前都要先调用
pub(crate) fn ensure_len(buffer: &[u8], required: usize, header: HeaderKind) -> DecodeResult<()> {
    if buffer.len() < required {
        return Err(DecodeError::truncated(header, required, buffer.len()));
    }
    Ok(())
}
