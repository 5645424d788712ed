use crate::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub interface: String,          // 监听的网卡名
    pub snaplen: usize,             // 单帧读取上限（字节）
    pub poll_timeout_ms: u64,       // 无帧时每次轮询的等待时间（毫秒）
    pub refresh_interval_ms: u64,   // 显示刷新间隔（毫秒）
    pub promiscuous: bool,          // 是否开启混杂模式
    pub strict_ipv4_header_len: bool, // 是否按 IHL 校验 IPv4 头部
    pub max_packet_lines: usize,    // 数据包窗口保留的行数
    pub log_file: Option<String>,   // 日志文件，None 时输出到 stderr
    pub log_level: String,          // 日志级别
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: "eth0".to_string(),
            snaplen: 4096,
            poll_timeout_ms: 100,
            refresh_interval_ms: 250,
            promiscuous: false,
            strict_ipv4_header_len: false,
            max_packet_lines: 500,
            log_file: Some("netmon.log".to_string()),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 从 JSON 文件加载，缺失字段使用默认值
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interface.is_empty() {
            return Err(MonitorError::ConfigError("网卡名不能为空".to_string()));
        }
        if self.snaplen < crate::decode::ETHERNET_HEADER_SIZE || self.snaplen > 65535 {
            return Err(MonitorError::ConfigError(format!("无效的snaplen: {}", self.snaplen)));
        }
        if self.max_packet_lines == 0 {
            return Err(MonitorError::ConfigError("max_packet_lines 必须大于0".to_string()));
        }
        Ok(())
    }
}
