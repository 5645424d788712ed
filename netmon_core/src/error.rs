use std::result::Result as StdResult;
use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// 帧来源无法继续读取，属于致命错误
    #[error("帧来源不可用: {0}")]
    SourceUnavailable(String),

    #[error("解码错误: {0}")]
    DecodeError(#[from] DecodeError),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("JSON错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("系统IO错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl MonitorError {
    /// 来源错误会终止监控循环
    pub fn is_fatal(&self) -> bool {
        matches!(self, MonitorError::SourceUnavailable(_) | MonitorError::IoError(_))
    }
}

pub type Result<T> = StdResult<T, MonitorError>;
