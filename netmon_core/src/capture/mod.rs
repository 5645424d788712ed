use crate::error::Result;
use bytes::Bytes;

mod memory;
#[cfg(target_os = "linux")]
mod raw_socket;

pub use memory::MemorySource;
#[cfg(target_os = "linux")]
pub use raw_socket::RawSocketSource;

/// 帧来源
///
/// `poll_frame` 必须非阻塞或只等待很短时间：返回 `Ok(None)` 表示当前没有帧，
/// 不是错误。返回 `Err` 表示来源已不可用，监控循环会把它交给调用方。
pub trait FrameSource {
    fn poll_frame(&mut self) -> Result<Option<Bytes>>;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn poll_frame(&mut self) -> Result<Option<Bytes>> {
        (**self).poll_frame()
    }
}
