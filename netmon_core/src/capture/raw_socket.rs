use super::FrameSource;
use crate::config::Config;
use crate::error::{MonitorError, Result};
use bytes::{Bytes, BytesMut};
use log::{debug, info, warn};
use std::ffi::CString;
use std::io;
use std::mem;
use std::os::raw::{c_int, c_void};

/// Linux AF_PACKET 原始套接字，接收网卡上的所有以太网帧
#[derive(Debug)]
pub struct RawSocketSource {
    fd: c_int,
    if_index: u32,
    snaplen: usize,
    timeout_ms: c_int,
}

fn eth_p_all() -> u16 {
    (libc::ETH_P_ALL as u16).to_be()
}

fn unavailable(context: &str) -> MonitorError {
    MonitorError::SourceUnavailable(format!("{}: {}", context, io::Error::last_os_error()))
}

impl RawSocketSource {
    /// 打开套接字并绑定到配置中的网卡，需要 root 或 CAP_NET_RAW
    pub fn open(config: &Config) -> Result<Self> {
        let ifname = CString::new(config.interface.as_str())
            .map_err(|_| MonitorError::ConfigError(format!("无效的网卡名: {:?}", config.interface)))?;

        let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, eth_p_all() as c_int) };
        if fd < 0 {
            return Err(unavailable("无法打开原始套接字（需要root权限）"));
        }

        // 之后的错误路径由 Drop 关闭 fd
        let mut source = Self {
            fd,
            if_index: 0,
            snaplen: config.snaplen,
            timeout_ms: config.poll_timeout_ms.min(c_int::MAX as u64) as c_int,
        };

        source.if_index = unsafe { libc::if_nametoindex(ifname.as_ptr()) };
        if source.if_index == 0 {
            return Err(MonitorError::SourceUnavailable(format!("无效的网卡名: {}", config.interface)));
        }

        let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        addr.sll_family = libc::AF_PACKET as u16;
        addr.sll_protocol = eth_p_all();
        addr.sll_ifindex = source.if_index as c_int;
        let rc = unsafe {
            libc::bind(
                fd,
                &addr as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(unavailable("无法绑定套接字地址"));
        }

        if config.promiscuous {
            source.enable_promiscuous()?;
        }

        info!("原始套接字已打开: interface={}, ifindex={}, snaplen={}, promisc={}",
              config.interface, source.if_index, source.snaplen, config.promiscuous);
        Ok(source)
    }

    fn enable_promiscuous(&self) -> Result<()> {
        let mreq = libc::packet_mreq {
            mr_ifindex: self.if_index as c_int,
            mr_type: libc::PACKET_MR_PROMISC as u16,
            mr_alen: 0,
            mr_address: [0; 8],
        };
        let rc = unsafe {
            libc::setsockopt(
                self.fd,
                libc::SOL_PACKET,
                libc::PACKET_ADD_MEMBERSHIP,
                &mreq as *const libc::packet_mreq as *const c_void,
                mem::size_of::<libc::packet_mreq>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(unavailable("无法开启混杂模式"));
        }
        Ok(())
    }

    pub fn if_index(&self) -> u32 {
        self.if_index
    }
}

impl FrameSource for RawSocketSource {
    fn poll_frame(&mut self) -> Result<Option<Bytes>> {
        let mut pfd = libc::pollfd {
            fd: self.fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let ready = unsafe { libc::poll(&mut pfd, 1, self.timeout_ms) };
        if ready < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(MonitorError::SourceUnavailable(format!("poll失败: {}", err)));
        }
        if ready == 0 {
            return Ok(None);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(MonitorError::SourceUnavailable(format!("套接字异常: revents=0x{:x}", pfd.revents)));
        }

        let mut buffer = BytesMut::zeroed(self.snaplen);
        let len = unsafe {
            libc::recv(self.fd, buffer.as_mut_ptr() as *mut c_void, buffer.len(), libc::MSG_DONTWAIT)
        };
        if len < 0 {
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                _ => Err(MonitorError::SourceUnavailable(format!("接收失败: {}", err))),
            };
        }
        if len == 0 {
            return Ok(None);
        }

        buffer.truncate(len as usize);
        debug!("收到数据帧: 长度={}", len);
        Ok(Some(buffer.freeze()))
    }
}

impl Drop for RawSocketSource {
    fn drop(&mut self) {
        if unsafe { libc::close(self.fd) } < 0 {
            warn!("关闭套接字失败: {}", io::Error::last_os_error());
        }
    }
}
