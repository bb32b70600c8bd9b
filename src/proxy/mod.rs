// SPDX-License-Identifier: MIT

//! Interception of link management requests.
//!
//! The transport hands every intercepted request to one of the
//! [RtnlProxy] entry points and transmits only what comes back as
//! [Verdict::Forward]. Requests the kernel cannot service directly are
//! emulated through sysfs writes, external tools or the tun/tap ioctl
//! interface, and answered with [Verdict::Handled].

mod compat;
mod host;
mod link;
mod tuntap;

#[cfg(test)]
mod tests;

use std::io;

use netlink_packet_utils::DecodeError;
use thiserror::Error;

use crate::link::LinkMessage;

pub use self::host::{Host, OsHost};
pub use self::link::RtnlProxy;
pub use self::tuntap::{
    TunTapSetup, IFT_MULTI_QUEUE, IFT_NO_PI, IFT_ONE_QUEUE, IFT_TAP,
    IFT_TUN, IFT_VNET_HDR,
};

/// Outcome of a proxy entry point.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Verdict {
    /// Transmit these bytes to the kernel.
    Forward(Vec<u8>),
    /// The request was fully serviced locally; transmit nothing.
    Handled,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to decode message")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{program} exited with code {code}")]
    Command { program: String, code: i32 },

    #[error("device attribute writes failed with code {0}")]
    Sysfs(i32),

    #[error("tun/tap is not supported on this architecture")]
    UnsupportedArch,

    #[error("invalid tun/tap mode {0:?}")]
    InvalidTunTapMode(String),

    #[error("interface name too long")]
    IfNameTooLong,

    #[error("message carries no {0}")]
    MissingAttribute(&'static str),

    #[error("no master recorded in sysfs for {0}")]
    NoMaster(String),
}

impl ProxyError {
    /// OS error number of this failure, when one applies.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Io(error) => error.raw_os_error(),
            Self::Command { code, .. } => Some(*code),
            Self::Sysfs(code) => Some(*code),
            _ => None,
        }
    }
}

/// Callback into the transport for looking up a full link record, used
/// where a request does not carry enough context by itself.
pub trait LinkLookup {
    fn link_by_index(&mut self, index: i32) -> Result<LinkMessage, ProxyError>;
}
