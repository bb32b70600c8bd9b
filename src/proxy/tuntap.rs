// SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, NativeEndian};

use crate::link::{InfoData, InfoTunTap, LinkMessage};
use crate::proxy::ProxyError;

pub(crate) const IFNAMSIZ: usize = 16;

pub const IFT_TUN: u16 = 0x0001;
pub const IFT_TAP: u16 = 0x0002;
pub const IFT_NO_PI: u16 = 0x1000;
pub const IFT_ONE_QUEUE: u16 = 0x2000;
pub const IFT_VNET_HDR: u16 = 0x4000;
pub const IFT_MULTI_QUEUE: u16 = 0x0100;

/// Everything needed to create a persistent tun/tap device.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TunTapSetup {
    pub name: String,
    /// `IFT_*` flags word written into the ifreq.
    pub flags: u16,
    pub owner: Option<u32>,
    pub group: Option<u32>,
}

impl TunTapSetup {
    /// Extracts the setup from a decoded `RTM_NEWLINK` request carrying
    /// a `tuntap` link-info container.
    pub fn from_link_message(msg: &LinkMessage) -> Result<Self, ProxyError> {
        let name = msg
            .if_name()
            .ok_or(ProxyError::MissingAttribute("IFLA_IFNAME"))?
            .to_string();
        let data = match msg.info_data() {
            Some(InfoData::Tuntap(data)) => data.as_slice(),
            _ => return Err(ProxyError::MissingAttribute("IFLA_INFO_DATA")),
        };

        let mut mode = None;
        let mut ifr = None;
        let mut owner = None;
        let mut group = None;
        for attribute in data {
            match attribute {
                InfoTunTap::Mode(value) => mode = Some(value.as_str()),
                InfoTunTap::Ifr(value) => ifr = Some(*value),
                InfoTunTap::Uid(value) => owner = Some(*value),
                InfoTunTap::Gid(value) => group = Some(*value),
                _ => {}
            }
        }

        let mut flags = match mode {
            Some("tun") => IFT_TUN,
            Some("tap") => IFT_TAP,
            other => {
                return Err(ProxyError::InvalidTunTapMode(
                    other.unwrap_or("").to_string(),
                ))
            }
        };
        if let Some(ifr) = ifr {
            if ifr.no_pi != 0 {
                flags |= IFT_NO_PI;
            }
            if ifr.one_queue != 0 {
                flags |= IFT_ONE_QUEUE;
            }
            if ifr.vnet_hdr != 0 {
                flags |= IFT_VNET_HDR;
            }
            if ifr.multi_queue != 0 {
                flags |= IFT_MULTI_QUEUE;
            }
        }

        Ok(Self {
            name,
            flags,
            owner,
            group,
        })
    }
}

/// The 18-byte `struct ifreq` prefix for `TUNSETIFF`: the NUL-padded
/// device name followed by the flags word.
pub(crate) fn ifreq_bytes(
    name: &str,
    flags: u16,
) -> Result<[u8; IFNAMSIZ + 2], ProxyError> {
    if name.len() > IFNAMSIZ {
        return Err(ProxyError::IfNameTooLong);
    }
    let mut ifr = [0u8; IFNAMSIZ + 2];
    ifr[..name.len()].copy_from_slice(name.as_bytes());
    NativeEndian::write_u16(&mut ifr[IFNAMSIZ..], flags);
    Ok(ifr)
}

#[cfg(any(target_arch = "x86_64", target_arch = "powerpc64"))]
mod os {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::io::AsRawFd;

    use super::{ifreq_bytes, TunTapSetup};
    use crate::proxy::ProxyError;

    const TUNDEV: &str = "/dev/net/tun";

    #[cfg(target_arch = "x86_64")]
    const TUNSETIFF: libc::c_ulong = 0x400454ca;
    #[cfg(target_arch = "x86_64")]
    const TUNSETPERSIST: libc::c_ulong = 0x400454cb;
    #[cfg(target_arch = "x86_64")]
    const TUNSETOWNER: libc::c_ulong = 0x400454cc;
    #[cfg(target_arch = "x86_64")]
    const TUNSETGROUP: libc::c_ulong = 0x400454ce;

    #[cfg(target_arch = "powerpc64")]
    const TUNSETIFF: libc::c_ulong = 0x800454ca;
    #[cfg(target_arch = "powerpc64")]
    const TUNSETPERSIST: libc::c_ulong = 0x800454cb;
    #[cfg(target_arch = "powerpc64")]
    const TUNSETOWNER: libc::c_ulong = 0x800454cc;
    #[cfg(target_arch = "powerpc64")]
    const TUNSETGROUP: libc::c_ulong = 0x800454ce;

    fn tun_ioctl(
        fd: libc::c_int,
        request: libc::c_ulong,
        argument: libc::c_ulong,
    ) -> io::Result<()> {
        let rc = unsafe { libc::ioctl(fd, request, argument) };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// Creates a persistent tun/tap device. The control descriptor is
    /// closed again on every exit path.
    pub(crate) fn create(setup: &TunTapSetup) -> Result<(), ProxyError> {
        let mut ifr = ifreq_bytes(&setup.name, setup.flags)?;
        let device = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TUNDEV)
            .map_err(ProxyError::Io)?;
        let fd = device.as_raw_fd();
        tun_ioctl(fd, TUNSETIFF, ifr.as_mut_ptr() as usize as libc::c_ulong)?;
        if let Some(owner) = setup.owner {
            tun_ioctl(fd, TUNSETOWNER, libc::c_ulong::from(owner))?;
        }
        if let Some(group) = setup.group {
            tun_ioctl(fd, TUNSETGROUP, libc::c_ulong::from(group))?;
        }
        tun_ioctl(fd, TUNSETPERSIST, 1)?;
        Ok(())
    }
}

#[cfg(any(target_arch = "x86_64", target_arch = "powerpc64"))]
pub(crate) use self::os::create;

#[cfg(not(any(target_arch = "x86_64", target_arch = "powerpc64")))]
pub(crate) fn create(_setup: &TunTapSetup) -> Result<(), ProxyError> {
    Err(ProxyError::UnsupportedArch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_ifreq_layout() {
        let ifr = ifreq_bytes("tap0", IFT_TAP | IFT_NO_PI).unwrap();
        let mut expected = [0u8; 18];
        expected[..4].copy_from_slice(b"tap0");
        expected[16..].copy_from_slice(&0x1002u16.to_ne_bytes());
        assert_eq!(ifr, expected);
    }

    #[test]
    fn overlong_name_is_rejected() {
        assert!(matches!(
            ifreq_bytes("averylongdevicename", IFT_TUN),
            Err(ProxyError::IfNameTooLong)
        ));
    }
}
