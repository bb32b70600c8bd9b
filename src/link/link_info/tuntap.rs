// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::{parse_string, parse_u32},
    traits::{Emitable, Parseable},
    DecodeError,
};

const IFTUN_MODE: u16 = 1;
const IFTUN_UID: u16 = 2;
const IFTUN_GID: u16 = 3;
const IFTUN_IFR: u16 = 4;

pub(crate) const TUNTAP_IFR_LEN: usize = 7;

buffer!(TunTapIfrBuffer(TUNTAP_IFR_LEN) {
    no_pi: (u8, 0),
    one_queue: (u8, 1),
    vnet_hdr: (u8, 2),
    tun_excl: (u8, 3),
    multi_queue: (u8, 4),
    persist: (u8, 5),
    nofilter: (u8, 6),
});

/// Per-flag byte block of the tuntap pseudo-schema.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TunTapIfr {
    pub no_pi: u8,
    pub one_queue: u8,
    pub vnet_hdr: u8,
    pub tun_excl: u8,
    pub multi_queue: u8,
    pub persist: u8,
    pub nofilter: u8,
}

impl<T: AsRef<[u8]>> Parseable<TunTapIfrBuffer<T>> for TunTapIfr {
    fn parse(buf: &TunTapIfrBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            no_pi: buf.no_pi(),
            one_queue: buf.one_queue(),
            vnet_hdr: buf.vnet_hdr(),
            tun_excl: buf.tun_excl(),
            multi_queue: buf.multi_queue(),
            persist: buf.persist(),
            nofilter: buf.nofilter(),
        })
    }
}

impl Emitable for TunTapIfr {
    fn buffer_len(&self) -> usize {
        TUNTAP_IFR_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TunTapIfrBuffer::new(buffer);
        buffer.set_no_pi(self.no_pi);
        buffer.set_one_queue(self.one_queue);
        buffer.set_vnet_hdr(self.vnet_hdr);
        buffer.set_tun_excl(self.tun_excl);
        buffer.set_multi_queue(self.multi_queue);
        buffer.set_persist(self.persist);
        buffer.set_nofilter(self.nofilter);
    }
}

/// One attribute of a tuntap `IFLA_INFO_DATA` container.
///
/// This schema never reaches the kernel: it only carries the parameters
/// the proxy turns into `/dev/net/tun` ioctl calls.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoTunTap {
    Mode(String),
    Uid(u32),
    Gid(u32),
    Ifr(TunTapIfr),
    Other(DefaultNla),
}

impl Nla for InfoTunTap {
    fn value_len(&self) -> usize {
        match self {
            Self::Mode(s) => s.len() + 1,
            Self::Uid(_) | Self::Gid(_) => 4,
            Self::Ifr(ifr) => ifr.buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Mode(s) => {
                buffer[..s.len()].copy_from_slice(s.as_bytes());
                buffer[s.len()] = 0;
            }
            Self::Uid(v) | Self::Gid(v) => {
                NativeEndian::write_u32(buffer, *v)
            }
            Self::Ifr(ifr) => ifr.emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Mode(_) => IFTUN_MODE,
            Self::Uid(_) => IFTUN_UID,
            Self::Gid(_) => IFTUN_GID,
            Self::Ifr(_) => IFTUN_IFR,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoTunTap {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFTUN_MODE => Self::Mode(
                parse_string(payload).context("invalid IFTUN_MODE")?,
            ),
            IFTUN_UID => {
                Self::Uid(parse_u32(payload).context("invalid IFTUN_UID")?)
            }
            IFTUN_GID => {
                Self::Gid(parse_u32(payload).context("invalid IFTUN_GID")?)
            }
            IFTUN_IFR => Self::Ifr(
                TunTapIfr::parse(
                    &TunTapIfrBuffer::new_checked(payload)
                        .context("invalid IFTUN_IFR")?,
                )
                .context("invalid IFTUN_IFR")?,
            ),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_INFO_DATA(tuntap)"
            ))?),
        })
    }
}
