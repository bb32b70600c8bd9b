// SPDX-License-Identifier: MIT

mod inet;
mod inet6;

pub use self::inet::InetDevConf;
pub use self::inet6::{
    AfSpecInet6, Icmp6Stats, Inet6CacheInfo, Inet6DevConf,
};

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer, NlasIterator},
    traits::{Emitable, Parseable},
    DecodeError,
};

use self::inet::InetDevConfBuffer;
use crate::AddressFamily;

/// One entry of the `IFLA_AF_SPEC` container. The attribute kind is the
/// address-family number; families without a schema stay opaque.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum AfSpec {
    Inet(InetDevConf),
    Inet6(Vec<AfSpecInet6>),
    Other(DefaultNla),
}

impl Nla for AfSpec {
    fn value_len(&self) -> usize {
        match self {
            Self::Inet(conf) => conf.buffer_len(),
            Self::Inet6(nlas) => nlas.as_slice().buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Inet(conf) => conf.emit(buffer),
            Self::Inet6(nlas) => nlas.as_slice().emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Inet(_) => AddressFamily::Inet.into(),
            Self::Inet6(_) => AddressFamily::Inet6.into(),
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for AfSpec {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        match AddressFamily::from(buf.kind() as u8) {
            AddressFamily::Inet => Ok(Self::Inet(
                InetDevConf::parse(
                    &InetDevConfBuffer::new_checked(payload)
                        .context("invalid AF_INET devconf block")?,
                )
                .context("invalid AF_INET devconf block")?,
            )),
            AddressFamily::Inet6 => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla = nla
                        .context("invalid IFLA_AF_SPEC for AF_INET6")?;
                    nlas.push(AfSpecInet6::parse(&nla)?);
                }
                Ok(Self::Inet6(nlas))
            }
            _ => Ok(Self::Other(
                DefaultNla::parse(buf)
                    .context("failed to parse IFLA_AF_SPEC entry")?,
            )),
        }
    }
}

pub(crate) struct VecAfSpec(pub(crate) Vec<AfSpec>);

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for VecAfSpec {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let mut nlas = Vec::new();
        for nla in NlasIterator::new(buf.value()) {
            let nla = nla.context("invalid IFLA_AF_SPEC")?;
            nlas.push(AfSpec::parse(&nla)?);
        }
        Ok(Self(nlas))
    }
}
