// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer, NlasIterator},
    parsers::parse_string,
    traits::Parseable,
    DecodeError,
};

use super::InfoData;

const IFLA_INFO_KIND: u16 = 1;
const IFLA_INFO_DATA: u16 = 2;
const IFLA_INFO_XSTATS: u16 = 3;
const IFLA_INFO_SLAVE_KIND: u16 = 4;
const IFLA_INFO_SLAVE_DATA: u16 = 5;

const VLAN: &str = "vlan";
const BOND: &str = "bond";
const VETH: &str = "veth";
const TUNTAP: &str = "tuntap";
const BRIDGE: &str = "bridge";

/// Textual discriminator of an `IFLA_LINKINFO` container, selecting the
/// sub-schema of the sibling `IFLA_INFO_DATA` attribute.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoKind {
    Vlan,
    Bond,
    Veth,
    Tuntap,
    Bridge,
    Other(String),
}

impl std::fmt::Display for InfoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Vlan => VLAN,
                Self::Bond => BOND,
                Self::Veth => VETH,
                Self::Tuntap => TUNTAP,
                Self::Bridge => BRIDGE,
                Self::Other(s) => s.as_str(),
            }
        )
    }
}

impl From<&str> for InfoKind {
    fn from(s: &str) -> Self {
        match s {
            VLAN => Self::Vlan,
            BOND => Self::Bond,
            VETH => Self::Veth,
            TUNTAP => Self::Tuntap,
            BRIDGE => Self::Bridge,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl Nla for InfoKind {
    fn value_len(&self) -> usize {
        let len = match self {
            Self::Vlan => VLAN.len(),
            Self::Bond => BOND.len(),
            Self::Veth => VETH.len(),
            Self::Tuntap => TUNTAP.len(),
            Self::Bridge => BRIDGE.len(),
            Self::Other(s) => s.len(),
        };
        len + 1
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        let kind = self.to_string();
        let s = kind.as_str();
        buffer[..s.len()].copy_from_slice(s.as_bytes());
        buffer[s.len()] = 0;
    }

    fn kind(&self) -> u16 {
        IFLA_INFO_KIND
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoKind {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<InfoKind, DecodeError> {
        if buf.kind() != IFLA_INFO_KIND {
            return Err(format!(
                "failed to parse IFLA_INFO_KIND: NLA type is {}",
                buf.kind()
            )
            .into());
        }
        let s = parse_string(buf.value())
            .context("invalid IFLA_INFO_KIND value")?;
        Ok(InfoKind::from(s.as_str()))
    }
}

/// One child of the `IFLA_LINKINFO` container.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum LinkInfo {
    Kind(InfoKind),
    Data(InfoData),
    Xstats(Vec<u8>),
    SlaveKind(String),
    SlaveData(InfoData),
    Other(DefaultNla),
}

impl Nla for LinkInfo {
    fn value_len(&self) -> usize {
        match self {
            Self::Kind(nla) => nla.value_len(),
            Self::Data(nla) | Self::SlaveData(nla) => nla.value_len(),
            Self::Xstats(bytes) => bytes.len(),
            Self::SlaveKind(s) => s.len() + 1,
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Kind(nla) => nla.emit_value(buffer),
            Self::Data(nla) | Self::SlaveData(nla) => nla.emit_value(buffer),
            Self::Xstats(bytes) => buffer.copy_from_slice(bytes.as_slice()),
            Self::SlaveKind(s) => {
                buffer[..s.len()].copy_from_slice(s.as_bytes());
                buffer[s.len()] = 0;
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Kind(_) => IFLA_INFO_KIND,
            Self::Data(_) => IFLA_INFO_DATA,
            Self::Xstats(_) => IFLA_INFO_XSTATS,
            Self::SlaveKind(_) => IFLA_INFO_SLAVE_KIND,
            Self::SlaveData(_) => IFLA_INFO_SLAVE_DATA,
            Self::Other(nla) => nla.kind(),
        }
    }
}

pub(crate) struct VecLinkInfo(pub(crate) Vec<LinkInfo>);

// We cannot `impl Parseable<_> for LinkInfo` because some attributes
// depend on each other: to parse IFLA_INFO_DATA we first need the
// preceding IFLA_INFO_KIND. A data attribute with no preceding kind
// stays opaque.
impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for VecLinkInfo {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let mut nlas = Vec::new();
        let mut info_kind: Option<InfoKind> = None;
        for nla in NlasIterator::new(buf.value()) {
            let nla = nla?;
            match nla.kind() {
                IFLA_INFO_KIND => {
                    let parsed = InfoKind::parse(&nla)?;
                    nlas.push(LinkInfo::Kind(parsed.clone()));
                    info_kind = Some(parsed);
                }
                IFLA_INFO_DATA => nlas.push(LinkInfo::Data(
                    InfoData::parse_with_kind(nla.value(), info_kind.as_ref())?,
                )),
                IFLA_INFO_SLAVE_DATA => nlas.push(LinkInfo::SlaveData(
                    InfoData::parse_with_kind(nla.value(), info_kind.as_ref())?,
                )),
                IFLA_INFO_XSTATS => {
                    nlas.push(LinkInfo::Xstats(nla.value().to_vec()))
                }
                IFLA_INFO_SLAVE_KIND => nlas.push(LinkInfo::SlaveKind(
                    parse_string(nla.value())
                        .context("invalid IFLA_INFO_SLAVE_KIND value")?,
                )),
                kind => nlas.push(LinkInfo::Other(
                    DefaultNla::parse(&nla).context(format!(
                        "unknown NLA type {kind} for IFLA_LINKINFO"
                    ))?,
                )),
            }
        }
        Ok(Self(nlas))
    }
}
