// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::NlasIterator,
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::{InfoBond, InfoBridge, InfoKind, InfoTunTap, InfoVeth, InfoVlan};

/// Contents of `IFLA_INFO_DATA` (and `IFLA_INFO_SLAVE_DATA`), selected by
/// the sibling `IFLA_INFO_KIND`. Unknown kinds, and data seen before any
/// kind, stay opaque.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoData {
    Vlan(Vec<InfoVlan>),
    Bond(Vec<InfoBond>),
    Veth(Vec<InfoVeth>),
    Tuntap(Vec<InfoTunTap>),
    Bridge(Vec<InfoBridge>),
    Other(Vec<u8>),
}

impl InfoData {
    pub(crate) fn parse_with_kind(
        payload: &[u8],
        kind: Option<&InfoKind>,
    ) -> Result<Self, DecodeError> {
        Ok(match kind {
            Some(InfoKind::Vlan) => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid IFLA_INFO_DATA for vlan")?;
                    nlas.push(InfoVlan::parse(&nla)?);
                }
                InfoData::Vlan(nlas)
            }
            Some(InfoKind::Bond) => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid IFLA_INFO_DATA for bond")?;
                    nlas.push(InfoBond::parse(&nla)?);
                }
                InfoData::Bond(nlas)
            }
            Some(InfoKind::Veth) => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid IFLA_INFO_DATA for veth")?;
                    nlas.push(InfoVeth::parse(&nla)?);
                }
                InfoData::Veth(nlas)
            }
            Some(InfoKind::Tuntap) => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid IFLA_INFO_DATA for tuntap")?;
                    nlas.push(InfoTunTap::parse(&nla)?);
                }
                InfoData::Tuntap(nlas)
            }
            Some(InfoKind::Bridge) => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid IFLA_INFO_DATA for bridge")?;
                    nlas.push(InfoBridge::parse(&nla)?);
                }
                InfoData::Bridge(nlas)
            }
            _ => InfoData::Other(payload.to_vec()),
        })
    }

    pub(crate) fn value_len(&self) -> usize {
        match self {
            Self::Vlan(nlas) => nlas.as_slice().buffer_len(),
            Self::Bond(nlas) => nlas.as_slice().buffer_len(),
            Self::Veth(nlas) => nlas.as_slice().buffer_len(),
            Self::Tuntap(nlas) => nlas.as_slice().buffer_len(),
            Self::Bridge(nlas) => nlas.as_slice().buffer_len(),
            Self::Other(bytes) => bytes.len(),
        }
    }

    pub(crate) fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Vlan(nlas) => nlas.as_slice().emit(buffer),
            Self::Bond(nlas) => nlas.as_slice().emit(buffer),
            Self::Veth(nlas) => nlas.as_slice().emit(buffer),
            Self::Tuntap(nlas) => nlas.as_slice().emit(buffer),
            Self::Bridge(nlas) => nlas.as_slice().emit(buffer),
            Self::Other(bytes) => buffer.copy_from_slice(bytes.as_slice()),
        }
    }
}
