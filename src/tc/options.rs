// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{Nla, NlasIterator},
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::attribute::TCA_OPTIONS;
use super::{
    TcFilterFw, TcFilterFwOption, TcFilterU32, TcFilterU32Option,
    TcQdiscHtb, TcQdiscHtbOption, TcQdiscIngress, TcQdiscPfifoFast,
    TcQdiscSfq, TcQdiscTbf, TcQdiscTbfOption,
};

/// Contents of `TCA_OPTIONS`, selected by the previously-seen `TCA_KIND`.
///
/// The nested kinds carry an attribute list; `ingress`, `pfifo_fast` and
/// `sfq` carry a raw struct instead. Everything else stays opaque,
/// including options seen before any kind.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcOptions {
    Ingress(TcQdiscIngress),
    PfifoFast(TcQdiscPfifoFast),
    Sfq(TcQdiscSfq),
    Tbf(Vec<TcQdiscTbfOption>),
    Htb(Vec<TcQdiscHtbOption>),
    U32(Vec<TcFilterU32Option>),
    Fw(Vec<TcFilterFwOption>),
    Other(Vec<u8>),
}

impl TcOptions {
    pub(crate) fn parse_with_kind(
        payload: &[u8],
        kind: &str,
    ) -> Result<Self, DecodeError> {
        Ok(match kind {
            TcQdiscIngress::KIND => Self::Ingress(
                TcQdiscIngress::parse(payload)
                    .context("failed to parse ingress TCA_OPTIONS")?,
            ),
            TcQdiscPfifoFast::KIND => Self::PfifoFast(
                TcQdiscPfifoFast::parse(
                    &super::qdiscs::TcPrioQoptBuffer::new_checked(payload)
                        .context("failed to parse pfifo_fast TCA_OPTIONS")?,
                )
                .context("failed to parse pfifo_fast TCA_OPTIONS")?,
            ),
            TcQdiscSfq::KIND => Self::Sfq(
                TcQdiscSfq::parse(payload)
                    .context("failed to parse sfq TCA_OPTIONS")?,
            ),
            TcQdiscTbf::KIND => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid tbf TCA_OPTIONS attributes")?;
                    nlas.push(TcQdiscTbfOption::parse(&nla)?);
                }
                Self::Tbf(nlas)
            }
            TcQdiscHtb::KIND => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid htb TCA_OPTIONS attributes")?;
                    nlas.push(TcQdiscHtbOption::parse(&nla)?);
                }
                Self::Htb(nlas)
            }
            TcFilterU32::KIND => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid u32 TCA_OPTIONS attributes")?;
                    nlas.push(TcFilterU32Option::parse(&nla)?);
                }
                Self::U32(nlas)
            }
            TcFilterFw::KIND => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla =
                        nla.context("invalid fw TCA_OPTIONS attributes")?;
                    nlas.push(TcFilterFwOption::parse(&nla)?);
                }
                Self::Fw(nlas)
            }
            _ => Self::Other(payload.to_vec()),
        })
    }
}

impl Nla for TcOptions {
    fn value_len(&self) -> usize {
        match self {
            Self::Ingress(qopt) => qopt.buffer_len(),
            Self::PfifoFast(qopt) => qopt.buffer_len(),
            Self::Sfq(qopt) => qopt.buffer_len(),
            Self::Tbf(nlas) => nlas.as_slice().buffer_len(),
            Self::Htb(nlas) => nlas.as_slice().buffer_len(),
            Self::U32(nlas) => nlas.as_slice().buffer_len(),
            Self::Fw(nlas) => nlas.as_slice().buffer_len(),
            Self::Other(bytes) => bytes.len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Ingress(qopt) => qopt.emit(buffer),
            Self::PfifoFast(qopt) => qopt.emit(buffer),
            Self::Sfq(qopt) => qopt.emit(buffer),
            Self::Tbf(nlas) => nlas.as_slice().emit(buffer),
            Self::Htb(nlas) => nlas.as_slice().emit(buffer),
            Self::U32(nlas) => nlas.as_slice().emit(buffer),
            Self::Fw(nlas) => nlas.as_slice().emit(buffer),
            Self::Other(bytes) => buffer.copy_from_slice(bytes.as_slice()),
        }
    }

    fn kind(&self) -> u16 {
        TCA_OPTIONS
    }
}
