// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::Nla,
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::attribute::TCA_XSTATS;
use super::qdiscs::{TcHtbXstatsBuffer, TcHtbXstats, TcQdiscHtb};

/// Contents of `TCA_XSTATS`, selected by the previously-seen `TCA_KIND`.
/// Only `htb` has a schema here; everything else stays opaque.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcXstats {
    Htb(TcHtbXstats),
    Other(Vec<u8>),
}

impl TcXstats {
    pub(crate) fn parse_with_kind(
        payload: &[u8],
        kind: &str,
    ) -> Result<Self, DecodeError> {
        Ok(match kind {
            TcQdiscHtb::KIND => Self::Htb(
                TcHtbXstats::parse(
                    &TcHtbXstatsBuffer::new_checked(payload)
                        .context("invalid htb TCA_XSTATS")?,
                )
                .context("invalid htb TCA_XSTATS")?,
            ),
            _ => Self::Other(payload.to_vec()),
        })
    }
}

impl Nla for TcXstats {
    fn value_len(&self) -> usize {
        match self {
            Self::Htb(xstats) => xstats.buffer_len(),
            Self::Other(bytes) => bytes.len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Htb(xstats) => xstats.emit(buffer),
            Self::Other(bytes) => buffer.copy_from_slice(bytes.as_slice()),
        }
    }

    fn kind(&self) -> u16 {
        TCA_XSTATS
    }
}
