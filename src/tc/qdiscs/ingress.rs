// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    parsers::parse_u32,
    traits::{Emitable, Parseable},
    DecodeError,
};

/// Options of the `ingress` qdisc: a single raw word, not a nested
/// attribute set.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcQdiscIngress {
    pub value: u32,
}

impl TcQdiscIngress {
    pub(crate) const KIND: &'static str = "ingress";
}

impl Emitable for TcQdiscIngress {
    fn buffer_len(&self) -> usize {
        4
    }

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..4].copy_from_slice(&self.value.to_ne_bytes());
    }
}

impl<T: AsRef<[u8]> + ?Sized> Parseable<T> for TcQdiscIngress {
    fn parse(buf: &T) -> Result<Self, DecodeError> {
        Ok(Self {
            value: parse_u32(buf.as_ref())
                .context("invalid ingress TCA_OPTIONS")?,
        })
    }
}
