// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    traits::{Emitable, Parseable},
    DecodeError,
};

use crate::link::{LinkMessage, LinkMessageBuffer};

const VETH_INFO_PEER: u16 = 1;

/// One attribute of a veth's `IFLA_INFO_DATA` container. The peer is a
/// complete embedded link message (header plus attributes, without the
/// outer netlink framing).
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoVeth {
    Peer(LinkMessage),
    Other(DefaultNla),
}

impl Nla for InfoVeth {
    fn value_len(&self) -> usize {
        match self {
            Self::Peer(message) => message.buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Peer(message) => message.emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Peer(_) => VETH_INFO_PEER,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoVeth {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            VETH_INFO_PEER => {
                let err = "failed to parse veth peer message";
                let buffer =
                    LinkMessageBuffer::new_checked(&payload).context(err)?;
                Self::Peer(LinkMessage::parse(&buffer).context(err)?)
            }
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_INFO_DATA(veth)"
            ))?),
        })
    }
}
