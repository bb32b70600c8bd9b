// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::parse_u32,
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::police::{parse_police_options, TcPoliceOption};

const TCA_FW_CLASSID: u16 = 1;
const TCA_FW_POLICE: u16 = 2;
const TCA_FW_INDEV: u16 = 3;
const TCA_FW_ACT: u16 = 4;
const TCA_FW_MASK: u16 = 5;

#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub struct TcFilterFw {}

impl TcFilterFw {
    pub(crate) const KIND: &'static str = "fw";
}

/// One attribute of an fw filter's nested `TCA_OPTIONS`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcFilterFwOption {
    ClassId(u32),
    Police(Vec<TcPoliceOption>),
    Indev(Vec<u8>),
    Action(Vec<u8>),
    Mask(Vec<u8>),
    Other(DefaultNla),
}

impl Nla for TcFilterFwOption {
    fn value_len(&self) -> usize {
        match self {
            Self::ClassId(_) => 4,
            Self::Police(nlas) => nlas.as_slice().buffer_len(),
            Self::Indev(bytes) | Self::Action(bytes) | Self::Mask(bytes) => {
                bytes.len()
            }
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::ClassId(value) => NativeEndian::write_u32(buffer, *value),
            Self::Police(nlas) => nlas.as_slice().emit(buffer),
            Self::Indev(bytes) | Self::Action(bytes) | Self::Mask(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::ClassId(_) => TCA_FW_CLASSID,
            Self::Police(_) => TCA_FW_POLICE,
            Self::Indev(_) => TCA_FW_INDEV,
            Self::Action(_) => TCA_FW_ACT,
            Self::Mask(_) => TCA_FW_MASK,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for TcFilterFwOption
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_FW_CLASSID => Self::ClassId(
                parse_u32(payload).context("invalid TCA_FW_CLASSID")?,
            ),
            TCA_FW_POLICE => Self::Police(
                parse_police_options(payload)
                    .context("invalid TCA_FW_POLICE")?,
            ),
            TCA_FW_INDEV => Self::Indev(payload.to_vec()),
            TCA_FW_ACT => Self::Action(payload.to_vec()),
            TCA_FW_MASK => Self::Mask(payload.to_vec()),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for fw TCA_OPTIONS"
            ))?),
        })
    }
}
