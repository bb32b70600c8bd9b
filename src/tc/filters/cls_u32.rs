// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{BigEndian, ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::parse_u32,
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::police::{parse_police_options, TcPoliceOption};

const TCA_U32_CLASSID: u16 = 1;
const TCA_U32_HASH: u16 = 2;
const TCA_U32_LINK: u16 = 3;
const TCA_U32_DIVISOR: u16 = 4;
const TCA_U32_SEL: u16 = 5;
const TCA_U32_POLICE: u16 = 6;
const TCA_U32_ACT: u16 = 7;
const TCA_U32_INDEV: u16 = 8;
const TCA_U32_PCNT: u16 = 9;
const TCA_U32_MARK: u16 = 10;

pub(crate) const TC_U32_SEL_LEN: usize = 16;
pub(crate) const TC_U32_KEY_LEN: usize = 16;

/// One match key of a u32 selector (`struct tc_u32_key`). Mask and
/// value are big-endian on the wire, matching the packet bytes they are
/// compared against.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcU32Key {
    pub mask: u32,
    pub val: u32,
    pub off: i32,
    pub offmask: i32,
}

impl Emitable for TcU32Key {
    fn buffer_len(&self) -> usize {
        TC_U32_KEY_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        BigEndian::write_u32(&mut buffer[0..4], self.mask);
        BigEndian::write_u32(&mut buffer[4..8], self.val);
        NativeEndian::write_i32(&mut buffer[8..12], self.off);
        NativeEndian::write_i32(&mut buffer[12..16], self.offmask);
    }
}

impl<T: AsRef<[u8]> + ?Sized> Parseable<T> for TcU32Key {
    fn parse(buf: &T) -> Result<Self, DecodeError> {
        let payload = buf.as_ref();
        if payload.len() < TC_U32_KEY_LEN {
            return Err(format!(
                "invalid tc_u32_key length {}",
                payload.len()
            )
            .into());
        }
        Ok(Self {
            mask: BigEndian::read_u32(&payload[0..4]),
            val: BigEndian::read_u32(&payload[4..8]),
            off: NativeEndian::read_i32(&payload[8..12]),
            offmask: NativeEndian::read_i32(&payload[12..16]),
        })
    }
}

/// `struct tc_u32_sel` followed by its keys. The offset mask and hash
/// mask are big-endian on the wire, like the key masks.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[non_exhaustive]
pub struct TcU32Selector {
    pub flags: u8,
    pub offshift: u8,
    pub offmask: u16,
    pub off: u16,
    pub offoff: i16,
    pub hoff: i16,
    pub hmask: u32,
    pub keys: Vec<TcU32Key>,
}

impl Emitable for TcU32Selector {
    fn buffer_len(&self) -> usize {
        TC_U32_SEL_LEN + TC_U32_KEY_LEN * self.keys.len()
    }

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.flags;
        buffer[1] = self.offshift;
        buffer[2] = self.keys.len() as u8;
        buffer[3] = 0;
        BigEndian::write_u16(&mut buffer[4..6], self.offmask);
        NativeEndian::write_u16(&mut buffer[6..8], self.off);
        NativeEndian::write_i16(&mut buffer[8..10], self.offoff);
        NativeEndian::write_i16(&mut buffer[10..12], self.hoff);
        BigEndian::write_u32(&mut buffer[12..16], self.hmask);
        for (i, key) in self.keys.iter().enumerate() {
            key.emit(
                &mut buffer[TC_U32_SEL_LEN + i * TC_U32_KEY_LEN
                    ..TC_U32_SEL_LEN + (i + 1) * TC_U32_KEY_LEN],
            );
        }
    }
}

impl<T: AsRef<[u8]> + ?Sized> Parseable<T> for TcU32Selector {
    fn parse(buf: &T) -> Result<Self, DecodeError> {
        let payload = buf.as_ref();
        if payload.len() < TC_U32_SEL_LEN {
            return Err(format!(
                "invalid tc_u32_sel length {}",
                payload.len()
            )
            .into());
        }
        let nkeys = payload[2] as usize;
        let needed = TC_U32_SEL_LEN + nkeys * TC_U32_KEY_LEN;
        if payload.len() < needed {
            return Err(format!(
                "tc_u32_sel declares {nkeys} keys but carries {} bytes",
                payload.len()
            )
            .into());
        }
        let mut keys = Vec::with_capacity(nkeys);
        for i in 0..nkeys {
            keys.push(TcU32Key::parse(
                &payload[TC_U32_SEL_LEN + i * TC_U32_KEY_LEN
                    ..TC_U32_SEL_LEN + (i + 1) * TC_U32_KEY_LEN],
            )?);
        }
        Ok(Self {
            flags: payload[0],
            offshift: payload[1],
            offmask: BigEndian::read_u16(&payload[4..6]),
            off: NativeEndian::read_u16(&payload[6..8]),
            offoff: NativeEndian::read_i16(&payload[8..10]),
            hoff: NativeEndian::read_i16(&payload[10..12]),
            hmask: BigEndian::read_u32(&payload[12..16]),
            keys,
        })
    }
}

pub(crate) const TC_U32_MARK_LEN: usize = 12;

buffer!(TcU32MarkBuffer(TC_U32_MARK_LEN) {
    val: (u32, 0..4),
    mask: (u32, 4..8),
    success: (u32, 8..TC_U32_MARK_LEN),
});

/// `struct tc_u32_mark`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcU32Mark {
    pub val: u32,
    pub mask: u32,
    pub success: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcU32MarkBuffer<T>> for TcU32Mark {
    fn parse(buf: &TcU32MarkBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            val: buf.val(),
            mask: buf.mask(),
            success: buf.success(),
        })
    }
}

impl Emitable for TcU32Mark {
    fn buffer_len(&self) -> usize {
        TC_U32_MARK_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcU32MarkBuffer::new(buffer);
        buffer.set_val(self.val);
        buffer.set_mask(self.mask);
        buffer.set_success(self.success);
    }
}

pub(crate) const TC_U32_PCNT_LEN: usize = 24;

buffer!(TcU32PcntBuffer(TC_U32_PCNT_LEN) {
    rcnt: (u64, 0..8),
    rhit: (u64, 8..16),
    kcnts: (u64, 16..TC_U32_PCNT_LEN),
});

/// `struct tc_u32_pcnt` with a single per-key counter.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcU32Pcnt {
    pub rcnt: u64,
    pub rhit: u64,
    pub kcnts: u64,
}

impl<T: AsRef<[u8]>> Parseable<TcU32PcntBuffer<T>> for TcU32Pcnt {
    fn parse(buf: &TcU32PcntBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            rcnt: buf.rcnt(),
            rhit: buf.rhit(),
            kcnts: buf.kcnts(),
        })
    }
}

impl Emitable for TcU32Pcnt {
    fn buffer_len(&self) -> usize {
        TC_U32_PCNT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcU32PcntBuffer::new(buffer);
        buffer.set_rcnt(self.rcnt);
        buffer.set_rhit(self.rhit);
        buffer.set_kcnts(self.kcnts);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub struct TcFilterU32 {}

impl TcFilterU32 {
    pub(crate) const KIND: &'static str = "u32";
}

/// One attribute of a u32 filter's nested `TCA_OPTIONS`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcFilterU32Option {
    ClassId(u32),
    Hash(u32),
    Link(Vec<u8>),
    Divisor(u32),
    Selector(TcU32Selector),
    Police(Vec<TcPoliceOption>),
    Action(Vec<u8>),
    Indev(Vec<u8>),
    Pcnt(TcU32Pcnt),
    Mark(TcU32Mark),
    Other(DefaultNla),
}

impl Nla for TcFilterU32Option {
    fn value_len(&self) -> usize {
        match self {
            Self::ClassId(_) | Self::Hash(_) | Self::Divisor(_) => 4,
            Self::Link(bytes) | Self::Action(bytes) | Self::Indev(bytes) => {
                bytes.len()
            }
            Self::Selector(sel) => sel.buffer_len(),
            Self::Police(nlas) => nlas.as_slice().buffer_len(),
            Self::Pcnt(pcnt) => pcnt.buffer_len(),
            Self::Mark(mark) => mark.buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::ClassId(value) | Self::Hash(value) | Self::Divisor(value) => {
                NativeEndian::write_u32(buffer, *value)
            }
            Self::Link(bytes) | Self::Action(bytes) | Self::Indev(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }
            Self::Selector(sel) => sel.emit(buffer),
            Self::Police(nlas) => nlas.as_slice().emit(buffer),
            Self::Pcnt(pcnt) => pcnt.emit(buffer),
            Self::Mark(mark) => mark.emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::ClassId(_) => TCA_U32_CLASSID,
            Self::Hash(_) => TCA_U32_HASH,
            Self::Link(_) => TCA_U32_LINK,
            Self::Divisor(_) => TCA_U32_DIVISOR,
            Self::Selector(_) => TCA_U32_SEL,
            Self::Police(_) => TCA_U32_POLICE,
            Self::Action(_) => TCA_U32_ACT,
            Self::Indev(_) => TCA_U32_INDEV,
            Self::Pcnt(_) => TCA_U32_PCNT,
            Self::Mark(_) => TCA_U32_MARK,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for TcFilterU32Option
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_U32_CLASSID => Self::ClassId(
                parse_u32(payload).context("invalid TCA_U32_CLASSID")?,
            ),
            TCA_U32_HASH => Self::Hash(
                parse_u32(payload).context("invalid TCA_U32_HASH")?,
            ),
            TCA_U32_LINK => Self::Link(payload.to_vec()),
            TCA_U32_DIVISOR => Self::Divisor(
                parse_u32(payload).context("invalid TCA_U32_DIVISOR")?,
            ),
            TCA_U32_SEL => Self::Selector(
                TcU32Selector::parse(payload)
                    .context("invalid TCA_U32_SEL")?,
            ),
            TCA_U32_POLICE => Self::Police(
                parse_police_options(payload)
                    .context("invalid TCA_U32_POLICE")?,
            ),
            TCA_U32_ACT => Self::Action(payload.to_vec()),
            TCA_U32_INDEV => Self::Indev(payload.to_vec()),
            TCA_U32_PCNT => Self::Pcnt(
                TcU32Pcnt::parse(
                    &TcU32PcntBuffer::new_checked(payload)
                        .context("invalid TCA_U32_PCNT")?,
                )
                .context("invalid TCA_U32_PCNT")?,
            ),
            TCA_U32_MARK => Self::Mark(
                TcU32Mark::parse(
                    &TcU32MarkBuffer::new_checked(payload)
                        .context("invalid TCA_U32_MARK")?,
                )
                .context("invalid TCA_U32_MARK")?,
            ),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for u32 TCA_OPTIONS"
            ))?),
        })
    }
}
