// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer, NlasIterator},
    traits::{Emitable, Parseable},
    DecodeError,
};

use crate::tc::rtab::{TcRateSpec, TC_RATE_SPEC_LEN};

const TCA_POLICE_TBF: u16 = 1;
const TCA_POLICE_RATE: u16 = 2;
const TCA_POLICE_PEAKRATE: u16 = 3;
const TCA_POLICE_AVRATE: u16 = 4;
const TCA_POLICE_RESULT: u16 = 5;

pub(crate) const TC_POLICE_LEN: usize = 56;

buffer!(TcPoliceBuffer(TC_POLICE_LEN) {
    index: (u32, 0..4),
    action: (i32, 4..8),
    limit: (u32, 8..12),
    burst: (u32, 12..16),
    mtu: (u32, 16..20),
    rate: (slice, 20..32),
    peak: (slice, 32..44),
    refcnt: (i32, 44..48),
    bindcnt: (i32, 48..52),
    capab: (u32, 52..TC_POLICE_LEN),
});

/// `struct tc_police`: the token bucket of a policer action.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcPolice {
    pub index: u32,
    pub action: i32,
    pub limit: u32,
    pub burst: u32,
    pub mtu: u32,
    pub rate: TcRateSpec,
    pub peak: TcRateSpec,
    pub refcnt: i32,
    pub bindcnt: i32,
    pub capab: u32,
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<TcPoliceBuffer<&'a T>>
    for TcPolice
{
    fn parse(buf: &TcPoliceBuffer<&'a T>) -> Result<Self, DecodeError> {
        Ok(Self {
            index: buf.index(),
            action: buf.action(),
            limit: buf.limit(),
            burst: buf.burst(),
            mtu: buf.mtu(),
            rate: TcRateSpec::parse(buf.rate())?,
            peak: TcRateSpec::parse(buf.peak())?,
            refcnt: buf.refcnt(),
            bindcnt: buf.bindcnt(),
            capab: buf.capab(),
        })
    }
}

impl Emitable for TcPolice {
    fn buffer_len(&self) -> usize {
        TC_POLICE_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        self.rate.emit(&mut buffer[20..20 + TC_RATE_SPEC_LEN]);
        self.peak.emit(&mut buffer[32..32 + TC_RATE_SPEC_LEN]);
        let mut buffer = TcPoliceBuffer::new(buffer);
        buffer.set_index(self.index);
        buffer.set_action(self.action);
        buffer.set_limit(self.limit);
        buffer.set_burst(self.burst);
        buffer.set_mtu(self.mtu);
        buffer.set_refcnt(self.refcnt);
        buffer.set_bindcnt(self.bindcnt);
        buffer.set_capab(self.capab);
    }
}

/// One attribute of a filter's nested `TCA_*_POLICE` container. The rate
/// tables travel opaque, as the kernel consumes them verbatim.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcPoliceOption {
    Tbf(TcPolice),
    Rate(Vec<u8>),
    PeakRate(Vec<u8>),
    AvRate(Vec<u8>),
    Result(Vec<u8>),
    Other(DefaultNla),
}

impl Nla for TcPoliceOption {
    fn value_len(&self) -> usize {
        match self {
            Self::Tbf(police) => police.buffer_len(),
            Self::Rate(bytes)
            | Self::PeakRate(bytes)
            | Self::AvRate(bytes)
            | Self::Result(bytes) => bytes.len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Tbf(police) => police.emit(buffer),
            Self::Rate(bytes)
            | Self::PeakRate(bytes)
            | Self::AvRate(bytes)
            | Self::Result(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Tbf(_) => TCA_POLICE_TBF,
            Self::Rate(_) => TCA_POLICE_RATE,
            Self::PeakRate(_) => TCA_POLICE_PEAKRATE,
            Self::AvRate(_) => TCA_POLICE_AVRATE,
            Self::Result(_) => TCA_POLICE_RESULT,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for TcPoliceOption
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_POLICE_TBF => Self::Tbf(
                TcPolice::parse(
                    &TcPoliceBuffer::new_checked(payload)
                        .context("invalid TCA_POLICE_TBF")?,
                )
                .context("invalid TCA_POLICE_TBF")?,
            ),
            TCA_POLICE_RATE => Self::Rate(payload.to_vec()),
            TCA_POLICE_PEAKRATE => Self::PeakRate(payload.to_vec()),
            TCA_POLICE_AVRATE => Self::AvRate(payload.to_vec()),
            TCA_POLICE_RESULT => Self::Result(payload.to_vec()),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for police attributes"
            ))?),
        })
    }
}

pub(crate) fn parse_police_options(
    payload: &[u8],
) -> Result<Vec<TcPoliceOption>, DecodeError> {
    let mut nlas = Vec::new();
    for nla in NlasIterator::new(payload) {
        let nla = nla.context("invalid police attributes")?;
        nlas.push(TcPoliceOption::parse(&nla)?);
    }
    Ok(nlas)
}
