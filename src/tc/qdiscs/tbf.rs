// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    traits::{Emitable, Parseable},
    DecodeError,
};

use crate::tc::psched::PschedClock;
use crate::tc::rtab::{
    build_rate_table, emit_u32_table, parse_u32_table, TcRateSpec,
    TC_RATE_SPEC_LEN,
};

const TCA_TBF_PARMS: u16 = 1;
const TCA_TBF_RTAB: u16 = 2;
const TCA_TBF_PTAB: u16 = 3;

pub(crate) const TC_TBF_QOPT_LEN: usize = 36;

buffer!(TcTbfQoptBuffer(TC_TBF_QOPT_LEN) {
    rate: (slice, 0..TC_RATE_SPEC_LEN),
    peak: (slice, TC_RATE_SPEC_LEN..24),
    limit: (u32, 24..28),
    buffer: (u32, 28..32),
    mtu: (u32, 32..TC_TBF_QOPT_LEN),
});

/// `struct tc_tbf_qopt`: token bucket parameters.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcTbfQopt {
    pub rate: TcRateSpec,
    pub peak: TcRateSpec,
    pub limit: u32,
    pub buffer: u32,
    pub mtu: u32,
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<TcTbfQoptBuffer<&'a T>>
    for TcTbfQopt
{
    fn parse(buf: &TcTbfQoptBuffer<&'a T>) -> Result<Self, DecodeError> {
        Ok(Self {
            rate: TcRateSpec::parse(buf.rate())?,
            peak: TcRateSpec::parse(buf.peak())?,
            limit: buf.limit(),
            buffer: buf.buffer(),
            mtu: buf.mtu(),
        })
    }
}

impl Emitable for TcTbfQopt {
    fn buffer_len(&self) -> usize {
        TC_TBF_QOPT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        self.rate.emit(&mut buffer[..TC_RATE_SPEC_LEN]);
        self.peak.emit(&mut buffer[TC_RATE_SPEC_LEN..24]);
        let mut buffer = TcTbfQoptBuffer::new(buffer);
        buffer.set_limit(self.limit);
        buffer.set_buffer(self.buffer);
        buffer.set_mtu(self.mtu);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub struct TcQdiscTbf {}

impl TcQdiscTbf {
    pub(crate) const KIND: &'static str = "tbf";

    /// Builds the full `TCA_OPTIONS` content for a tbf qdisc: the
    /// parameter block plus its derived rate table, and a peak table
    /// when a peak rate is set. The chosen cell logs are written back
    /// into the emitted parameters.
    pub fn build_options(
        mut parms: TcTbfQopt,
        clock: &PschedClock,
    ) -> Vec<TcQdiscTbfOption> {
        let mtu = parms.mtu;
        let rtab = build_rate_table(&mut parms.rate, mtu, clock);
        let ptab = if parms.peak.rate > 0 {
            Some(build_rate_table(&mut parms.peak, mtu, clock))
        } else {
            None
        };
        let mut options = vec![
            TcQdiscTbfOption::Parms(parms),
            TcQdiscTbfOption::Rtab(rtab),
        ];
        if let Some(ptab) = ptab {
            options.push(TcQdiscTbfOption::Ptab(ptab));
        }
        options
    }
}

/// One attribute of a tbf qdisc's nested `TCA_OPTIONS`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcQdiscTbfOption {
    Parms(TcTbfQopt),
    Rtab(Vec<u32>),
    Ptab(Vec<u32>),
    Other(DefaultNla),
}

impl Nla for TcQdiscTbfOption {
    fn value_len(&self) -> usize {
        match self {
            Self::Parms(parms) => parms.buffer_len(),
            Self::Rtab(table) | Self::Ptab(table) => 4 * table.len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Parms(parms) => parms.emit(buffer),
            Self::Rtab(table) | Self::Ptab(table) => {
                emit_u32_table(table, buffer)
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Parms(_) => TCA_TBF_PARMS,
            Self::Rtab(_) => TCA_TBF_RTAB,
            Self::Ptab(_) => TCA_TBF_PTAB,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for TcQdiscTbfOption
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_TBF_PARMS => Self::Parms(
                TcTbfQopt::parse(
                    &TcTbfQoptBuffer::new_checked(payload)
                        .context("invalid TCA_TBF_PARMS")?,
                )
                .context("invalid TCA_TBF_PARMS")?,
            ),
            TCA_TBF_RTAB => Self::Rtab(parse_u32_table(payload)),
            TCA_TBF_PTAB => Self::Ptab(parse_u32_table(payload)),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for tbf TCA_OPTIONS"
            ))?),
        })
    }
}
