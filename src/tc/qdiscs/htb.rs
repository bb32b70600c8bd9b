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

const TCA_HTB_PARMS: u16 = 1;
const TCA_HTB_INIT: u16 = 2;
const TCA_HTB_CTAB: u16 = 3;
const TCA_HTB_RTAB: u16 = 4;

pub(crate) const TC_HTB_OPT_LEN: usize = 44;

buffer!(TcHtbOptBuffer(TC_HTB_OPT_LEN) {
    rate: (slice, 0..TC_RATE_SPEC_LEN),
    ceil: (slice, TC_RATE_SPEC_LEN..24),
    buffer: (u32, 24..28),
    cbuffer: (u32, 28..32),
    quantum: (u32, 32..36),
    level: (u32, 36..40),
    prio: (u32, 40..TC_HTB_OPT_LEN),
});

/// `struct tc_htb_opt`: per-class htb parameters.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcHtbOpt {
    pub rate: TcRateSpec,
    pub ceil: TcRateSpec,
    pub buffer: u32,
    pub cbuffer: u32,
    pub quantum: u32,
    pub level: u32,
    pub prio: u32,
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<TcHtbOptBuffer<&'a T>>
    for TcHtbOpt
{
    fn parse(buf: &TcHtbOptBuffer<&'a T>) -> Result<Self, DecodeError> {
        Ok(Self {
            rate: TcRateSpec::parse(buf.rate())?,
            ceil: TcRateSpec::parse(buf.ceil())?,
            buffer: buf.buffer(),
            cbuffer: buf.cbuffer(),
            quantum: buf.quantum(),
            level: buf.level(),
            prio: buf.prio(),
        })
    }
}

impl Emitable for TcHtbOpt {
    fn buffer_len(&self) -> usize {
        TC_HTB_OPT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        self.rate.emit(&mut buffer[..TC_RATE_SPEC_LEN]);
        self.ceil.emit(&mut buffer[TC_RATE_SPEC_LEN..24]);
        let mut buffer = TcHtbOptBuffer::new(buffer);
        buffer.set_buffer(self.buffer);
        buffer.set_cbuffer(self.cbuffer);
        buffer.set_quantum(self.quantum);
        buffer.set_level(self.level);
        buffer.set_prio(self.prio);
    }
}

pub(crate) const TC_HTB_GLOB_LEN: usize = 20;

buffer!(TcHtbGlobBuffer(TC_HTB_GLOB_LEN) {
    version: (u32, 0..4),
    rate2quantum: (u32, 4..8),
    defcls: (u32, 8..12),
    debug: (u32, 12..16),
    direct_pkts: (u32, 16..TC_HTB_GLOB_LEN),
});

/// `struct tc_htb_glob`: qdisc-wide htb parameters.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub struct TcHtbGlob {
    pub version: u32,
    pub rate2quantum: u32,
    pub defcls: u32,
    pub debug: u32,
    pub direct_pkts: u32,
}

impl Default for TcHtbGlob {
    fn default() -> Self {
        Self {
            version: 3,
            rate2quantum: 0xa,
            defcls: 0x10,
            debug: 0,
            direct_pkts: 0,
        }
    }
}

impl<T: AsRef<[u8]>> Parseable<TcHtbGlobBuffer<T>> for TcHtbGlob {
    fn parse(buf: &TcHtbGlobBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            version: buf.version(),
            rate2quantum: buf.rate2quantum(),
            defcls: buf.defcls(),
            debug: buf.debug(),
            direct_pkts: buf.direct_pkts(),
        })
    }
}

impl Emitable for TcHtbGlob {
    fn buffer_len(&self) -> usize {
        TC_HTB_GLOB_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcHtbGlobBuffer::new(buffer);
        buffer.set_version(self.version);
        buffer.set_rate2quantum(self.rate2quantum);
        buffer.set_defcls(self.defcls);
        buffer.set_debug(self.debug);
        buffer.set_direct_pkts(self.direct_pkts);
    }
}

pub(crate) const TC_HTB_XSTATS_LEN: usize = 20;

buffer!(TcHtbXstatsBuffer(TC_HTB_XSTATS_LEN) {
    lends: (u32, 0..4),
    borrows: (u32, 4..8),
    giants: (u32, 8..12),
    tokens: (u32, 12..16),
    ctokens: (u32, 16..TC_HTB_XSTATS_LEN),
});

/// htb's `TCA_XSTATS` block.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcHtbXstats {
    pub lends: u32,
    pub borrows: u32,
    pub giants: u32,
    pub tokens: u32,
    pub ctokens: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcHtbXstatsBuffer<T>> for TcHtbXstats {
    fn parse(buf: &TcHtbXstatsBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            lends: buf.lends(),
            borrows: buf.borrows(),
            giants: buf.giants(),
            tokens: buf.tokens(),
            ctokens: buf.ctokens(),
        })
    }
}

impl Emitable for TcHtbXstats {
    fn buffer_len(&self) -> usize {
        TC_HTB_XSTATS_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcHtbXstatsBuffer::new(buffer);
        buffer.set_lends(self.lends);
        buffer.set_borrows(self.borrows);
        buffer.set_giants(self.giants);
        buffer.set_tokens(self.tokens);
        buffer.set_ctokens(self.ctokens);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub struct TcQdiscHtb {}

impl TcQdiscHtb {
    pub(crate) const KIND: &'static str = "htb";

    /// `TCA_OPTIONS` content for creating the htb qdisc itself.
    pub fn build_init_options(glob: TcHtbGlob) -> Vec<TcQdiscHtbOption> {
        vec![TcQdiscHtbOption::Init(glob)]
    }

    /// `TCA_OPTIONS` content for an htb class: the parameter block, its
    /// rate table, and a ceil table when a ceil rate is set.
    pub fn build_class_options(
        mut parms: TcHtbOpt,
        clock: &PschedClock,
    ) -> Vec<TcQdiscHtbOption> {
        let rtab = build_rate_table(&mut parms.rate, 0, clock);
        let ctab = if parms.ceil.rate > 0 {
            Some(build_rate_table(&mut parms.ceil, 0, clock))
        } else {
            None
        };
        let mut options = vec![
            TcQdiscHtbOption::Parms(parms),
            TcQdiscHtbOption::Rtab(rtab),
        ];
        if let Some(ctab) = ctab {
            options.push(TcQdiscHtbOption::Ctab(ctab));
        }
        options
    }
}

/// One attribute of an htb qdisc's nested `TCA_OPTIONS`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcQdiscHtbOption {
    Parms(TcHtbOpt),
    Init(TcHtbGlob),
    Ctab(Vec<u32>),
    Rtab(Vec<u32>),
    Other(DefaultNla),
}

impl Nla for TcQdiscHtbOption {
    fn value_len(&self) -> usize {
        match self {
            Self::Parms(parms) => parms.buffer_len(),
            Self::Init(glob) => glob.buffer_len(),
            Self::Ctab(table) | Self::Rtab(table) => 4 * table.len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Parms(parms) => parms.emit(buffer),
            Self::Init(glob) => glob.emit(buffer),
            Self::Ctab(table) | Self::Rtab(table) => {
                emit_u32_table(table, buffer)
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Parms(_) => TCA_HTB_PARMS,
            Self::Init(_) => TCA_HTB_INIT,
            Self::Ctab(_) => TCA_HTB_CTAB,
            Self::Rtab(_) => TCA_HTB_RTAB,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for TcQdiscHtbOption
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_HTB_PARMS => Self::Parms(
                TcHtbOpt::parse(
                    &TcHtbOptBuffer::new_checked(payload)
                        .context("invalid TCA_HTB_PARMS")?,
                )
                .context("invalid TCA_HTB_PARMS")?,
            ),
            TCA_HTB_INIT => Self::Init(
                TcHtbGlob::parse(
                    &TcHtbGlobBuffer::new_checked(payload)
                        .context("invalid TCA_HTB_INIT")?,
                )
                .context("invalid TCA_HTB_INIT")?,
            ),
            TCA_HTB_CTAB => Self::Ctab(parse_u32_table(payload)),
            TCA_HTB_RTAB => Self::Rtab(parse_u32_table(payload)),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for htb TCA_OPTIONS"
            ))?),
        })
    }
}
