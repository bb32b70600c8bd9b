// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer, NlasIterator},
    parsers::parse_string,
    traits::{Emitable, Parseable, ParseableParametrized},
    DecodeError,
};

use super::stats::TcStatsBuffer;
use super::{TcOptions, TcStats, TcStats2, TcXstats};

const TCA_KIND: u16 = 1;
pub(crate) const TCA_OPTIONS: u16 = 2;
const TCA_STATS: u16 = 3;
pub(crate) const TCA_XSTATS: u16 = 4;
const TCA_RATE: u16 = 5;
const TCA_FCNT: u16 = 6;
const TCA_STATS2: u16 = 7;
const TCA_STAB: u16 = 8;

/// One attribute of a traffic-control message.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcAttribute {
    /// Name of the queueing discipline
    Kind(String),
    /// Options, layout chosen by the kind
    Options(TcOptions),
    /// Legacy statistics block
    Stats(TcStats),
    /// Module-specific statistics, layout chosen by the kind
    Xstats(TcXstats),
    Rate(Vec<u8>),
    Fcnt(Vec<u8>),
    Stats2(Vec<TcStats2>),
    Stab(Vec<u8>),
    Other(DefaultNla),
}

impl Nla for TcAttribute {
    fn value_len(&self) -> usize {
        match self {
            Self::Kind(s) => s.len() + 1,
            Self::Options(options) => options.value_len(),
            Self::Stats(stats) => stats.buffer_len(),
            Self::Xstats(xstats) => xstats.value_len(),
            Self::Rate(bytes) | Self::Fcnt(bytes) | Self::Stab(bytes) => {
                bytes.len()
            }
            Self::Stats2(nlas) => nlas.as_slice().buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Kind(s) => {
                buffer[..s.len()].copy_from_slice(s.as_bytes());
                buffer[s.len()] = 0;
            }
            Self::Options(options) => options.emit_value(buffer),
            Self::Stats(stats) => stats.emit(buffer),
            Self::Xstats(xstats) => xstats.emit_value(buffer),
            Self::Rate(bytes) | Self::Fcnt(bytes) | Self::Stab(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }
            Self::Stats2(nlas) => nlas.as_slice().emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Kind(_) => TCA_KIND,
            Self::Options(options) => options.kind(),
            Self::Stats(_) => TCA_STATS,
            Self::Xstats(xstats) => xstats.kind(),
            Self::Rate(_) => TCA_RATE,
            Self::Fcnt(_) => TCA_FCNT,
            Self::Stats2(_) => TCA_STATS2,
            Self::Stab(_) => TCA_STAB,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> ParseableParametrized<NlaBuffer<&'a T>, &str>
    for TcAttribute
{
    fn parse_with_param(
        buf: &NlaBuffer<&'a T>,
        kind: &str,
    ) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_KIND => Self::Kind(
                parse_string(payload).context("invalid TCA_KIND")?,
            ),
            TCA_OPTIONS => Self::Options(
                TcOptions::parse_with_kind(payload, kind)
                    .context(format!("invalid TCA_OPTIONS for kind {kind}"))?,
            ),
            TCA_STATS => Self::Stats(
                TcStats::parse(
                    &TcStatsBuffer::new_checked(payload)
                        .context("invalid TCA_STATS")?,
                )
                .context("invalid TCA_STATS")?,
            ),
            TCA_XSTATS => Self::Xstats(
                TcXstats::parse_with_kind(payload, kind)
                    .context(format!("invalid TCA_XSTATS for kind {kind}"))?,
            ),
            TCA_RATE => Self::Rate(payload.to_vec()),
            TCA_FCNT => Self::Fcnt(payload.to_vec()),
            TCA_STATS2 => {
                let mut nlas = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla = nla.context("invalid TCA_STATS2")?;
                    nlas.push(TcStats2::parse(&nla)?);
                }
                Self::Stats2(nlas)
            }
            TCA_STAB => Self::Stab(payload.to_vec()),
            _ => Self::Other(
                DefaultNla::parse(buf).context("failed to parse tc NLA")?,
            ),
        })
    }
}
