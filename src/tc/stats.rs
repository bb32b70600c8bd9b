// SPDX-License-Identifier: MIT

use anyhow::Context;
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    traits::{Emitable, Parseable},
    DecodeError,
};

const TCA_STATS_BASIC: u16 = 1;
const TCA_STATS_RATE_EST: u16 = 2;
const TCA_STATS_QUEUE: u16 = 3;
const TCA_STATS_APP: u16 = 4;

pub(crate) const TC_STATS_LEN: usize = 36;

buffer!(TcStatsBuffer(TC_STATS_LEN) {
    bytes: (u64, 0..8),
    packets: (u32, 8..12),
    drops: (u32, 12..16),
    overlimits: (u32, 16..20),
    bps: (u32, 20..24),
    pps: (u32, 24..28),
    qlen: (u32, 28..32),
    backlog: (u32, 32..TC_STATS_LEN),
});

/// Generic qdisc statistics, the legacy `TCA_STATS` block.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcStats {
    pub bytes: u64,
    pub packets: u32,
    pub drops: u32,
    /// Number of throttle events when this flow went over limit
    pub overlimits: u32,
    pub bps: u32,
    pub pps: u32,
    pub qlen: u32,
    pub backlog: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcStatsBuffer<T>> for TcStats {
    fn parse(buf: &TcStatsBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            bytes: buf.bytes(),
            packets: buf.packets(),
            drops: buf.drops(),
            overlimits: buf.overlimits(),
            bps: buf.bps(),
            pps: buf.pps(),
            qlen: buf.qlen(),
            backlog: buf.backlog(),
        })
    }
}

impl Emitable for TcStats {
    fn buffer_len(&self) -> usize {
        TC_STATS_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcStatsBuffer::new(buffer);
        buffer.set_bytes(self.bytes);
        buffer.set_packets(self.packets);
        buffer.set_drops(self.drops);
        buffer.set_overlimits(self.overlimits);
        buffer.set_bps(self.bps);
        buffer.set_pps(self.pps);
        buffer.set_qlen(self.qlen);
        buffer.set_backlog(self.backlog);
    }
}

pub(crate) const TC_STATS_BASIC_LEN: usize = 16;

buffer!(TcStatsBasicBuffer(TC_STATS_BASIC_LEN) {
    bytes: (u64, 0..8),
    packets: (u64, 8..TC_STATS_BASIC_LEN),
});

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcStatsBasic {
    pub bytes: u64,
    pub packets: u64,
}

impl<T: AsRef<[u8]>> Parseable<TcStatsBasicBuffer<T>> for TcStatsBasic {
    fn parse(buf: &TcStatsBasicBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            bytes: buf.bytes(),
            packets: buf.packets(),
        })
    }
}

impl Emitable for TcStatsBasic {
    fn buffer_len(&self) -> usize {
        TC_STATS_BASIC_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcStatsBasicBuffer::new(buffer);
        buffer.set_bytes(self.bytes);
        buffer.set_packets(self.packets);
    }
}

pub(crate) const TC_STATS_RATE_EST_LEN: usize = 8;

buffer!(TcStatsRateEstBuffer(TC_STATS_RATE_EST_LEN) {
    bps: (u32, 0..4),
    pps: (u32, 4..TC_STATS_RATE_EST_LEN),
});

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcStatsRateEst {
    pub bps: u32,
    pub pps: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcStatsRateEstBuffer<T>> for TcStatsRateEst {
    fn parse(buf: &TcStatsRateEstBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            bps: buf.bps(),
            pps: buf.pps(),
        })
    }
}

impl Emitable for TcStatsRateEst {
    fn buffer_len(&self) -> usize {
        TC_STATS_RATE_EST_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcStatsRateEstBuffer::new(buffer);
        buffer.set_bps(self.bps);
        buffer.set_pps(self.pps);
    }
}

pub(crate) const TC_STATS_QUEUE_LEN: usize = 20;

buffer!(TcStatsQueueBuffer(TC_STATS_QUEUE_LEN) {
    qlen: (u32, 0..4),
    backlog: (u32, 4..8),
    drops: (u32, 8..12),
    requeues: (u32, 12..16),
    overlimits: (u32, 16..TC_STATS_QUEUE_LEN),
});

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcStatsQueue {
    pub qlen: u32,
    pub backlog: u32,
    pub drops: u32,
    pub requeues: u32,
    pub overlimits: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcStatsQueueBuffer<T>> for TcStatsQueue {
    fn parse(buf: &TcStatsQueueBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            qlen: buf.qlen(),
            backlog: buf.backlog(),
            drops: buf.drops(),
            requeues: buf.requeues(),
            overlimits: buf.overlimits(),
        })
    }
}

impl Emitable for TcStatsQueue {
    fn buffer_len(&self) -> usize {
        TC_STATS_QUEUE_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcStatsQueueBuffer::new(buffer);
        buffer.set_qlen(self.qlen);
        buffer.set_backlog(self.backlog);
        buffer.set_drops(self.drops);
        buffer.set_requeues(self.requeues);
        buffer.set_overlimits(self.overlimits);
    }
}

/// One entry of the `TCA_STATS2` container.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum TcStats2 {
    Basic(TcStatsBasic),
    RateEst(TcStatsRateEst),
    Queue(TcStatsQueue),
    App(Vec<u8>),
    Other(DefaultNla),
}

impl Nla for TcStats2 {
    fn value_len(&self) -> usize {
        match self {
            Self::Basic(nla) => nla.buffer_len(),
            Self::RateEst(nla) => nla.buffer_len(),
            Self::Queue(nla) => nla.buffer_len(),
            Self::App(bytes) => bytes.len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Basic(nla) => nla.emit(buffer),
            Self::RateEst(nla) => nla.emit(buffer),
            Self::Queue(nla) => nla.emit(buffer),
            Self::App(bytes) => buffer.copy_from_slice(bytes.as_slice()),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Basic(_) => TCA_STATS_BASIC,
            Self::RateEst(_) => TCA_STATS_RATE_EST,
            Self::Queue(_) => TCA_STATS_QUEUE,
            Self::App(_) => TCA_STATS_APP,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for TcStats2 {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            TCA_STATS_BASIC => Self::Basic(
                TcStatsBasic::parse(
                    &TcStatsBasicBuffer::new_checked(payload)
                        .context("invalid TCA_STATS_BASIC")?,
                )
                .context("invalid TCA_STATS_BASIC")?,
            ),
            TCA_STATS_RATE_EST => Self::RateEst(
                TcStatsRateEst::parse(
                    &TcStatsRateEstBuffer::new_checked(payload)
                        .context("invalid TCA_STATS_RATE_EST")?,
                )
                .context("invalid TCA_STATS_RATE_EST")?,
            ),
            TCA_STATS_QUEUE => Self::Queue(
                TcStatsQueue::parse(
                    &TcStatsQueueBuffer::new_checked(payload)
                        .context("invalid TCA_STATS_QUEUE")?,
                )
                .context("invalid TCA_STATS_QUEUE")?,
            ),
            TCA_STATS_APP => Self::App(payload.to_vec()),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for TCA_STATS2"
            ))?),
        })
    }
}
