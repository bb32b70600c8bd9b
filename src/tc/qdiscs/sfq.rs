// SPDX-License-Identifier: MIT

use netlink_packet_utils::{
    traits::{Emitable, Parseable},
    DecodeError,
};

pub(crate) const TC_SFQ_QOPT_LEN: usize = 20;
pub(crate) const TC_SFQ_QOPT_V1_LEN: usize = 72;

buffer!(TcSfqQoptBuffer(TC_SFQ_QOPT_LEN) {
    quantum: (u32, 0..4),
    perturb_period: (i32, 4..8),
    limit: (u32, 8..12),
    divisor: (u32, 12..16),
    flows: (u32, 16..TC_SFQ_QOPT_LEN),
});

/// Options of the `sfq` qdisc, original layout (`struct tc_sfq_qopt`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcQdiscSfqV0 {
    pub quantum: u32,
    pub perturb_period: i32,
    pub limit: u32,
    pub divisor: u32,
    pub flows: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcSfqQoptBuffer<T>> for TcQdiscSfqV0 {
    fn parse(buf: &TcSfqQoptBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            quantum: buf.quantum(),
            perturb_period: buf.perturb_period(),
            limit: buf.limit(),
            divisor: buf.divisor(),
            flows: buf.flows(),
        })
    }
}

impl Emitable for TcQdiscSfqV0 {
    fn buffer_len(&self) -> usize {
        TC_SFQ_QOPT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcSfqQoptBuffer::new(buffer);
        buffer.set_quantum(self.quantum);
        buffer.set_perturb_period(self.perturb_period);
        buffer.set_limit(self.limit);
        buffer.set_divisor(self.divisor);
        buffer.set_flows(self.flows);
    }
}

buffer!(TcSfqQoptV1Buffer(TC_SFQ_QOPT_V1_LEN) {
    quantum: (u32, 0..4),
    perturb_period: (i32, 4..8),
    limit_v0: (u32, 8..12),
    divisor: (u32, 12..16),
    flows: (u32, 16..20),
    depth: (u32, 20..24),
    headdrop: (u32, 24..28),
    limit_v1: (u32, 28..32),
    qth_min: (u32, 32..36),
    qth_max: (u32, 36..40),
    wlog: (u8, 40),
    plog: (u8, 41),
    scell_log: (u8, 42),
    flags: (u8, 43),
    max_p: (u32, 44..48),
    prob_drop: (u32, 48..52),
    forced_drop: (u32, 52..56),
    prob_mark: (u32, 56..60),
    forced_mark: (u32, 60..64),
    prob_mark_head: (u32, 64..68),
    forced_mark_head: (u32, 68..TC_SFQ_QOPT_V1_LEN),
});

/// Options of the `sfq` qdisc, extended layout (`struct tc_sfq_qopt_v1`
/// with its RED parameters and statistics).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcQdiscSfqV1 {
    pub quantum: u32,
    pub perturb_period: i32,
    pub limit_v0: u32,
    pub divisor: u32,
    pub flows: u32,
    pub depth: u32,
    pub headdrop: u32,
    pub limit_v1: u32,
    pub qth_min: u32,
    pub qth_max: u32,
    pub wlog: u8,
    pub plog: u8,
    pub scell_log: u8,
    pub flags: u8,
    pub max_p: u32,
    pub prob_drop: u32,
    pub forced_drop: u32,
    pub prob_mark: u32,
    pub forced_mark: u32,
    pub prob_mark_head: u32,
    pub forced_mark_head: u32,
}

impl<T: AsRef<[u8]>> Parseable<TcSfqQoptV1Buffer<T>> for TcQdiscSfqV1 {
    fn parse(buf: &TcSfqQoptV1Buffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            quantum: buf.quantum(),
            perturb_period: buf.perturb_period(),
            limit_v0: buf.limit_v0(),
            divisor: buf.divisor(),
            flows: buf.flows(),
            depth: buf.depth(),
            headdrop: buf.headdrop(),
            limit_v1: buf.limit_v1(),
            qth_min: buf.qth_min(),
            qth_max: buf.qth_max(),
            wlog: buf.wlog(),
            plog: buf.plog(),
            scell_log: buf.scell_log(),
            flags: buf.flags(),
            max_p: buf.max_p(),
            prob_drop: buf.prob_drop(),
            forced_drop: buf.forced_drop(),
            prob_mark: buf.prob_mark(),
            forced_mark: buf.forced_mark(),
            prob_mark_head: buf.prob_mark_head(),
            forced_mark_head: buf.forced_mark_head(),
        })
    }
}

impl Emitable for TcQdiscSfqV1 {
    fn buffer_len(&self) -> usize {
        TC_SFQ_QOPT_V1_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcSfqQoptV1Buffer::new(buffer);
        buffer.set_quantum(self.quantum);
        buffer.set_perturb_period(self.perturb_period);
        buffer.set_limit_v0(self.limit_v0);
        buffer.set_divisor(self.divisor);
        buffer.set_flows(self.flows);
        buffer.set_depth(self.depth);
        buffer.set_headdrop(self.headdrop);
        buffer.set_limit_v1(self.limit_v1);
        buffer.set_qth_min(self.qth_min);
        buffer.set_qth_max(self.qth_max);
        buffer.set_wlog(self.wlog);
        buffer.set_plog(self.plog);
        buffer.set_scell_log(self.scell_log);
        buffer.set_flags(self.flags);
        buffer.set_max_p(self.max_p);
        buffer.set_prob_drop(self.prob_drop);
        buffer.set_forced_drop(self.forced_drop);
        buffer.set_prob_mark(self.prob_mark);
        buffer.set_forced_mark(self.forced_mark);
        buffer.set_prob_mark_head(self.prob_mark_head);
        buffer.set_forced_mark_head(self.forced_mark_head);
    }
}

/// Options of the `sfq` qdisc. The kernel distinguishes the two layouts
/// by the attribute value length, and so does the codec.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum TcQdiscSfq {
    V0(TcQdiscSfqV0),
    V1(TcQdiscSfqV1),
}

impl TcQdiscSfq {
    pub(crate) const KIND: &'static str = "sfq";
}

impl<T: AsRef<[u8]> + ?Sized> Parseable<T> for TcQdiscSfq {
    fn parse(buf: &T) -> Result<Self, DecodeError> {
        let payload = buf.as_ref();
        if payload.len() >= TC_SFQ_QOPT_V1_LEN {
            Ok(Self::V1(TcQdiscSfqV1::parse(&TcSfqQoptV1Buffer::new(
                payload,
            ))?))
        } else {
            Ok(Self::V0(TcQdiscSfqV0::parse(
                &TcSfqQoptBuffer::new_checked(payload)?,
            )?))
        }
    }
}

impl Emitable for TcQdiscSfq {
    fn buffer_len(&self) -> usize {
        match self {
            Self::V0(qopt) => qopt.buffer_len(),
            Self::V1(qopt) => qopt.buffer_len(),
        }
    }

    fn emit(&self, buffer: &mut [u8]) {
        match self {
            Self::V0(qopt) => qopt.emit(buffer),
            Self::V1(qopt) => qopt.emit(buffer),
        }
    }
}
