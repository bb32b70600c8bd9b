// SPDX-License-Identifier: MIT

use netlink_packet_utils::{
    traits::{Emitable, Parseable},
    DecodeError,
};

pub(crate) const TC_PRIO_QOPT_LEN: usize = 20;

buffer!(TcPrioQoptBuffer(TC_PRIO_QOPT_LEN) {
    bands: (i32, 0..4),
    priomap: (slice, 4..TC_PRIO_QOPT_LEN),
});

/// Options of the `pfifo_fast` qdisc (`struct tc_prio_qopt`): a raw
/// block, not a nested attribute set.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub struct TcQdiscPfifoFast {
    pub bands: i32,
    /// Priority to band mapping
    pub priomap: [u8; 16],
}

impl TcQdiscPfifoFast {
    pub(crate) const KIND: &'static str = "pfifo_fast";
}

impl Default for TcQdiscPfifoFast {
    fn default() -> Self {
        Self {
            bands: 3,
            priomap: [
                1, 2, 2, 2, 1, 2, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1,
            ],
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<TcPrioQoptBuffer<&'a T>>
    for TcQdiscPfifoFast
{
    fn parse(buf: &TcPrioQoptBuffer<&'a T>) -> Result<Self, DecodeError> {
        let mut priomap = [0u8; 16];
        priomap.copy_from_slice(buf.priomap());
        Ok(Self {
            bands: buf.bands(),
            priomap,
        })
    }
}

impl Emitable for TcQdiscPfifoFast {
    fn buffer_len(&self) -> usize {
        TC_PRIO_QOPT_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = TcPrioQoptBuffer::new(buffer);
        buffer.set_bands(self.bands);
        buffer.priomap_mut().copy_from_slice(&self.priomap);
    }
}
