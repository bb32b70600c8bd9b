// SPDX-License-Identifier: MIT

use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::psched::PschedClock;

pub const LINKLAYER_UNSPEC: u8 = 0;
pub const LINKLAYER_ETHERNET: u8 = 1;
pub const LINKLAYER_ATM: u8 = 2;

const ATM_CELL_SIZE: u32 = 53;
const ATM_CELL_PAYLOAD: u32 = 48;

/// Number of entries of a transmit-time lookup table.
pub const RATE_TABLE_ENTRIES: usize = 256;

const DEFAULT_MTU: u32 = 1600;

pub(crate) const TC_RATE_SPEC_LEN: usize = 12;

/// `struct tc_ratespec`: one shaping rate plus the parameters of its
/// transmit-time table.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct TcRateSpec {
    pub cell_log: u8,
    pub linklayer: u8,
    pub overhead: u16,
    pub cell_align: i16,
    pub mpu: u16,
    /// Rate in bytes per second.
    pub rate: u32,
}

impl<T: AsRef<[u8]> + ?Sized> Parseable<T> for TcRateSpec {
    fn parse(buf: &T) -> Result<Self, DecodeError> {
        let payload = buf.as_ref();
        if payload.len() < TC_RATE_SPEC_LEN {
            return Err(format!(
                "invalid tc_ratespec length {}",
                payload.len()
            )
            .into());
        }
        Ok(Self {
            cell_log: payload[0],
            linklayer: payload[1],
            overhead: NativeEndian::read_u16(&payload[2..4]),
            cell_align: NativeEndian::read_i16(&payload[4..6]),
            mpu: NativeEndian::read_u16(&payload[6..8]),
            rate: NativeEndian::read_u32(&payload[8..12]),
        })
    }
}

impl Emitable for TcRateSpec {
    fn buffer_len(&self) -> usize {
        TC_RATE_SPEC_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.cell_log;
        buffer[1] = self.linklayer;
        NativeEndian::write_u16(&mut buffer[2..4], self.overhead);
        NativeEndian::write_i16(&mut buffer[4..6], self.cell_align);
        NativeEndian::write_u16(&mut buffer[6..8], self.mpu);
        NativeEndian::write_u32(&mut buffer[8..12], self.rate);
    }
}

fn adjust_size(size: u32, mpu: u16, linklayer: u8) -> u32 {
    let size = size.max(u32::from(mpu));
    if linklayer == LINKLAYER_ATM {
        let mut cells = size / ATM_CELL_PAYLOAD;
        if size % ATM_CELL_PAYLOAD > 0 {
            cells += 1;
        }
        cells * ATM_CELL_SIZE
    } else {
        size
    }
}

/// Builds the 256-entry transmit-time table for `spec`.
///
/// `mtu` falls back to 1600 when zero. A zero `cell_log` is grown until
/// `mtu >> cell_log` fits a table index; the chosen value and
/// `cell_align = -1` are written back into the spec, matching what the
/// kernel expects alongside the table.
pub fn build_rate_table(
    spec: &mut TcRateSpec,
    mtu: u32,
    clock: &PschedClock,
) -> Vec<u32> {
    let mtu = if mtu == 0 { DEFAULT_MTU } else { mtu };
    let mut cell_log = spec.cell_log;
    if cell_log == 0 {
        while (mtu >> cell_log) > 255 {
            cell_log += 1;
        }
    }
    let mut table = Vec::with_capacity(RATE_TABLE_ENTRIES);
    for i in 0..RATE_TABLE_ENTRIES as u32 {
        let size = adjust_size((i + 1) << cell_log, spec.mpu, spec.linklayer);
        table.push(clock.xmit_time(spec.rate, size));
    }
    spec.cell_align = -1;
    spec.cell_log = cell_log;
    table
}

/// Decodes a table attribute into its `u32` entries, dropping any
/// trailing partial word.
pub(crate) fn parse_u32_table(payload: &[u8]) -> Vec<u32> {
    payload.chunks_exact(4).map(NativeEndian::read_u32).collect()
}

pub(crate) fn emit_u32_table(table: &[u32], buffer: &mut [u8]) {
    for (i, entry) in table.iter().enumerate() {
        NativeEndian::write_u32(&mut buffer[i * 4..], *entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ethernet_cell_log_and_first_entry() {
        let clock = PschedClock::new(1, 1, 1_000_000);
        let mut spec = TcRateSpec {
            rate: 1_000_000,
            linklayer: LINKLAYER_ETHERNET,
            ..Default::default()
        };
        let table = build_rate_table(&mut spec, 1500, &clock);
        assert_eq!(spec.cell_log, 3);
        assert_eq!(spec.cell_align, -1);
        assert_eq!(table.len(), RATE_TABLE_ENTRIES);
        // 8 bytes at 1 MB/s: 8 us, one tick per us
        assert_eq!(table[0], 8);
        // largest bucket: 2048 bytes
        assert_eq!(table[255], 2048);
    }

    #[test]
    fn tables_are_deterministic() {
        let clock = PschedClock::new(15625, 64, 1_000_000_000);
        let mut a = TcRateSpec {
            rate: 12_500_000,
            mpu: 64,
            ..Default::default()
        };
        let mut b = a;
        assert_eq!(
            build_rate_table(&mut a, 9000, &clock),
            build_rate_table(&mut b, 9000, &clock)
        );
        assert_eq!(a, b);
    }

    #[test]
    fn atm_sizes_round_up_to_whole_cells() {
        assert_eq!(adjust_size(100, 0, LINKLAYER_ATM), 159);
        assert_eq!(adjust_size(96, 0, LINKLAYER_ATM), 106);
        assert_eq!(adjust_size(10, 64, LINKLAYER_ETHERNET), 64);
    }

    #[test]
    fn explicit_cell_log_is_kept() {
        let clock = PschedClock::default();
        let mut spec = TcRateSpec {
            rate: 1_000_000,
            cell_log: 5,
            ..Default::default()
        };
        build_rate_table(&mut spec, 1500, &clock);
        assert_eq!(spec.cell_log, 5);
    }
}
