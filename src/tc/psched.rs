// SPDX-License-Identifier: MIT

use std::fs;
use std::io;

use log::warn;

const PSCHED: &str = "/proc/net/psched";

pub const TIME_UNITS_PER_SEC: u32 = 1_000_000;

/// Clock parameters of the kernel packet scheduler, translating between
/// microseconds and scheduler ticks.
///
/// The values come from the four hex words of `/proc/net/psched`
/// (`t2us us2t clock_res wee`), read exactly once per process through
/// [psched_clock]. Rate tables are a pure function of these constants and
/// the shaping parameters, so tests construct the clock directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PschedClock {
    pub tick_in_usec: f64,
    pub clock_factor: f64,
}

impl PschedClock {
    pub fn new(t2us: u32, us2t: u32, clock_res: u32) -> Self {
        let clock_factor =
            f64::from(clock_res) / f64::from(TIME_UNITS_PER_SEC);
        let tick_in_usec =
            f64::from(t2us) / f64::from(us2t) * clock_factor;
        Self {
            tick_in_usec,
            clock_factor,
        }
    }

    pub fn load() -> io::Result<Self> {
        Self::parse(&fs::read_to_string(PSCHED)?)
    }

    fn parse(text: &str) -> io::Result<Self> {
        let mut words = text.split_whitespace().map(|word| {
            u32::from_str_radix(word, 16).map_err(|error| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bad psched word {word:?}: {error}"),
                )
            })
        });
        let mut next = || {
            words.next().unwrap_or_else(|| {
                Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "psched data ends early",
                ))
            })
        };
        let t2us = next()?;
        let us2t = next()?;
        let clock_res = next()?;
        let _wee = next()?;
        Ok(Self::new(t2us, us2t, clock_res))
    }

    /// Microseconds to scheduler ticks.
    pub fn time2tick(&self, time: f64) -> f64 {
        time * self.tick_in_usec
    }

    /// Transmission time of `size` bytes at `rate` bytes per second, in
    /// ticks, truncated the way the kernel stores table entries.
    pub fn xmit_time(&self, rate: u32, size: u32) -> u32 {
        self.time2tick(
            f64::from(TIME_UNITS_PER_SEC) * (f64::from(size) / f64::from(rate)),
        ) as u32
    }
}

impl Default for PschedClock {
    fn default() -> Self {
        Self::new(1, 1, TIME_UNITS_PER_SEC)
    }
}

lazy_static! {
    static ref PSCHED_CLOCK: PschedClock =
        PschedClock::load().unwrap_or_else(|error| {
            warn!("cannot read {PSCHED}: {error}; using raw microseconds");
            PschedClock::default()
        });
}

/// The process-wide scheduler clock.
pub fn psched_clock() -> &'static PschedClock {
    &PSCHED_CLOCK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_clock() {
        let clock = PschedClock::new(1, 1, TIME_UNITS_PER_SEC);
        assert_eq!(clock.clock_factor, 1.0);
        assert_eq!(clock.tick_in_usec, 1.0);
        assert_eq!(clock.xmit_time(1_000_000, 8), 8);
    }

    #[test]
    fn parse_psched_words() {
        let clock =
            PschedClock::parse("000003e8 00000040 000f4240 3b9aca00\n")
                .unwrap();
        assert_eq!(clock.clock_factor, 1.0);
        assert_eq!(clock.tick_in_usec, 1000.0 / 64.0);
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(PschedClock::parse("3e8 40").is_err());
        assert!(PschedClock::parse("xyzzy 1 1 1").is_err());
    }
}
