// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use netlink_packet_utils::DecodeError;

const IF_OPER_UNKNOWN: u8 = 0;
const IF_OPER_NOTPRESENT: u8 = 1;
const IF_OPER_DOWN: u8 = 2;
const IF_OPER_LOWERLAYERDOWN: u8 = 3;
const IF_OPER_TESTING: u8 = 4;
const IF_OPER_DORMANT: u8 = 5;
const IF_OPER_UP: u8 = 6;

/// RFC 2863 operational state of an interface.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum State {
    /// Status can't be determined
    Unknown,
    /// Some component is missing
    NotPresent,
    /// Down
    Down,
    /// Down due to state of lower layer
    LowerLayerDown,
    /// In some test mode
    Testing,
    /// Not up but pending an external event
    Dormant,
    /// Up, ready to send packets
    Up,
    /// Place holder for a state this crate does not know about
    Other(u8),
}

impl From<u8> for State {
    fn from(value: u8) -> Self {
        use self::State::*;
        match value {
            IF_OPER_UNKNOWN => Unknown,
            IF_OPER_NOTPRESENT => NotPresent,
            IF_OPER_DOWN => Down,
            IF_OPER_LOWERLAYERDOWN => LowerLayerDown,
            IF_OPER_TESTING => Testing,
            IF_OPER_DORMANT => Dormant,
            IF_OPER_UP => Up,
            _ => Other(value),
        }
    }
}

impl From<State> for u8 {
    fn from(value: State) -> Self {
        use self::State::*;
        match value {
            Unknown => IF_OPER_UNKNOWN,
            NotPresent => IF_OPER_NOTPRESENT,
            Down => IF_OPER_DOWN,
            LowerLayerDown => IF_OPER_LOWERLAYERDOWN,
            Testing => IF_OPER_TESTING,
            Dormant => IF_OPER_DORMANT,
            Up => IF_OPER_UP,
            Other(other) => other,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::State::*;
        match self {
            Unknown => write!(f, "UNKNOWN"),
            NotPresent => write!(f, "NOTPRESENT"),
            Down => write!(f, "DOWN"),
            LowerLayerDown => write!(f, "LOWERLAYERDOWN"),
            Testing => write!(f, "TESTING"),
            Dormant => write!(f, "DORMANT"),
            Up => write!(f, "UP"),
            Other(other) => write!(f, "{other}"),
        }
    }
}

impl FromStr for State {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use self::State::*;
        Ok(match s {
            "UNKNOWN" => Unknown,
            "NOTPRESENT" => NotPresent,
            "DOWN" => Down,
            "LOWERLAYERDOWN" => LowerLayerDown,
            "TESTING" => Testing,
            "DORMANT" => Dormant,
            "UP" => Up,
            _ => {
                return Err(
                    format!("unknown operational state {s:?}").into()
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        for code in 0..=6u8 {
            assert_eq!(u8::from(State::from(code)), code);
        }
    }

    #[test]
    fn names_map_to_codes() {
        assert_eq!("DORMANT".parse::<State>().unwrap(), State::Dormant);
        assert_eq!(u8::from("UP".parse::<State>().unwrap()), 6);
        assert!("SIDEWAYS".parse::<State>().is_err());
    }
}
