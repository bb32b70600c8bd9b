// SPDX-License-Identifier: MIT

use log::warn;

pub const IFF_UP: u32 = 1 << 0;
pub const IFF_BROADCAST: u32 = 1 << 1;
pub const IFF_DEBUG: u32 = 1 << 2;
pub const IFF_LOOPBACK: u32 = 1 << 3;
pub const IFF_POINTOPOINT: u32 = 1 << 4;
pub const IFF_NOTRAILERS: u32 = 1 << 5;
pub const IFF_RUNNING: u32 = 1 << 6;
pub const IFF_NOARP: u32 = 1 << 7;
pub const IFF_PROMISC: u32 = 1 << 8;
pub const IFF_ALLMULTI: u32 = 1 << 9;
pub const IFF_MASTER: u32 = 1 << 10;
pub const IFF_SLAVE: u32 = 1 << 11;
pub const IFF_MULTICAST: u32 = 1 << 12;
pub const IFF_PORTSEL: u32 = 1 << 13;
pub const IFF_AUTOMEDIA: u32 = 1 << 14;
pub const IFF_DYNAMIC: u32 = 1 << 15;
pub const IFF_LOWER_UP: u32 = 1 << 16;
pub const IFF_DORMANT: u32 = 1 << 17;
pub const IFF_ECHO: u32 = 1 << 18;

const FLAG_NAMES: [(&str, u32); 19] = [
    ("UP", IFF_UP),
    ("BROADCAST", IFF_BROADCAST),
    ("DEBUG", IFF_DEBUG),
    ("LOOPBACK", IFF_LOOPBACK),
    ("POINTOPOINT", IFF_POINTOPOINT),
    ("NOTRAILERS", IFF_NOTRAILERS),
    ("RUNNING", IFF_RUNNING),
    ("NOARP", IFF_NOARP),
    ("PROMISC", IFF_PROMISC),
    ("ALLMULTI", IFF_ALLMULTI),
    ("MASTER", IFF_MASTER),
    ("SLAVE", IFF_SLAVE),
    ("MULTICAST", IFF_MULTICAST),
    ("PORTSEL", IFF_PORTSEL),
    ("AUTOMEDIA", IFF_AUTOMEDIA),
    ("DYNAMIC", IFF_DYNAMIC),
    ("LOWER_UP", IFF_LOWER_UP),
    ("DORMANT", IFF_DORMANT),
    ("ECHO", IFF_ECHO),
];

/// Names of every known flag bit that is set in `flags & mask`.
pub fn flags_to_names(flags: u32, mask: u32) -> Vec<String> {
    FLAG_NAMES
        .iter()
        .filter(|(_, bit)| flags & mask & bit == *bit)
        .map(|(name, _)| (*name).to_string())
        .collect()
}

/// Converts a list of flag names into a `(value, mask)` pair.
///
/// A leading `!` requests clearing: the bit goes into the mask but not
/// into the value. Unknown names contribute nothing.
pub fn names_to_flags<I, S>(names: I) -> (u32, u32)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut value = 0;
    let mut mask = 0;
    for name in names {
        let name = name.as_ref();
        let (clear, name) = match name.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, name),
        };
        match FLAG_NAMES.iter().find(|(known, _)| *known == name) {
            Some((_, bit)) => {
                mask |= bit;
                if !clear {
                    value |= bit;
                }
            }
            None => warn!("ignoring unknown interface flag {name:?}"),
        }
    }
    (value, mask)
}

/// Device flags of a link message, either as the raw bit value or as a
/// set of flag names to apply.
///
/// Decoding always yields [LinkFlags::Value]. A [LinkFlags::Named] set is
/// converted through [names_to_flags] when the header is emitted, and the
/// resulting mask replaces the header's change mask.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum LinkFlags {
    Value(u32),
    Named(Vec<String>),
}

impl LinkFlags {
    /// The `(flags, change_mask)` pair this value encodes to,
    /// `change_mask` being the given one unless a named set overrides it.
    pub(crate) fn resolve(&self, change_mask: u32) -> (u32, u32) {
        match self {
            Self::Value(value) => (*value, change_mask),
            Self::Named(names) => names_to_flags(names),
        }
    }

    /// The raw bit value, resolving names if necessary.
    pub fn bits(&self) -> u32 {
        self.resolve(0).0
    }
}

impl Default for LinkFlags {
    fn default() -> Self {
        Self::Value(0)
    }
}

impl From<u32> for LinkFlags {
    fn from(value: u32) -> Self {
        Self::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_and_clear_promisc() {
        let (value, mask) = names_to_flags(["UP", "!PROMISC"]);
        assert_eq!(value, 0x1);
        assert_eq!(mask, 0x101);
    }

    #[test]
    fn names_round_trip() {
        let names = ["UP", "RUNNING", "MULTICAST"];
        let (value, mask) = names_to_flags(names);
        assert_eq!(
            flags_to_names(value, mask),
            names.iter().map(|s| s.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn value_round_trip_under_mask() {
        let value = IFF_UP | IFF_NOARP | IFF_LOWER_UP;
        let mask = 0xffff;
        let names = flags_to_names(value, mask);
        let (back, back_mask) = names_to_flags(&names);
        assert_eq!(back, value & mask);
        assert_eq!(back_mask, back);
    }

    #[test]
    fn cleared_names_do_not_come_back() {
        let (value, mask) = names_to_flags(["UP", "!ALLMULTI", "NOARP"]);
        assert_eq!(flags_to_names(value, mask), vec!["UP", "NOARP"]);
    }

    #[test]
    fn unknown_names_are_skipped() {
        assert_eq!(names_to_flags(["UP", "WARP_DRIVE"]), (0x1, 0x1));
    }
}
