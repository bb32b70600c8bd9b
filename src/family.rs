// SPDX-License-Identifier: MIT

const AF_UNSPEC: u8 = 0;
const AF_INET: u8 = 2;
const AF_BRIDGE: u8 = 7;
const AF_INET6: u8 = 10;

/// Address family of a message or of an `IFLA_AF_SPEC` entry.
///
/// Only the families this crate dispatches on get their own variant;
/// everything else is carried through [AddressFamily::Other] untouched.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[non_exhaustive]
pub enum AddressFamily {
    Unspec,
    Inet,
    Bridge,
    Inet6,
    Other(u8),
}

impl Default for AddressFamily {
    fn default() -> Self {
        Self::Unspec
    }
}

impl From<u8> for AddressFamily {
    fn from(d: u8) -> Self {
        match d {
            AF_UNSPEC => Self::Unspec,
            AF_INET => Self::Inet,
            AF_BRIDGE => Self::Bridge,
            AF_INET6 => Self::Inet6,
            _ => Self::Other(d),
        }
    }
}

impl From<AddressFamily> for u8 {
    fn from(v: AddressFamily) -> u8 {
        match v {
            AddressFamily::Unspec => AF_UNSPEC,
            AddressFamily::Inet => AF_INET,
            AddressFamily::Bridge => AF_BRIDGE,
            AddressFamily::Inet6 => AF_INET6,
            AddressFamily::Other(d) => d,
        }
    }
}

impl From<AddressFamily> for u16 {
    fn from(v: AddressFamily) -> u16 {
        u8::from(v).into()
    }
}
