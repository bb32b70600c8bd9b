// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::parse_u32,
    traits::Parseable,
    DecodeError,
};

const IFLA_BRIDGE_STP_STATE: u16 = 0;
const IFLA_BRIDGE_MAX_AGE: u16 = 1;

/// One attribute of a bridge's `IFLA_INFO_DATA` container.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoBridge {
    StpState(u32),
    MaxAge(u32),
    Other(DefaultNla),
}

impl InfoBridge {
    /// sysfs file names under `/sys/class/net/<bridge>/bridge/`, in
    /// schema order.
    pub(crate) const SYSFS_NAMES: [&'static str; 2] =
        ["stp_state", "max_age"];

    pub(crate) fn from_sysfs(name: &str, value: i64) -> Option<Self> {
        Some(match name {
            "stp_state" => Self::StpState(value as u32),
            "max_age" => Self::MaxAge(value as u32),
            _ => return None,
        })
    }

    pub(crate) fn sysfs_entry(&self) -> Option<(&'static str, String)> {
        Some(match self {
            Self::StpState(v) => ("stp_state", v.to_string()),
            Self::MaxAge(v) => ("max_age", v.to_string()),
            _ => return None,
        })
    }
}

impl Nla for InfoBridge {
    fn value_len(&self) -> usize {
        match self {
            Self::StpState(_) | Self::MaxAge(_) => 4,
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::StpState(v) | Self::MaxAge(v) => {
                NativeEndian::write_u32(buffer, *v)
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::StpState(_) => IFLA_BRIDGE_STP_STATE,
            Self::MaxAge(_) => IFLA_BRIDGE_MAX_AGE,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoBridge {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_BRIDGE_STP_STATE => Self::StpState(
                parse_u32(payload).context("invalid IFLA_BRIDGE_STP_STATE")?,
            ),
            IFLA_BRIDGE_MAX_AGE => Self::MaxAge(
                parse_u32(payload).context("invalid IFLA_BRIDGE_MAX_AGE")?,
            ),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_INFO_DATA(bridge)"
            ))?),
        })
    }
}
