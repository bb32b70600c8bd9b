// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::{parse_u16, parse_u32},
    traits::Parseable,
    DecodeError,
};

const IFLA_VLAN_ID: u16 = 1;
const IFLA_VLAN_FLAGS: u16 = 2;
const IFLA_VLAN_EGRESS_QOS: u16 = 3;
const IFLA_VLAN_INGRESS_QOS: u16 = 4;

/// One attribute of a vlan's `IFLA_INFO_DATA` container. The QoS
/// mapping containers are carried opaque.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoVlan {
    Id(u16),
    /// `(flags, mask)` pair
    Flags((u32, u32)),
    EgressQos(Vec<u8>),
    IngressQos(Vec<u8>),
    Other(DefaultNla),
}

impl Nla for InfoVlan {
    fn value_len(&self) -> usize {
        match self {
            Self::Id(_) => 2,
            Self::Flags(_) => 8,
            Self::EgressQos(bytes) | Self::IngressQos(bytes) => bytes.len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Id(value) => NativeEndian::write_u16(buffer, *value),
            Self::Flags((flags, mask)) => {
                NativeEndian::write_u32(&mut buffer[0..4], *flags);
                NativeEndian::write_u32(&mut buffer[4..8], *mask);
            }
            Self::EgressQos(bytes) | Self::IngressQos(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Id(_) => IFLA_VLAN_ID,
            Self::Flags(_) => IFLA_VLAN_FLAGS,
            Self::EgressQos(_) => IFLA_VLAN_EGRESS_QOS,
            Self::IngressQos(_) => IFLA_VLAN_INGRESS_QOS,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoVlan {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_VLAN_ID => Self::Id(
                parse_u16(payload).context("invalid IFLA_VLAN_ID")?,
            ),
            IFLA_VLAN_FLAGS => {
                if payload.len() != 8 {
                    return Err(format!(
                        "invalid IFLA_VLAN_FLAGS length {}",
                        payload.len()
                    )
                    .into());
                }
                Self::Flags((
                    parse_u32(&payload[0..4])
                        .context("invalid IFLA_VLAN_FLAGS value")?,
                    parse_u32(&payload[4..8])
                        .context("invalid IFLA_VLAN_FLAGS mask")?,
                ))
            }
            IFLA_VLAN_EGRESS_QOS => Self::EgressQos(payload.to_vec()),
            IFLA_VLAN_INGRESS_QOS => Self::IngressQos(payload.to_vec()),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_INFO_DATA(vlan)"
            ))?),
        })
    }
}
