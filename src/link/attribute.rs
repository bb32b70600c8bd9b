// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::{parse_i32, parse_string, parse_u32, parse_u8},
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::af_spec::VecAfSpec;
use super::link_info::VecLinkInfo;
use super::map::{MapBuffer, LINK_MAP_LEN};
use super::stats::{
    Stats64Buffer, StatsBuffer, LINK_STATS64_LEN, LINK_STATS_LEN,
};
use super::{AfSpec, LinkInfo, Map, NetNs, State, Stats, Stats64};

const IFLA_ADDRESS: u16 = 1;
const IFLA_BROADCAST: u16 = 2;
const IFLA_IFNAME: u16 = 3;
const IFLA_MTU: u16 = 4;
const IFLA_LINK: u16 = 5;
const IFLA_QDISC: u16 = 6;
const IFLA_STATS: u16 = 7;
const IFLA_COST: u16 = 8;
const IFLA_PRIORITY: u16 = 9;
const IFLA_MASTER: u16 = 10;
const IFLA_WIRELESS: u16 = 11;
const IFLA_PROTINFO: u16 = 12;
const IFLA_TXQLEN: u16 = 13;
const IFLA_MAP: u16 = 14;
const IFLA_WEIGHT: u16 = 15;
const IFLA_OPERSTATE: u16 = 16;
const IFLA_LINKMODE: u16 = 17;
const IFLA_LINKINFO: u16 = 18;
const IFLA_NET_NS_PID: u16 = 19;
const IFLA_IFALIAS: u16 = 20;
const IFLA_NUM_VF: u16 = 21;
const IFLA_VFINFO_LIST: u16 = 22;
const IFLA_STATS64: u16 = 23;
const IFLA_VF_PORTS: u16 = 24;
const IFLA_PORT_SELF: u16 = 25;
const IFLA_AF_SPEC: u16 = 26;
const IFLA_GROUP: u16 = 27;
const IFLA_NET_NS_FD: u16 = 28;
const IFLA_EXT_MASK: u16 = 29;
const IFLA_PROMISCUITY: u16 = 30;
const IFLA_NUM_TX_QUEUES: u16 = 31;
const IFLA_NUM_RX_QUEUES: u16 = 32;
const IFLA_CARRIER: u16 = 33;
const IFLA_PHYS_PORT_ID: u16 = 34;
const IFLA_CARRIER_CHANGES: u16 = 35;

/// One attribute of a link message.
///
/// Attributes the kernel defines beyond this set, and payloads this crate
/// has no schema for, round-trip as opaque bytes.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum LinkAttribute {
    /// Hardware address. Usually a MAC, but e.g. for IP over GRE it is
    /// an IP address, hence the bytes.
    Address(Vec<u8>),
    Broadcast(Vec<u8>),
    IfName(String),
    Mtu(u32),
    Link(u32),
    Qdisc(String),
    Stats(Stats),
    Cost(Vec<u8>),
    Priority(Vec<u8>),
    Master(u32),
    Wireless(Vec<u8>),
    ProtInfo(Vec<u8>),
    TxQueueLen(u32),
    Map(Map),
    Weight(Vec<u8>),
    OperState(State),
    Mode(u8),
    LinkInfo(Vec<LinkInfo>),
    NetNsPid(u32),
    IfAlias(Vec<u8>),
    NumVf(u32),
    VfInfoList(Vec<u8>),
    Stats64(Stats64),
    VfPorts(Vec<u8>),
    PortSelf(Vec<u8>),
    AfSpec(Vec<AfSpec>),
    Group(u32),
    NetNsFd(NetNs),
    ExtMask(Vec<u8>),
    Promiscuity(u32),
    NumTxQueues(u32),
    NumRxQueues(u32),
    Carrier(u8),
    PhysPortId(Vec<u8>),
    CarrierChanges(u32),
    Other(DefaultNla),
}

impl Nla for LinkAttribute {
    fn value_len(&self) -> usize {
        match self {
            Self::Address(bytes)
            | Self::Broadcast(bytes)
            | Self::Cost(bytes)
            | Self::Priority(bytes)
            | Self::Wireless(bytes)
            | Self::ProtInfo(bytes)
            | Self::Weight(bytes)
            | Self::IfAlias(bytes)
            | Self::VfInfoList(bytes)
            | Self::VfPorts(bytes)
            | Self::PortSelf(bytes)
            | Self::ExtMask(bytes)
            | Self::PhysPortId(bytes) => bytes.len(),

            Self::IfName(string) | Self::Qdisc(string) => string.len() + 1,

            Self::Mode(_) | Self::Carrier(_) | Self::OperState(_) => 1,

            Self::Mtu(_)
            | Self::Link(_)
            | Self::Master(_)
            | Self::TxQueueLen(_)
            | Self::NetNsPid(_)
            | Self::NumVf(_)
            | Self::Group(_)
            | Self::NetNsFd(_)
            | Self::Promiscuity(_)
            | Self::NumTxQueues(_)
            | Self::NumRxQueues(_)
            | Self::CarrierChanges(_) => 4,

            Self::Stats(_) => LINK_STATS_LEN,
            Self::Stats64(_) => LINK_STATS64_LEN,
            Self::Map(_) => LINK_MAP_LEN,
            Self::LinkInfo(nlas) => nlas.as_slice().buffer_len(),
            Self::AfSpec(nlas) => nlas.as_slice().buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Address(bytes)
            | Self::Broadcast(bytes)
            | Self::Cost(bytes)
            | Self::Priority(bytes)
            | Self::Wireless(bytes)
            | Self::ProtInfo(bytes)
            | Self::Weight(bytes)
            | Self::IfAlias(bytes)
            | Self::VfInfoList(bytes)
            | Self::VfPorts(bytes)
            | Self::PortSelf(bytes)
            | Self::ExtMask(bytes)
            | Self::PhysPortId(bytes) => {
                buffer.copy_from_slice(bytes.as_slice())
            }

            Self::IfName(string) | Self::Qdisc(string) => {
                buffer[..string.len()].copy_from_slice(string.as_bytes());
                buffer[string.len()] = 0;
            }

            Self::Mode(val) | Self::Carrier(val) => buffer[0] = *val,
            Self::OperState(state) => buffer[0] = (*state).into(),

            Self::Mtu(value)
            | Self::Link(value)
            | Self::Master(value)
            | Self::TxQueueLen(value)
            | Self::NetNsPid(value)
            | Self::NumVf(value)
            | Self::Group(value)
            | Self::Promiscuity(value)
            | Self::NumTxQueues(value)
            | Self::NumRxQueues(value)
            | Self::CarrierChanges(value) => {
                NativeEndian::write_u32(buffer, *value)
            }

            // Named references are resolved by `LinkMessage::encode`; an
            // unresolved name emits an invalid descriptor.
            Self::NetNsFd(ns) => NativeEndian::write_i32(
                buffer,
                match ns {
                    NetNs::Fd(fd) => *fd,
                    NetNs::Name(_) => -1,
                },
            ),

            Self::Stats(stats) => stats.emit(buffer),
            Self::Stats64(stats) => stats.emit(buffer),
            Self::Map(map) => map.emit(buffer),
            Self::LinkInfo(nlas) => nlas.as_slice().emit(buffer),
            Self::AfSpec(nlas) => nlas.as_slice().emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Address(_) => IFLA_ADDRESS,
            Self::Broadcast(_) => IFLA_BROADCAST,
            Self::IfName(_) => IFLA_IFNAME,
            Self::Mtu(_) => IFLA_MTU,
            Self::Link(_) => IFLA_LINK,
            Self::Qdisc(_) => IFLA_QDISC,
            Self::Stats(_) => IFLA_STATS,
            Self::Cost(_) => IFLA_COST,
            Self::Priority(_) => IFLA_PRIORITY,
            Self::Master(_) => IFLA_MASTER,
            Self::Wireless(_) => IFLA_WIRELESS,
            Self::ProtInfo(_) => IFLA_PROTINFO,
            Self::TxQueueLen(_) => IFLA_TXQLEN,
            Self::Map(_) => IFLA_MAP,
            Self::Weight(_) => IFLA_WEIGHT,
            Self::OperState(_) => IFLA_OPERSTATE,
            Self::Mode(_) => IFLA_LINKMODE,
            Self::LinkInfo(_) => IFLA_LINKINFO,
            Self::NetNsPid(_) => IFLA_NET_NS_PID,
            Self::IfAlias(_) => IFLA_IFALIAS,
            Self::NumVf(_) => IFLA_NUM_VF,
            Self::VfInfoList(_) => IFLA_VFINFO_LIST,
            Self::Stats64(_) => IFLA_STATS64,
            Self::VfPorts(_) => IFLA_VF_PORTS,
            Self::PortSelf(_) => IFLA_PORT_SELF,
            Self::AfSpec(_) => IFLA_AF_SPEC,
            Self::Group(_) => IFLA_GROUP,
            Self::NetNsFd(_) => IFLA_NET_NS_FD,
            Self::ExtMask(_) => IFLA_EXT_MASK,
            Self::Promiscuity(_) => IFLA_PROMISCUITY,
            Self::NumTxQueues(_) => IFLA_NUM_TX_QUEUES,
            Self::NumRxQueues(_) => IFLA_NUM_RX_QUEUES,
            Self::Carrier(_) => IFLA_CARRIER,
            Self::PhysPortId(_) => IFLA_PHYS_PORT_ID,
            Self::CarrierChanges(_) => IFLA_CARRIER_CHANGES,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>>
    for LinkAttribute
{
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_ADDRESS => Self::Address(payload.to_vec()),
            IFLA_BROADCAST => Self::Broadcast(payload.to_vec()),
            IFLA_IFNAME => Self::IfName(
                parse_string(payload).context("invalid IFLA_IFNAME value")?,
            ),
            IFLA_MTU => Self::Mtu(
                parse_u32(payload).context("invalid IFLA_MTU value")?,
            ),
            IFLA_LINK => Self::Link(
                parse_u32(payload).context("invalid IFLA_LINK value")?,
            ),
            IFLA_QDISC => Self::Qdisc(
                parse_string(payload).context("invalid IFLA_QDISC value")?,
            ),
            IFLA_STATS => Self::Stats(
                Stats::parse(
                    &StatsBuffer::new_checked(payload)
                        .context("invalid IFLA_STATS value")?,
                )
                .context("invalid IFLA_STATS value")?,
            ),
            IFLA_COST => Self::Cost(payload.to_vec()),
            IFLA_PRIORITY => Self::Priority(payload.to_vec()),
            IFLA_MASTER => Self::Master(
                parse_u32(payload).context("invalid IFLA_MASTER value")?,
            ),
            IFLA_WIRELESS => Self::Wireless(payload.to_vec()),
            IFLA_PROTINFO => Self::ProtInfo(payload.to_vec()),
            IFLA_TXQLEN => Self::TxQueueLen(
                parse_u32(payload).context("invalid IFLA_TXQLEN value")?,
            ),
            IFLA_MAP => Self::Map(
                Map::parse(
                    &MapBuffer::new_checked(payload)
                        .context("invalid IFLA_MAP value")?,
                )
                .context("invalid IFLA_MAP value")?,
            ),
            IFLA_WEIGHT => Self::Weight(payload.to_vec()),
            IFLA_OPERSTATE => Self::OperState(
                parse_u8(payload)
                    .context("invalid IFLA_OPERSTATE value")?
                    .into(),
            ),
            IFLA_LINKMODE => Self::Mode(
                parse_u8(payload).context("invalid IFLA_LINKMODE value")?,
            ),
            IFLA_LINKINFO => Self::LinkInfo(
                VecLinkInfo::parse(buf)
                    .context("invalid IFLA_LINKINFO value")?
                    .0,
            ),
            IFLA_NET_NS_PID => Self::NetNsPid(
                parse_u32(payload).context("invalid IFLA_NET_NS_PID value")?,
            ),
            IFLA_IFALIAS => Self::IfAlias(payload.to_vec()),
            IFLA_NUM_VF => Self::NumVf(
                parse_u32(payload).context("invalid IFLA_NUM_VF value")?,
            ),
            IFLA_VFINFO_LIST => Self::VfInfoList(payload.to_vec()),
            IFLA_STATS64 => Self::Stats64(
                Stats64::parse(
                    &Stats64Buffer::new_checked(payload)
                        .context("invalid IFLA_STATS64 value")?,
                )
                .context("invalid IFLA_STATS64 value")?,
            ),
            IFLA_VF_PORTS => Self::VfPorts(payload.to_vec()),
            IFLA_PORT_SELF => Self::PortSelf(payload.to_vec()),
            IFLA_AF_SPEC => Self::AfSpec(
                VecAfSpec::parse(buf)
                    .context("invalid IFLA_AF_SPEC value")?
                    .0,
            ),
            IFLA_GROUP => Self::Group(
                parse_u32(payload).context("invalid IFLA_GROUP value")?,
            ),
            IFLA_NET_NS_FD => Self::NetNsFd(NetNs::Fd(
                parse_i32(payload).context("invalid IFLA_NET_NS_FD value")?,
            )),
            IFLA_EXT_MASK => Self::ExtMask(payload.to_vec()),
            IFLA_PROMISCUITY => Self::Promiscuity(
                parse_u32(payload).context("invalid IFLA_PROMISCUITY value")?,
            ),
            IFLA_NUM_TX_QUEUES => Self::NumTxQueues(
                parse_u32(payload)
                    .context("invalid IFLA_NUM_TX_QUEUES value")?,
            ),
            IFLA_NUM_RX_QUEUES => Self::NumRxQueues(
                parse_u32(payload)
                    .context("invalid IFLA_NUM_RX_QUEUES value")?,
            ),
            IFLA_CARRIER => Self::Carrier(
                parse_u8(payload).context("invalid IFLA_CARRIER value")?,
            ),
            IFLA_PHYS_PORT_ID => Self::PhysPortId(payload.to_vec()),
            IFLA_CARRIER_CHANGES => Self::CarrierChanges(
                parse_u32(payload)
                    .context("invalid IFLA_CARRIER_CHANGES value")?,
            ),
            _ => Self::Other(
                DefaultNla::parse(buf)
                    .context("failed to parse link NLA")?,
            ),
        })
    }
}
