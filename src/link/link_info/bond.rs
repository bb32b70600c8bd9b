// SPDX-License-Identifier: MIT

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer, NlasIterator},
    parsers::{parse_u16, parse_u32, parse_u8},
    traits::{Emitable, Parseable},
    DecodeError,
};

const IFLA_BOND_MODE: u16 = 1;
const IFLA_BOND_ACTIVE_SLAVE: u16 = 2;
const IFLA_BOND_MIIMON: u16 = 3;
const IFLA_BOND_UPDELAY: u16 = 4;
const IFLA_BOND_DOWNDELAY: u16 = 5;
const IFLA_BOND_USE_CARRIER: u16 = 6;
const IFLA_BOND_ARP_INTERVAL: u16 = 7;
const IFLA_BOND_ARP_IP_TARGET: u16 = 8;
const IFLA_BOND_ARP_VALIDATE: u16 = 9;
const IFLA_BOND_ARP_ALL_TARGETS: u16 = 10;
const IFLA_BOND_PRIMARY: u16 = 11;
const IFLA_BOND_PRIMARY_RESELECT: u16 = 12;
const IFLA_BOND_FAIL_OVER_MAC: u16 = 13;
const IFLA_BOND_XMIT_HASH_POLICY: u16 = 14;
const IFLA_BOND_RESEND_IGMP: u16 = 15;
const IFLA_BOND_NUM_PEER_NOTIF: u16 = 16;
const IFLA_BOND_ALL_SLAVES_ACTIVE: u16 = 17;
const IFLA_BOND_MIN_LINKS: u16 = 18;
const IFLA_BOND_LP_INTERVAL: u16 = 19;
const IFLA_BOND_PACKETS_PER_SLAVE: u16 = 20;
const IFLA_BOND_AD_LACP_RATE: u16 = 21;
const IFLA_BOND_AD_SELECT: u16 = 22;
const IFLA_BOND_AD_INFO: u16 = 23;

const IFLA_BOND_AD_INFO_AGGREGATOR: u16 = 1;
const IFLA_BOND_AD_INFO_NUM_PORTS: u16 = 2;
const IFLA_BOND_AD_INFO_ACTOR_KEY: u16 = 3;
const IFLA_BOND_AD_INFO_PARTNER_KEY: u16 = 4;
const IFLA_BOND_AD_INFO_PARTNER_MAC: u16 = 5;

#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum BondAdInfo {
    Aggregator(u16),
    NumPorts(u16),
    ActorKey(u16),
    PartnerKey(u16),
    PartnerMac([u8; 6]),
    Other(DefaultNla),
}

impl Nla for BondAdInfo {
    fn value_len(&self) -> usize {
        match self {
            Self::Aggregator(_)
            | Self::NumPorts(_)
            | Self::ActorKey(_)
            | Self::PartnerKey(_) => 2,
            Self::PartnerMac(_) => 6,
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Aggregator(v)
            | Self::NumPorts(v)
            | Self::ActorKey(v)
            | Self::PartnerKey(v) => NativeEndian::write_u16(buffer, *v),
            Self::PartnerMac(mac) => buffer.copy_from_slice(mac),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Aggregator(_) => IFLA_BOND_AD_INFO_AGGREGATOR,
            Self::NumPorts(_) => IFLA_BOND_AD_INFO_NUM_PORTS,
            Self::ActorKey(_) => IFLA_BOND_AD_INFO_ACTOR_KEY,
            Self::PartnerKey(_) => IFLA_BOND_AD_INFO_PARTNER_KEY,
            Self::PartnerMac(_) => IFLA_BOND_AD_INFO_PARTNER_MAC,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for BondAdInfo {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_BOND_AD_INFO_AGGREGATOR => Self::Aggregator(
                parse_u16(payload)
                    .context("invalid IFLA_BOND_AD_INFO_AGGREGATOR")?,
            ),
            IFLA_BOND_AD_INFO_NUM_PORTS => Self::NumPorts(
                parse_u16(payload)
                    .context("invalid IFLA_BOND_AD_INFO_NUM_PORTS")?,
            ),
            IFLA_BOND_AD_INFO_ACTOR_KEY => Self::ActorKey(
                parse_u16(payload)
                    .context("invalid IFLA_BOND_AD_INFO_ACTOR_KEY")?,
            ),
            IFLA_BOND_AD_INFO_PARTNER_KEY => Self::PartnerKey(
                parse_u16(payload)
                    .context("invalid IFLA_BOND_AD_INFO_PARTNER_KEY")?,
            ),
            IFLA_BOND_AD_INFO_PARTNER_MAC => {
                if payload.len() != 6 {
                    return Err(format!(
                        "invalid IFLA_BOND_AD_INFO_PARTNER_MAC length {}",
                        payload.len()
                    )
                    .into());
                }
                let mut mac = [0u8; 6];
                mac.copy_from_slice(payload);
                Self::PartnerMac(mac)
            }
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_BOND_AD_INFO"
            ))?),
        })
    }
}

/// One attribute of a bond's `IFLA_INFO_DATA` container.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum InfoBond {
    Mode(u8),
    ActiveSlave(u32),
    MiiMon(u32),
    UpDelay(u32),
    DownDelay(u32),
    UseCarrier(u8),
    ArpInterval(u32),
    ArpIpTarget(Vec<u32>),
    ArpValidate(u32),
    ArpAllTargets(u32),
    Primary(u32),
    PrimaryReselect(u8),
    FailOverMac(u8),
    XmitHashPolicy(u8),
    ResendIgmp(u32),
    NumPeerNotif(u8),
    AllSlavesActive(u8),
    MinLinks(u32),
    LpInterval(u32),
    PacketsPerSlave(u32),
    AdLacpRate(u8),
    AdSelect(u8),
    AdInfo(Vec<BondAdInfo>),
    Other(DefaultNla),
}

impl InfoBond {
    /// sysfs file names under `/sys/class/net/<bond>/bonding/` for every
    /// scalar attribute of the schema, in schema order.
    pub(crate) const SYSFS_NAMES: [&'static str; 22] = [
        "mode",
        "active_slave",
        "miimon",
        "updelay",
        "downdelay",
        "use_carrier",
        "arp_interval",
        "arp_validate",
        "arp_all_targets",
        "primary",
        "primary_reselect",
        "fail_over_mac",
        "xmit_hash_policy",
        "resend_igmp",
        "num_peer_notif",
        "all_slaves_active",
        "min_links",
        "lp_interval",
        "packets_per_slave",
        "ad_lacp_rate",
        "ad_select",
        "ad_info",
    ];

    /// Builds the attribute matching a sysfs file name from an integer
    /// value read out of that file.
    pub(crate) fn from_sysfs(name: &str, value: i64) -> Option<Self> {
        Some(match name {
            "mode" => Self::Mode(value as u8),
            "active_slave" => Self::ActiveSlave(value as u32),
            "miimon" => Self::MiiMon(value as u32),
            "updelay" => Self::UpDelay(value as u32),
            "downdelay" => Self::DownDelay(value as u32),
            "use_carrier" => Self::UseCarrier(value as u8),
            "arp_interval" => Self::ArpInterval(value as u32),
            "arp_validate" => Self::ArpValidate(value as u32),
            "arp_all_targets" => Self::ArpAllTargets(value as u32),
            "primary" => Self::Primary(value as u32),
            "primary_reselect" => Self::PrimaryReselect(value as u8),
            "fail_over_mac" => Self::FailOverMac(value as u8),
            "xmit_hash_policy" => Self::XmitHashPolicy(value as u8),
            "resend_igmp" => Self::ResendIgmp(value as u32),
            "num_peer_notif" => Self::NumPeerNotif(value as u8),
            "all_slaves_active" => Self::AllSlavesActive(value as u8),
            "min_links" => Self::MinLinks(value as u32),
            "lp_interval" => Self::LpInterval(value as u32),
            "packets_per_slave" => Self::PacketsPerSlave(value as u32),
            "ad_lacp_rate" => Self::AdLacpRate(value as u8),
            "ad_select" => Self::AdSelect(value as u8),
            _ => return None,
        })
    }

    /// The `(sysfs file name, value)` pair a scalar attribute writes to.
    pub(crate) fn sysfs_entry(&self) -> Option<(&'static str, String)> {
        Some(match self {
            Self::Mode(v) => ("mode", v.to_string()),
            Self::ActiveSlave(v) => ("active_slave", v.to_string()),
            Self::MiiMon(v) => ("miimon", v.to_string()),
            Self::UpDelay(v) => ("updelay", v.to_string()),
            Self::DownDelay(v) => ("downdelay", v.to_string()),
            Self::UseCarrier(v) => ("use_carrier", v.to_string()),
            Self::ArpInterval(v) => ("arp_interval", v.to_string()),
            Self::ArpValidate(v) => ("arp_validate", v.to_string()),
            Self::ArpAllTargets(v) => ("arp_all_targets", v.to_string()),
            Self::Primary(v) => ("primary", v.to_string()),
            Self::PrimaryReselect(v) => ("primary_reselect", v.to_string()),
            Self::FailOverMac(v) => ("fail_over_mac", v.to_string()),
            Self::XmitHashPolicy(v) => ("xmit_hash_policy", v.to_string()),
            Self::ResendIgmp(v) => ("resend_igmp", v.to_string()),
            Self::NumPeerNotif(v) => ("num_peer_notif", v.to_string()),
            Self::AllSlavesActive(v) => ("all_slaves_active", v.to_string()),
            Self::MinLinks(v) => ("min_links", v.to_string()),
            Self::LpInterval(v) => ("lp_interval", v.to_string()),
            Self::PacketsPerSlave(v) => ("packets_per_slave", v.to_string()),
            Self::AdLacpRate(v) => ("ad_lacp_rate", v.to_string()),
            Self::AdSelect(v) => ("ad_select", v.to_string()),
            _ => return None,
        })
    }
}

impl Nla for InfoBond {
    fn value_len(&self) -> usize {
        match self {
            Self::Mode(_)
            | Self::UseCarrier(_)
            | Self::PrimaryReselect(_)
            | Self::FailOverMac(_)
            | Self::XmitHashPolicy(_)
            | Self::NumPeerNotif(_)
            | Self::AllSlavesActive(_)
            | Self::AdLacpRate(_)
            | Self::AdSelect(_) => 1,
            Self::ActiveSlave(_)
            | Self::MiiMon(_)
            | Self::UpDelay(_)
            | Self::DownDelay(_)
            | Self::ArpInterval(_)
            | Self::ArpValidate(_)
            | Self::ArpAllTargets(_)
            | Self::Primary(_)
            | Self::ResendIgmp(_)
            | Self::MinLinks(_)
            | Self::LpInterval(_)
            | Self::PacketsPerSlave(_) => 4,
            Self::ArpIpTarget(targets) => 4 * targets.len(),
            Self::AdInfo(infos) => infos.as_slice().buffer_len(),
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Mode(v)
            | Self::UseCarrier(v)
            | Self::PrimaryReselect(v)
            | Self::FailOverMac(v)
            | Self::XmitHashPolicy(v)
            | Self::NumPeerNotif(v)
            | Self::AllSlavesActive(v)
            | Self::AdLacpRate(v)
            | Self::AdSelect(v) => buffer[0] = *v,
            Self::ActiveSlave(v)
            | Self::MiiMon(v)
            | Self::UpDelay(v)
            | Self::DownDelay(v)
            | Self::ArpInterval(v)
            | Self::ArpValidate(v)
            | Self::ArpAllTargets(v)
            | Self::Primary(v)
            | Self::ResendIgmp(v)
            | Self::MinLinks(v)
            | Self::LpInterval(v)
            | Self::PacketsPerSlave(v) => NativeEndian::write_u32(buffer, *v),
            Self::ArpIpTarget(targets) => {
                for (i, target) in targets.iter().enumerate() {
                    NativeEndian::write_u32(&mut buffer[i * 4..], *target);
                }
            }
            Self::AdInfo(infos) => infos.as_slice().emit(buffer),
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Mode(_) => IFLA_BOND_MODE,
            Self::ActiveSlave(_) => IFLA_BOND_ACTIVE_SLAVE,
            Self::MiiMon(_) => IFLA_BOND_MIIMON,
            Self::UpDelay(_) => IFLA_BOND_UPDELAY,
            Self::DownDelay(_) => IFLA_BOND_DOWNDELAY,
            Self::UseCarrier(_) => IFLA_BOND_USE_CARRIER,
            Self::ArpInterval(_) => IFLA_BOND_ARP_INTERVAL,
            Self::ArpIpTarget(_) => IFLA_BOND_ARP_IP_TARGET,
            Self::ArpValidate(_) => IFLA_BOND_ARP_VALIDATE,
            Self::ArpAllTargets(_) => IFLA_BOND_ARP_ALL_TARGETS,
            Self::Primary(_) => IFLA_BOND_PRIMARY,
            Self::PrimaryReselect(_) => IFLA_BOND_PRIMARY_RESELECT,
            Self::FailOverMac(_) => IFLA_BOND_FAIL_OVER_MAC,
            Self::XmitHashPolicy(_) => IFLA_BOND_XMIT_HASH_POLICY,
            Self::ResendIgmp(_) => IFLA_BOND_RESEND_IGMP,
            Self::NumPeerNotif(_) => IFLA_BOND_NUM_PEER_NOTIF,
            Self::AllSlavesActive(_) => IFLA_BOND_ALL_SLAVES_ACTIVE,
            Self::MinLinks(_) => IFLA_BOND_MIN_LINKS,
            Self::LpInterval(_) => IFLA_BOND_LP_INTERVAL,
            Self::PacketsPerSlave(_) => IFLA_BOND_PACKETS_PER_SLAVE,
            Self::AdLacpRate(_) => IFLA_BOND_AD_LACP_RATE,
            Self::AdSelect(_) => IFLA_BOND_AD_SELECT,
            Self::AdInfo(_) => IFLA_BOND_AD_INFO,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for InfoBond {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_BOND_MODE => Self::Mode(
                parse_u8(payload).context("invalid IFLA_BOND_MODE")?,
            ),
            IFLA_BOND_ACTIVE_SLAVE => Self::ActiveSlave(
                parse_u32(payload).context("invalid IFLA_BOND_ACTIVE_SLAVE")?,
            ),
            IFLA_BOND_MIIMON => Self::MiiMon(
                parse_u32(payload).context("invalid IFLA_BOND_MIIMON")?,
            ),
            IFLA_BOND_UPDELAY => Self::UpDelay(
                parse_u32(payload).context("invalid IFLA_BOND_UPDELAY")?,
            ),
            IFLA_BOND_DOWNDELAY => Self::DownDelay(
                parse_u32(payload).context("invalid IFLA_BOND_DOWNDELAY")?,
            ),
            IFLA_BOND_USE_CARRIER => Self::UseCarrier(
                parse_u8(payload).context("invalid IFLA_BOND_USE_CARRIER")?,
            ),
            IFLA_BOND_ARP_INTERVAL => Self::ArpInterval(
                parse_u32(payload).context("invalid IFLA_BOND_ARP_INTERVAL")?,
            ),
            IFLA_BOND_ARP_IP_TARGET => {
                if payload.len() % 4 != 0 {
                    return Err(format!(
                        "invalid IFLA_BOND_ARP_IP_TARGET length {}",
                        payload.len()
                    )
                    .into());
                }
                Self::ArpIpTarget(
                    payload
                        .chunks_exact(4)
                        .map(NativeEndian::read_u32)
                        .collect(),
                )
            }
            IFLA_BOND_ARP_VALIDATE => Self::ArpValidate(
                parse_u32(payload).context("invalid IFLA_BOND_ARP_VALIDATE")?,
            ),
            IFLA_BOND_ARP_ALL_TARGETS => Self::ArpAllTargets(
                parse_u32(payload)
                    .context("invalid IFLA_BOND_ARP_ALL_TARGETS")?,
            ),
            IFLA_BOND_PRIMARY => Self::Primary(
                parse_u32(payload).context("invalid IFLA_BOND_PRIMARY")?,
            ),
            IFLA_BOND_PRIMARY_RESELECT => Self::PrimaryReselect(
                parse_u8(payload)
                    .context("invalid IFLA_BOND_PRIMARY_RESELECT")?,
            ),
            IFLA_BOND_FAIL_OVER_MAC => Self::FailOverMac(
                parse_u8(payload).context("invalid IFLA_BOND_FAIL_OVER_MAC")?,
            ),
            IFLA_BOND_XMIT_HASH_POLICY => Self::XmitHashPolicy(
                parse_u8(payload)
                    .context("invalid IFLA_BOND_XMIT_HASH_POLICY")?,
            ),
            IFLA_BOND_RESEND_IGMP => Self::ResendIgmp(
                parse_u32(payload).context("invalid IFLA_BOND_RESEND_IGMP")?,
            ),
            IFLA_BOND_NUM_PEER_NOTIF => Self::NumPeerNotif(
                parse_u8(payload)
                    .context("invalid IFLA_BOND_NUM_PEER_NOTIF")?,
            ),
            IFLA_BOND_ALL_SLAVES_ACTIVE => Self::AllSlavesActive(
                parse_u8(payload)
                    .context("invalid IFLA_BOND_ALL_SLAVES_ACTIVE")?,
            ),
            IFLA_BOND_MIN_LINKS => Self::MinLinks(
                parse_u32(payload).context("invalid IFLA_BOND_MIN_LINKS")?,
            ),
            IFLA_BOND_LP_INTERVAL => Self::LpInterval(
                parse_u32(payload).context("invalid IFLA_BOND_LP_INTERVAL")?,
            ),
            IFLA_BOND_PACKETS_PER_SLAVE => Self::PacketsPerSlave(
                parse_u32(payload)
                    .context("invalid IFLA_BOND_PACKETS_PER_SLAVE")?,
            ),
            IFLA_BOND_AD_LACP_RATE => Self::AdLacpRate(
                parse_u8(payload).context("invalid IFLA_BOND_AD_LACP_RATE")?,
            ),
            IFLA_BOND_AD_SELECT => Self::AdSelect(
                parse_u8(payload).context("invalid IFLA_BOND_AD_SELECT")?,
            ),
            IFLA_BOND_AD_INFO => {
                let mut infos = Vec::new();
                for nla in NlasIterator::new(payload) {
                    let nla = nla.context("invalid IFLA_BOND_AD_INFO")?;
                    infos.push(BondAdInfo::parse(&nla)?);
                }
                Self::AdInfo(infos)
            }
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_INFO_DATA(bond)"
            ))?),
        })
    }
}
