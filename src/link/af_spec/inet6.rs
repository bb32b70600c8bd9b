// SPDX-License-Identifier: MIT

use std::net::Ipv6Addr;

use anyhow::Context;
use byteorder::{ByteOrder, NativeEndian};
use netlink_packet_utils::{
    nla::{DefaultNla, Nla, NlaBuffer},
    parsers::{parse_u32, parse_u8},
    traits::{Emitable, Parseable},
    DecodeError,
};

const IFLA_INET6_FLAGS: u16 = 1;
const IFLA_INET6_CONF: u16 = 2;
const IFLA_INET6_STATS: u16 = 3;
const IFLA_INET6_MCAST: u16 = 4;
const IFLA_INET6_CACHEINFO: u16 = 5;
const IFLA_INET6_ICMP6STATS: u16 = 6;
const IFLA_INET6_TOKEN: u16 = 7;
const IFLA_INET6_ADDR_GEN_MODE: u16 = 8;

// include/uapi/linux/ipv6.h: DEVCONF_*
pub(crate) const INET6_DEV_CONF_LEN: usize = 120;

buffer!(Inet6DevConfBuffer(INET6_DEV_CONF_LEN) {
    forwarding: (u32, 0..4),
    hop_limit: (u32, 4..8),
    mtu: (u32, 8..12),
    accept_ra: (u32, 12..16),
    accept_redirects: (u32, 16..20),
    autoconf: (u32, 20..24),
    dad_transmits: (u32, 24..28),
    router_solicitations: (u32, 28..32),
    router_solicitation_interval: (u32, 32..36),
    router_solicitation_delay: (u32, 36..40),
    use_tempaddr: (u32, 40..44),
    temp_valid_lft: (u32, 44..48),
    temp_prefered_lft: (u32, 48..52),
    regen_max_retry: (u32, 52..56),
    max_desync_factor: (u32, 56..60),
    max_addresses: (u32, 60..64),
    force_mld_version: (u32, 64..68),
    accept_ra_defrtr: (u32, 68..72),
    accept_ra_pinfo: (u32, 72..76),
    accept_ra_rtr_pref: (u32, 76..80),
    router_probe_interval: (u32, 80..84),
    accept_ra_rt_info_max_plen: (u32, 84..88),
    proxy_ndp: (u32, 88..92),
    optimistic_dad: (u32, 92..96),
    accept_source_route: (u32, 96..100),
    mc_forwarding: (u32, 100..104),
    disable_ipv6: (u32, 104..108),
    accept_dad: (u32, 108..112),
    force_tllao: (u32, 112..116),
    ndisc_notify: (u32, 116..INET6_DEV_CONF_LEN),
});

/// IPv6 device configuration, the `IFLA_INET6_CONF` block.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Inet6DevConf {
    pub forwarding: u32,
    pub hop_limit: u32,
    pub mtu: u32,
    pub accept_ra: u32,
    pub accept_redirects: u32,
    pub autoconf: u32,
    pub dad_transmits: u32,
    pub router_solicitations: u32,
    pub router_solicitation_interval: u32,
    pub router_solicitation_delay: u32,
    pub use_tempaddr: u32,
    pub temp_valid_lft: u32,
    pub temp_prefered_lft: u32,
    pub regen_max_retry: u32,
    pub max_desync_factor: u32,
    pub max_addresses: u32,
    pub force_mld_version: u32,
    pub accept_ra_defrtr: u32,
    pub accept_ra_pinfo: u32,
    pub accept_ra_rtr_pref: u32,
    pub router_probe_interval: u32,
    pub accept_ra_rt_info_max_plen: u32,
    pub proxy_ndp: u32,
    pub optimistic_dad: u32,
    pub accept_source_route: u32,
    pub mc_forwarding: u32,
    pub disable_ipv6: u32,
    pub accept_dad: u32,
    pub force_tllao: u32,
    pub ndisc_notify: u32,
}

impl<T: AsRef<[u8]>> Parseable<Inet6DevConfBuffer<T>> for Inet6DevConf {
    fn parse(buf: &Inet6DevConfBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            forwarding: buf.forwarding(),
            hop_limit: buf.hop_limit(),
            mtu: buf.mtu(),
            accept_ra: buf.accept_ra(),
            accept_redirects: buf.accept_redirects(),
            autoconf: buf.autoconf(),
            dad_transmits: buf.dad_transmits(),
            router_solicitations: buf.router_solicitations(),
            router_solicitation_interval: buf.router_solicitation_interval(),
            router_solicitation_delay: buf.router_solicitation_delay(),
            use_tempaddr: buf.use_tempaddr(),
            temp_valid_lft: buf.temp_valid_lft(),
            temp_prefered_lft: buf.temp_prefered_lft(),
            regen_max_retry: buf.regen_max_retry(),
            max_desync_factor: buf.max_desync_factor(),
            max_addresses: buf.max_addresses(),
            force_mld_version: buf.force_mld_version(),
            accept_ra_defrtr: buf.accept_ra_defrtr(),
            accept_ra_pinfo: buf.accept_ra_pinfo(),
            accept_ra_rtr_pref: buf.accept_ra_rtr_pref(),
            router_probe_interval: buf.router_probe_interval(),
            accept_ra_rt_info_max_plen: buf.accept_ra_rt_info_max_plen(),
            proxy_ndp: buf.proxy_ndp(),
            optimistic_dad: buf.optimistic_dad(),
            accept_source_route: buf.accept_source_route(),
            mc_forwarding: buf.mc_forwarding(),
            disable_ipv6: buf.disable_ipv6(),
            accept_dad: buf.accept_dad(),
            force_tllao: buf.force_tllao(),
            ndisc_notify: buf.ndisc_notify(),
        })
    }
}

impl Emitable for Inet6DevConf {
    fn buffer_len(&self) -> usize {
        INET6_DEV_CONF_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = Inet6DevConfBuffer::new(buffer);
        buffer.set_forwarding(self.forwarding);
        buffer.set_hop_limit(self.hop_limit);
        buffer.set_mtu(self.mtu);
        buffer.set_accept_ra(self.accept_ra);
        buffer.set_accept_redirects(self.accept_redirects);
        buffer.set_autoconf(self.autoconf);
        buffer.set_dad_transmits(self.dad_transmits);
        buffer.set_router_solicitations(self.router_solicitations);
        buffer
            .set_router_solicitation_interval(self.router_solicitation_interval);
        buffer.set_router_solicitation_delay(self.router_solicitation_delay);
        buffer.set_use_tempaddr(self.use_tempaddr);
        buffer.set_temp_valid_lft(self.temp_valid_lft);
        buffer.set_temp_prefered_lft(self.temp_prefered_lft);
        buffer.set_regen_max_retry(self.regen_max_retry);
        buffer.set_max_desync_factor(self.max_desync_factor);
        buffer.set_max_addresses(self.max_addresses);
        buffer.set_force_mld_version(self.force_mld_version);
        buffer.set_accept_ra_defrtr(self.accept_ra_defrtr);
        buffer.set_accept_ra_pinfo(self.accept_ra_pinfo);
        buffer.set_accept_ra_rtr_pref(self.accept_ra_rtr_pref);
        buffer.set_router_probe_interval(self.router_probe_interval);
        buffer
            .set_accept_ra_rt_info_max_plen(self.accept_ra_rt_info_max_plen);
        buffer.set_proxy_ndp(self.proxy_ndp);
        buffer.set_optimistic_dad(self.optimistic_dad);
        buffer.set_accept_source_route(self.accept_source_route);
        buffer.set_mc_forwarding(self.mc_forwarding);
        buffer.set_disable_ipv6(self.disable_ipv6);
        buffer.set_accept_dad(self.accept_dad);
        buffer.set_force_tllao(self.force_tllao);
        buffer.set_ndisc_notify(self.ndisc_notify);
    }
}

pub(crate) const INET6_CACHE_INFO_LEN: usize = 16;

buffer!(Inet6CacheInfoBuffer(INET6_CACHE_INFO_LEN) {
    max_reasm_len: (u32, 0..4),
    tstamp: (u32, 4..8),
    reachable_time: (u32, 8..12),
    retrans_time: (u32, 12..INET6_CACHE_INFO_LEN),
});

/// `IFLA_INET6_CACHEINFO` block.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Inet6CacheInfo {
    pub max_reasm_len: u32,
    pub tstamp: u32,
    pub reachable_time: u32,
    pub retrans_time: u32,
}

impl<T: AsRef<[u8]>> Parseable<Inet6CacheInfoBuffer<T>> for Inet6CacheInfo {
    fn parse(buf: &Inet6CacheInfoBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            max_reasm_len: buf.max_reasm_len(),
            tstamp: buf.tstamp(),
            reachable_time: buf.reachable_time(),
            retrans_time: buf.retrans_time(),
        })
    }
}

impl Emitable for Inet6CacheInfo {
    fn buffer_len(&self) -> usize {
        INET6_CACHE_INFO_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = Inet6CacheInfoBuffer::new(buffer);
        buffer.set_max_reasm_len(self.max_reasm_len);
        buffer.set_tstamp(self.tstamp);
        buffer.set_reachable_time(self.reachable_time);
        buffer.set_retrans_time(self.retrans_time);
    }
}

pub(crate) const ICMP6_STATS_LEN: usize = 40;

buffer!(Icmp6StatsBuffer(ICMP6_STATS_LEN) {
    num: (u64, 0..8),
    in_errors: (u64, 8..16),
    out_msgs: (u64, 16..24),
    out_errors: (u64, 24..32),
    in_msgs: (u64, 32..ICMP6_STATS_LEN),
});

/// `IFLA_INET6_ICMP6STATS` block.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct Icmp6Stats {
    pub num: u64,
    pub in_errors: u64,
    pub out_msgs: u64,
    pub out_errors: u64,
    pub in_msgs: u64,
}

impl<T: AsRef<[u8]>> Parseable<Icmp6StatsBuffer<T>> for Icmp6Stats {
    fn parse(buf: &Icmp6StatsBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            num: buf.num(),
            in_errors: buf.in_errors(),
            out_msgs: buf.out_msgs(),
            out_errors: buf.out_errors(),
            in_msgs: buf.in_msgs(),
        })
    }
}

impl Emitable for Icmp6Stats {
    fn buffer_len(&self) -> usize {
        ICMP6_STATS_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = Icmp6StatsBuffer::new(buffer);
        buffer.set_num(self.num);
        buffer.set_in_errors(self.in_errors);
        buffer.set_out_msgs(self.out_msgs);
        buffer.set_out_errors(self.out_errors);
        buffer.set_in_msgs(self.in_msgs);
    }
}

/// One attribute of the `AF_INET6` entry of `IFLA_AF_SPEC`.
#[derive(Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum AfSpecInet6 {
    Flags(u32),
    DevConf(Inet6DevConf),
    /// Per-interface SNMP counters, kept as raw `u32` words.
    Stats(Vec<u32>),
    Mcast(Vec<u8>),
    CacheInfo(Inet6CacheInfo),
    Icmp6Stats(Icmp6Stats),
    Token(Ipv6Addr),
    AddrGenMode(u8),
    Other(DefaultNla),
}

impl Nla for AfSpecInet6 {
    fn value_len(&self) -> usize {
        match self {
            Self::Flags(_) => 4,
            Self::DevConf(conf) => conf.buffer_len(),
            Self::Stats(words) => 4 * words.len(),
            Self::Mcast(bytes) => bytes.len(),
            Self::CacheInfo(info) => info.buffer_len(),
            Self::Icmp6Stats(stats) => stats.buffer_len(),
            Self::Token(_) => 16,
            Self::AddrGenMode(_) => 1,
            Self::Other(nla) => nla.value_len(),
        }
    }

    fn emit_value(&self, buffer: &mut [u8]) {
        match self {
            Self::Flags(value) => NativeEndian::write_u32(buffer, *value),
            Self::DevConf(conf) => conf.emit(buffer),
            Self::Stats(words) => {
                for (i, word) in words.iter().enumerate() {
                    NativeEndian::write_u32(&mut buffer[i * 4..], *word);
                }
            }
            Self::Mcast(bytes) => buffer.copy_from_slice(bytes.as_slice()),
            Self::CacheInfo(info) => info.emit(buffer),
            Self::Icmp6Stats(stats) => stats.emit(buffer),
            Self::Token(addr) => buffer.copy_from_slice(&addr.octets()),
            Self::AddrGenMode(mode) => buffer[0] = *mode,
            Self::Other(nla) => nla.emit_value(buffer),
        }
    }

    fn kind(&self) -> u16 {
        match self {
            Self::Flags(_) => IFLA_INET6_FLAGS,
            Self::DevConf(_) => IFLA_INET6_CONF,
            Self::Stats(_) => IFLA_INET6_STATS,
            Self::Mcast(_) => IFLA_INET6_MCAST,
            Self::CacheInfo(_) => IFLA_INET6_CACHEINFO,
            Self::Icmp6Stats(_) => IFLA_INET6_ICMP6STATS,
            Self::Token(_) => IFLA_INET6_TOKEN,
            Self::AddrGenMode(_) => IFLA_INET6_ADDR_GEN_MODE,
            Self::Other(nla) => nla.kind(),
        }
    }
}

impl<'a, T: AsRef<[u8]> + ?Sized> Parseable<NlaBuffer<&'a T>> for AfSpecInet6 {
    fn parse(buf: &NlaBuffer<&'a T>) -> Result<Self, DecodeError> {
        let payload = buf.value();
        Ok(match buf.kind() {
            IFLA_INET6_FLAGS => Self::Flags(
                parse_u32(payload).context("invalid IFLA_INET6_FLAGS")?,
            ),
            IFLA_INET6_CONF => Self::DevConf(
                Inet6DevConf::parse(
                    &Inet6DevConfBuffer::new_checked(payload)
                        .context("invalid IFLA_INET6_CONF")?,
                )
                .context("invalid IFLA_INET6_CONF")?,
            ),
            IFLA_INET6_STATS => {
                if payload.len() % 4 != 0 {
                    return Err(format!(
                        "invalid IFLA_INET6_STATS length {}",
                        payload.len()
                    )
                    .into());
                }
                Self::Stats(
                    payload
                        .chunks_exact(4)
                        .map(NativeEndian::read_u32)
                        .collect(),
                )
            }
            IFLA_INET6_MCAST => Self::Mcast(payload.to_vec()),
            IFLA_INET6_CACHEINFO => Self::CacheInfo(
                Inet6CacheInfo::parse(
                    &Inet6CacheInfoBuffer::new_checked(payload)
                        .context("invalid IFLA_INET6_CACHEINFO")?,
                )
                .context("invalid IFLA_INET6_CACHEINFO")?,
            ),
            IFLA_INET6_ICMP6STATS => Self::Icmp6Stats(
                Icmp6Stats::parse(
                    &Icmp6StatsBuffer::new_checked(payload)
                        .context("invalid IFLA_INET6_ICMP6STATS")?,
                )
                .context("invalid IFLA_INET6_ICMP6STATS")?,
            ),
            IFLA_INET6_TOKEN => {
                if payload.len() != 16 {
                    return Err(format!(
                        "invalid IFLA_INET6_TOKEN length {}",
                        payload.len()
                    )
                    .into());
                }
                let mut octets = [0u8; 16];
                octets.copy_from_slice(payload);
                Self::Token(Ipv6Addr::from(octets))
            }
            IFLA_INET6_ADDR_GEN_MODE => Self::AddrGenMode(
                parse_u8(payload)
                    .context("invalid IFLA_INET6_ADDR_GEN_MODE")?,
            ),
            kind => Self::Other(DefaultNla::parse(buf).context(format!(
                "unknown NLA type {kind} for IFLA_AF_SPEC(inet6)"
            ))?),
        })
    }
}
