// SPDX-License-Identifier: MIT

use netlink_packet_utils::{
    traits::{Emitable, Parseable},
    DecodeError,
};

// include/linux/inetdevice.h: struct ipv4_devconf
pub(crate) const INET_DEV_CONF_LEN: usize = 108;

buffer!(InetDevConfBuffer(INET_DEV_CONF_LEN) {
    sysctl: (u32, 0..4),
    forwarding: (u32, 4..8),
    mc_forwarding: (u32, 8..12),
    proxy_arp: (u32, 12..16),
    accept_redirects: (u32, 16..20),
    secure_redirects: (u32, 20..24),
    send_redirects: (u32, 24..28),
    shared_media: (u32, 28..32),
    rp_filter: (u32, 32..36),
    accept_source_route: (u32, 36..40),
    bootp_relay: (u32, 40..44),
    log_martians: (u32, 44..48),
    tag: (u32, 48..52),
    arp_filter: (u32, 52..56),
    medium_id: (u32, 56..60),
    disable_xfrm: (u32, 60..64),
    disable_policy: (u32, 64..68),
    force_igmp_version: (u32, 68..72),
    arp_announce: (u32, 72..76),
    arp_ignore: (u32, 76..80),
    promote_secondaries: (u32, 80..84),
    arp_accept: (u32, 84..88),
    arp_notify: (u32, 88..92),
    accept_local: (u32, 92..96),
    src_valid_mark: (u32, 96..100),
    proxy_arp_pvlan: (u32, 100..104),
    route_localnet: (u32, 104..INET_DEV_CONF_LEN),
});

/// IPv4 device configuration, the raw block carried by the `AF_INET`
/// entry of `IFLA_AF_SPEC`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub struct InetDevConf {
    pub sysctl: u32,
    pub forwarding: u32,
    pub mc_forwarding: u32,
    pub proxy_arp: u32,
    pub accept_redirects: u32,
    pub secure_redirects: u32,
    pub send_redirects: u32,
    pub shared_media: u32,
    pub rp_filter: u32,
    pub accept_source_route: u32,
    pub bootp_relay: u32,
    pub log_martians: u32,
    pub tag: u32,
    pub arp_filter: u32,
    pub medium_id: u32,
    pub disable_xfrm: u32,
    pub disable_policy: u32,
    pub force_igmp_version: u32,
    pub arp_announce: u32,
    pub arp_ignore: u32,
    pub promote_secondaries: u32,
    pub arp_accept: u32,
    pub arp_notify: u32,
    pub accept_local: u32,
    pub src_valid_mark: u32,
    pub proxy_arp_pvlan: u32,
    pub route_localnet: u32,
}

impl<T: AsRef<[u8]>> Parseable<InetDevConfBuffer<T>> for InetDevConf {
    fn parse(buf: &InetDevConfBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            sysctl: buf.sysctl(),
            forwarding: buf.forwarding(),
            mc_forwarding: buf.mc_forwarding(),
            proxy_arp: buf.proxy_arp(),
            accept_redirects: buf.accept_redirects(),
            secure_redirects: buf.secure_redirects(),
            send_redirects: buf.send_redirects(),
            shared_media: buf.shared_media(),
            rp_filter: buf.rp_filter(),
            accept_source_route: buf.accept_source_route(),
            bootp_relay: buf.bootp_relay(),
            log_martians: buf.log_martians(),
            tag: buf.tag(),
            arp_filter: buf.arp_filter(),
            medium_id: buf.medium_id(),
            disable_xfrm: buf.disable_xfrm(),
            disable_policy: buf.disable_policy(),
            force_igmp_version: buf.force_igmp_version(),
            arp_announce: buf.arp_announce(),
            arp_ignore: buf.arp_ignore(),
            promote_secondaries: buf.promote_secondaries(),
            arp_accept: buf.arp_accept(),
            arp_notify: buf.arp_notify(),
            accept_local: buf.accept_local(),
            src_valid_mark: buf.src_valid_mark(),
            proxy_arp_pvlan: buf.proxy_arp_pvlan(),
            route_localnet: buf.route_localnet(),
        })
    }
}

impl Emitable for InetDevConf {
    fn buffer_len(&self) -> usize {
        INET_DEV_CONF_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let mut buffer = InetDevConfBuffer::new(buffer);
        buffer.set_sysctl(self.sysctl);
        buffer.set_forwarding(self.forwarding);
        buffer.set_mc_forwarding(self.mc_forwarding);
        buffer.set_proxy_arp(self.proxy_arp);
        buffer.set_accept_redirects(self.accept_redirects);
        buffer.set_secure_redirects(self.secure_redirects);
        buffer.set_send_redirects(self.send_redirects);
        buffer.set_shared_media(self.shared_media);
        buffer.set_rp_filter(self.rp_filter);
        buffer.set_accept_source_route(self.accept_source_route);
        buffer.set_bootp_relay(self.bootp_relay);
        buffer.set_log_martians(self.log_martians);
        buffer.set_tag(self.tag);
        buffer.set_arp_filter(self.arp_filter);
        buffer.set_medium_id(self.medium_id);
        buffer.set_disable_xfrm(self.disable_xfrm);
        buffer.set_disable_policy(self.disable_policy);
        buffer.set_force_igmp_version(self.force_igmp_version);
        buffer.set_arp_announce(self.arp_announce);
        buffer.set_arp_ignore(self.arp_ignore);
        buffer.set_promote_secondaries(self.promote_secondaries);
        buffer.set_arp_accept(self.arp_accept);
        buffer.set_arp_notify(self.arp_notify);
        buffer.set_accept_local(self.accept_local);
        buffer.set_src_valid_mark(self.src_valid_mark);
        buffer.set_proxy_arp_pvlan(self.proxy_arp_pvlan);
        buffer.set_route_localnet(self.route_localnet);
    }
}
