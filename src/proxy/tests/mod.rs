// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use netlink_packet_core::{NetlinkHeader, NetlinkMessage, NetlinkPayload};

use super::host::mock::RecordingHost;
use super::{LinkLookup, ProxyError, RtnlProxy, Verdict};
use crate::link::{
    InfoBond, InfoBridge, InfoData, InfoKind, InfoTunTap, LinkAttribute,
    LinkInfo, LinkMessage, TunTapIfr,
};
use crate::RouteNetlinkMessage;

struct MapLookup(HashMap<i32, LinkMessage>);

impl MapLookup {
    fn new(links: Vec<(i32, LinkMessage)>) -> Self {
        Self(links.into_iter().collect())
    }
}

impl LinkLookup for MapLookup {
    fn link_by_index(&mut self, index: i32) -> Result<LinkMessage, ProxyError> {
        self.0.get(&index).cloned().ok_or_else(|| {
            ProxyError::Io(io::Error::from_raw_os_error(libc::ENODEV))
        })
    }
}

fn named_link(index: i32, name: &str) -> LinkMessage {
    let mut msg = LinkMessage::default();
    msg.header.index = index;
    msg.attributes.push(LinkAttribute::IfName(name.to_string()));
    msg
}

fn packet(message: RouteNetlinkMessage) -> Vec<u8> {
    let mut message = NetlinkMessage::new(
        NetlinkHeader::default(),
        NetlinkPayload::InnerMessage(message),
    );
    message.finalize();
    let mut buffer = vec![0; message.buffer_len()];
    message.serialize(&mut buffer);
    buffer
}

fn decode_dump(data: &[u8]) -> Vec<LinkMessage> {
    let mut offset = 0;
    let mut links = Vec::new();
    while offset < data.len() {
        let message =
            NetlinkMessage::<RouteNetlinkMessage>::deserialize(&data[offset..])
                .unwrap();
        offset += message.header.length as usize;
        if let NetlinkPayload::InnerMessage(RouteNetlinkMessage::NewLink(
            link,
        )) = message.payload
        {
            links.push(link);
        }
    }
    links
}

#[test]
fn newlink_tuntap_goes_through_the_ioctl_backend() {
    let mut link = named_link(0, "tap0");
    link.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Tuntap),
        LinkInfo::Data(InfoData::Tuntap(vec![
            InfoTunTap::Mode("tap".to_string()),
            InfoTunTap::Ifr(TunTapIfr {
                no_pi: 1,
                ..Default::default()
            }),
        ])),
    ]));
    let data = packet(RouteNetlinkMessage::NewLink(link));

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    let verdict = proxy.new_link(&data).unwrap();

    assert_eq!(verdict, Verdict::Handled);
    let taps = proxy.host().tuntaps.borrow();
    assert_eq!(taps.len(), 1);
    assert_eq!(taps[0].name, "tap0");
    assert_eq!(taps[0].flags, 0x1002);
    assert_eq!(taps[0].owner, None);
}

#[test]
fn newlink_ovs_bridge_is_handled_by_ovs_vsctl() {
    let mut link = named_link(0, "br-ex");
    link.attributes
        .push(LinkAttribute::LinkInfo(vec![LinkInfo::Kind(
            InfoKind::Other("ovs-bridge".to_string()),
        )]));
    let data = packet(RouteNetlinkMessage::NewLink(link));

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    assert_eq!(proxy.new_link(&data).unwrap(), Verdict::Handled);
    assert_eq!(proxy.host().commands(), vec!["ovs-vsctl add-br br-ex"]);
    assert!(proxy.host().sleeps.borrow().is_empty());
}

#[test]
fn ancient_newlink_bond_writes_the_masters_file_and_settles() {
    let mut link = named_link(0, "bond0");
    link.attributes
        .push(LinkAttribute::LinkInfo(vec![LinkInfo::Kind(
            InfoKind::Bond,
        )]));
    let data = packet(RouteNetlinkMessage::NewLink(link));

    let proxy = RtnlProxy::new(RecordingHost::default(), true);
    assert_eq!(proxy.new_link(&data).unwrap(), Verdict::Handled);
    assert_eq!(
        proxy.host().writes(),
        vec![(
            "/sys/class/net/bonding_masters".into(),
            "+bond0".to_string()
        )]
    );
    assert_eq!(
        proxy.host().sleeps.borrow().as_slice(),
        &[Duration::from_millis(300)]
    );
}

#[test]
fn newlink_forwards_unhandled_kinds() {
    let mut link = named_link(0, "bond0");
    link.attributes
        .push(LinkAttribute::LinkInfo(vec![LinkInfo::Kind(
            InfoKind::Bond,
        )]));
    let data = packet(RouteNetlinkMessage::NewLink(link));

    // bond management works over netlink on a non-ancient kernel
    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    assert_eq!(
        proxy.new_link(&data).unwrap(),
        Verdict::Forward(data.clone())
    );
    assert!(proxy.host().commands().is_empty());
    assert!(proxy.host().writes().is_empty());
}

#[test]
fn ancient_dellink_bridge_downs_and_deletes() {
    let mut bridge = named_link(5, "br0");
    bridge
        .attributes
        .push(LinkAttribute::LinkInfo(vec![LinkInfo::Kind(
            InfoKind::Bridge,
        )]));
    let mut lookup = MapLookup::new(vec![(5, bridge)]);

    let data = packet(RouteNetlinkMessage::DelLink({
        let mut msg = LinkMessage::default();
        msg.header.index = 5;
        msg
    }));

    let proxy = RtnlProxy::new(RecordingHost::default(), true);
    assert_eq!(
        proxy.del_link(&mut lookup, &data).unwrap(),
        Verdict::Handled
    );
    assert_eq!(
        proxy.host().commands(),
        vec!["ip link set dev br0 down", "brctl delbr br0"]
    );
    assert_eq!(proxy.host().sleeps.borrow().len(), 1);
}

#[test]
fn dellink_openvswitch_is_removed_via_ovs_vsctl() {
    let mut ovs = named_link(9, "br-int");
    ovs.attributes
        .push(LinkAttribute::LinkInfo(vec![LinkInfo::Kind(
            InfoKind::Other("openvswitch".to_string()),
        )]));
    let mut lookup = MapLookup::new(vec![(9, ovs)]);

    let data = packet(RouteNetlinkMessage::DelLink({
        let mut msg = LinkMessage::default();
        msg.header.index = 9;
        msg
    }));

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    assert_eq!(
        proxy.del_link(&mut lookup, &data).unwrap(),
        Verdict::Handled
    );
    assert_eq!(proxy.host().commands(), vec!["ovs-vsctl del-br br-int"]);
}

#[test]
fn setlink_master_zero_detaches_the_port() {
    // index 17 is eth0, enslaved to br0 (index 1) according to sysfs
    let mut lookup =
        MapLookup::new(vec![(17, named_link(17, "eth0")), (1, named_link(1, "br0"))]);
    let host = RecordingHost::default()
        .with_file("/sys/class/net/eth0/brport/bridge/ifindex", "1\n")
        .with_file("/sys/class/net/br0/bridge/stp_state", "0\n");

    let data = packet(RouteNetlinkMessage::SetLink({
        let mut msg = LinkMessage::default();
        msg.header.index = 17;
        msg.attributes.push(LinkAttribute::Master(0));
        msg
    }));

    let proxy = RtnlProxy::new(host, true);
    assert_eq!(
        proxy.set_link(&mut lookup, &data).unwrap(),
        Verdict::Handled
    );
    assert_eq!(proxy.host().commands(), vec!["brctl delif br0 eth0"]);
}

#[test]
fn setlink_nonzero_master_attaches_a_bond_port() {
    let mut lookup = MapLookup::new(vec![
        (17, named_link(17, "eth0")),
        (3, named_link(3, "bond0")),
    ]);
    let host = RecordingHost::default()
        .with_file("/sys/class/net/bond0/bonding/mode", "balance-rr 0\n");

    let data = packet(RouteNetlinkMessage::SetLink({
        let mut msg = LinkMessage::default();
        msg.header.index = 17;
        msg.attributes.push(LinkAttribute::Master(3));
        msg
    }));

    let proxy = RtnlProxy::new(host, true);
    assert_eq!(
        proxy.set_link(&mut lookup, &data).unwrap(),
        Verdict::Handled
    );
    assert_eq!(
        proxy.host().writes(),
        vec![(
            "/sys/class/net/bond0/bonding/slaves".into(),
            "+eth0".to_string()
        )]
    );
}

#[test]
fn setlink_bridge_data_goes_through_sysfs() {
    let mut link = named_link(5, "br0");
    link.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Bridge),
        LinkInfo::Data(InfoData::Bridge(vec![
            InfoBridge::StpState(1),
            InfoBridge::MaxAge(1200),
        ])),
    ]));
    let data = packet(RouteNetlinkMessage::SetLink(link));
    let mut lookup = MapLookup::new(vec![]);

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    // no master attribute: the request is still forwarded after the writes
    assert_eq!(
        proxy.set_link(&mut lookup, &data).unwrap(),
        Verdict::Forward(data.clone())
    );
    assert_eq!(
        proxy.host().writes(),
        vec![
            ("/sys/class/net/br0/bridge/stp_state".into(), "1".to_string()),
            ("/sys/class/net/br0/bridge/max_age".into(), "1200".to_string()),
        ]
    );
}

#[test]
fn setlink_reports_the_last_failing_writer() {
    let mut link = named_link(5, "br0");
    link.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Bridge),
        LinkInfo::Data(InfoData::Bridge(vec![
            InfoBridge::StpState(1),
            InfoBridge::MaxAge(1200),
        ])),
    ]));
    let data = packet(RouteNetlinkMessage::SetLink(link));
    let mut lookup = MapLookup::new(vec![]);

    let host = RecordingHost::default()
        .with_failing_write("/sys/class/net/br0/bridge/stp_state", libc::EACCES)
        .with_failing_write("/sys/class/net/br0/bridge/max_age", libc::EINVAL);

    let proxy = RtnlProxy::new(host, false);
    let error = proxy.set_link(&mut lookup, &data).unwrap_err();
    assert_eq!(error.errno(), Some(libc::EINVAL));
}

#[test]
fn setlink_without_kind_or_master_forwards_unchanged() {
    let data = packet(RouteNetlinkMessage::SetLink({
        let mut msg = named_link(2, "eth1");
        msg.attributes.push(LinkAttribute::Mtu(9000));
        msg
    }));
    let mut lookup = MapLookup::new(vec![]);

    let proxy = RtnlProxy::new(RecordingHost::default(), true);
    assert_eq!(
        proxy.set_link(&mut lookup, &data).unwrap(),
        Verdict::Forward(data.clone())
    );
}

#[test]
fn dump_enriches_a_legacy_bond() {
    let data = packet(RouteNetlinkMessage::NewLink(named_link(7, "bond0")));

    let host = RecordingHost::default()
        .with_dir("/sys/class/net/bond0", &["bonding", "flags", "mtu"])
        .with_file(
            "/sys/class/net/bond0/bonding/mode",
            "active-backup 1\n",
        )
        .with_file("/sys/class/net/bond0/bonding/miimon", "100\n");

    let proxy = RtnlProxy::new(host, true);
    let verdict = proxy.link_dump(&data).unwrap();
    let rewritten = match verdict {
        Verdict::Forward(bytes) => decode_dump(&bytes),
        Verdict::Handled => panic!("dump must forward"),
    };

    assert_eq!(rewritten.len(), 1);
    let link = &rewritten[0];
    assert_eq!(link.info_kind(), Some(&InfoKind::Bond));
    assert_eq!(
        link.info_data(),
        Some(&InfoData::Bond(vec![
            InfoBond::Mode(1),
            InfoBond::MiiMon(100),
        ]))
    );
}

#[test]
fn dump_fills_in_the_master_of_a_bridge_port() {
    let data = packet(RouteNetlinkMessage::NewLink(named_link(17, "eth0")));

    let host = RecordingHost::default()
        .with_file("/sys/class/net/eth0/brport/bridge/ifindex", "4\n")
        .with_dir("/sys/class/net/eth0", &["flags", "mtu"]);

    let proxy = RtnlProxy::new(host, true);
    let rewritten = match proxy.link_dump(&data).unwrap() {
        Verdict::Forward(bytes) => decode_dump(&bytes),
        Verdict::Handled => panic!("dump must forward"),
    };
    assert_eq!(rewritten[0].master(), Some(4));
}

#[test]
fn dump_with_nothing_to_add_round_trips() {
    let mut link = named_link(2, "eth1");
    link.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Vlan),
    ]));
    let data = packet(RouteNetlinkMessage::NewLink(link));

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    assert_eq!(
        proxy.link_dump(&data).unwrap(),
        Verdict::Forward(data.clone())
    );
}

#[test]
fn dump_walks_multiple_messages() {
    let mut data = packet(RouteNetlinkMessage::NewLink(named_link(1, "lo")));
    data.extend(packet(RouteNetlinkMessage::NewLink(named_link(2, "eth0"))));

    let proxy = RtnlProxy::new(RecordingHost::default(), false);
    let rewritten = match proxy.link_dump(&data).unwrap() {
        Verdict::Forward(bytes) => decode_dump(&bytes),
        Verdict::Handled => panic!("dump must forward"),
    };
    assert_eq!(rewritten.len(), 2);
    assert_eq!(rewritten[0].if_name(), Some("lo"));
    assert_eq!(rewritten[1].if_name(), Some("eth0"));
}
