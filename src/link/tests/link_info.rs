// SPDX-License-Identifier: MIT

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::link::{
    BondAdInfo, InfoBond, InfoBridge, InfoData, InfoKind, InfoTunTap,
    InfoVeth, InfoVlan, LinkAttribute, LinkInfo, LinkMessage,
    LinkMessageBuffer, TunTapIfr,
};

fn round_trip(msg: &LinkMessage) -> LinkMessage {
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    let parsed = LinkMessage::parse(
        &LinkMessageBuffer::new_checked(&emitted.as_slice()).unwrap(),
    )
    .unwrap();
    let mut again = vec![0; parsed.buffer_len()];
    parsed.emit(&mut again);
    assert_eq!(emitted, again);
    parsed
}

#[test]
fn bond_link_info_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Bond),
        LinkInfo::Data(InfoData::Bond(vec![
            InfoBond::Mode(1),
            InfoBond::MiiMon(100),
            InfoBond::ArpIpTarget(vec![0; 16]),
            InfoBond::AdInfo(vec![
                BondAdInfo::Aggregator(2),
                BondAdInfo::PartnerMac([0, 1, 2, 3, 4, 5]),
            ]),
        ])),
    ]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn bridge_link_info_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Bridge),
        LinkInfo::Data(InfoData::Bridge(vec![
            InfoBridge::StpState(1),
            InfoBridge::MaxAge(2000),
        ])),
    ]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn vlan_link_info_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Vlan),
        LinkInfo::Data(InfoData::Vlan(vec![
            InfoVlan::Id(100),
            InfoVlan::Flags((1, 1)),
        ])),
    ]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn veth_peer_is_an_embedded_link_message() {
    let mut peer = LinkMessage::default();
    peer.attributes
        .push(LinkAttribute::IfName("veth1".to_string()));
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Veth),
        LinkInfo::Data(InfoData::Veth(vec![InfoVeth::Peer(peer)])),
    ]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn tuntap_link_info_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes
        .push(LinkAttribute::IfName("tap0".to_string()));
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Tuntap),
        LinkInfo::Data(InfoData::Tuntap(vec![
            InfoTunTap::Mode("tap".to_string()),
            InfoTunTap::Uid(1000),
            InfoTunTap::Ifr(TunTapIfr {
                no_pi: 1,
                ..Default::default()
            }),
        ])),
    ]));
    let parsed = round_trip(&msg);
    assert_eq!(parsed.info_kind(), Some(&InfoKind::Tuntap));
    assert_eq!(parsed, msg);
}

#[test]
fn unknown_kind_data_stays_opaque() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::LinkInfo(vec![
        LinkInfo::Kind(InfoKind::Other("gre".to_string())),
        LinkInfo::Data(InfoData::Other(vec![1, 2, 3, 4])),
    ]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn data_without_preceding_kind_stays_opaque() {
    // IFLA_LINKINFO holding a lone IFLA_INFO_DATA: 16 byte link header,
    // then L=12,T=18 around L=8,T=2 with 4 value bytes
    let mut bytes = vec![0u8; 28];
    bytes[16..20].copy_from_slice(&[0x0c, 0x00, 0x12, 0x00]);
    bytes[20..24].copy_from_slice(&[0x08, 0x00, 0x02, 0x00]);
    bytes[24..28].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);

    let msg = LinkMessage::parse(
        &LinkMessageBuffer::new_checked(&bytes.as_slice()).unwrap(),
    )
    .unwrap();
    assert_eq!(
        msg.attributes,
        vec![LinkAttribute::LinkInfo(vec![LinkInfo::Data(
            InfoData::Other(vec![0xde, 0xad, 0xbe, 0xef])
        )])]
    );

    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    assert_eq!(emitted, bytes);
}
