// SPDX-License-Identifier: MIT

use std::net::Ipv6Addr;

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::link::{
    AfSpec, AfSpecInet6, Inet6CacheInfo, Inet6DevConf, InetDevConf,
    LinkAttribute, LinkMessage, LinkMessageBuffer,
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
fn inet_devconf_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::AfSpec(vec![AfSpec::Inet(
        InetDevConf {
            forwarding: 1,
            rp_filter: 2,
            route_localnet: 1,
            ..Default::default()
        },
    )]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn inet6_round_trip() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::AfSpec(vec![AfSpec::Inet6(
        vec![
            AfSpecInet6::Flags(0x80),
            AfSpecInet6::DevConf(Inet6DevConf {
                forwarding: 1,
                hop_limit: 64,
                mtu: 1500,
                ..Default::default()
            }),
            AfSpecInet6::Stats(vec![0; 31]),
            AfSpecInet6::CacheInfo(Inet6CacheInfo {
                max_reasm_len: 65535,
                tstamp: 12,
                reachable_time: 30_000,
                retrans_time: 1000,
            }),
            AfSpecInet6::Token(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1)),
            AfSpecInet6::AddrGenMode(1),
        ],
    )]));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn unknown_family_stays_opaque() {
    // AF_UNIX entry carries no schema
    let mut bytes = vec![0u8; 28];
    bytes[16..20].copy_from_slice(&[0x0c, 0x00, 0x1a, 0x00]);
    bytes[20..24].copy_from_slice(&[0x08, 0x00, 0x01, 0x00]);
    bytes[24..28].copy_from_slice(&[1, 2, 3, 4]);

    let msg = LinkMessage::parse(
        &LinkMessageBuffer::new_checked(&bytes.as_slice()).unwrap(),
    )
    .unwrap();
    match &msg.attributes[0] {
        LinkAttribute::AfSpec(entries) => {
            assert!(matches!(entries[0], AfSpec::Other(_)))
        }
        other => panic!("unexpected attribute {other:?}"),
    }

    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    assert_eq!(emitted, bytes);
}
