// SPDX-License-Identifier: MIT

use netlink_packet_utils::nla::DefaultNla;
use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::link::{
    LinkAttribute, LinkFlags, LinkMessage, LinkMessageBuffer, NetNs, State,
};
use crate::AddressFamily;

static LINK_MSG: [u8; 96] = [
    0x00, // interface family AF_UNSPEC
    0x00, // reserved
    0x04, 0x03, // device type 772 = loopback
    0x01, 0x00, 0x00, 0x00, // interface index = 1
    0x49, 0x00, 0x01, 0x00, // flags: UP|LOOPBACK|RUNNING|LOWER_UP
    0x00, 0x00, 0x00, 0x00, // change mask
    // attributes
    0x07, 0x00, 0x03, 0x00, 0x6c, 0x6f, 0x00, // device name L=7,T=3,V=lo
    0x00, // padding
    0x08, 0x00, 0x0d, 0x00, 0xe8, 0x03, 0x00,
    0x00, // TxQueue length L=8,T=13,V=1000
    0x05, 0x00, 0x10, 0x00, 0x00, // OperState L=5,T=16,V=0 (unknown)
    0x00, 0x00, 0x00, // padding
    0x05, 0x00, 0x11, 0x00, 0x00, // Link mode L=5,T=17,V=0
    0x00, 0x00, 0x00, // padding
    0x08, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, // MTU L=8,T=4,V=65536
    0x08, 0x00, 0x1b, 0x00, 0x00, 0x00, 0x00, 0x00, // Group L=8,T=27,V=0
    0x08, 0x00, 0x1e, 0x00, 0x00, 0x00, 0x00,
    0x00, // Promiscuity L=8,T=30,V=0
    0x08, 0x00, 0x1f, 0x00, 0x01, 0x00, 0x00,
    0x00, // Number of Tx queues L=8,T=31,V=1
    0x08, 0x00, 0x28, 0x00, 0xff, 0xff, 0x00,
    0x00, // GSO max segments, no schema here L=8,T=40
    0x08, 0x00, 0x29, 0x00, 0x00, 0x00, 0x01,
    0x00, // GSO max size, no schema here L=8,T=41
];

#[test]
fn empty_link_message_round_trip() {
    let bytes = [0u8; 16];
    let bytes_ref = &bytes[..];
    let buffer = LinkMessageBuffer::new_checked(&bytes_ref).unwrap();
    let msg = LinkMessage::parse(&buffer).unwrap();

    assert_eq!(msg.header.interface_family, AddressFamily::Unspec);
    assert_eq!(msg.header.device_type, 0);
    assert_eq!(msg.header.index, 0);
    assert_eq!(msg.header.flags, LinkFlags::Value(0));
    assert_eq!(msg.header.change_mask, 0);
    assert!(msg.attributes.is_empty());

    assert_eq!(msg.buffer_len(), 16);
    let mut emitted = vec![0u8; 16];
    msg.emit(&mut emitted);
    assert_eq!(&emitted[..], &bytes[..]);
}

#[test]
fn link_message_round_trip() {
    let link_msg_ref = &LINK_MSG[..];
    let buffer = LinkMessageBuffer::new_checked(&link_msg_ref).unwrap();
    let msg = LinkMessage::parse(&buffer).unwrap();

    assert_eq!(msg.header.device_type, 772);
    assert_eq!(msg.header.index, 1);
    assert_eq!(msg.header.flags, LinkFlags::Value(0x0001_0049));
    assert_eq!(msg.attributes.len(), 10);
    assert_eq!(msg.attributes[0], LinkAttribute::IfName("lo".to_string()));
    assert_eq!(msg.attributes[1], LinkAttribute::TxQueueLen(1000));
    assert_eq!(msg.attributes[2], LinkAttribute::OperState(State::Unknown));
    assert_eq!(msg.attributes[3], LinkAttribute::Mode(0));
    assert_eq!(msg.attributes[4], LinkAttribute::Mtu(65536));
    assert_eq!(msg.attributes[5], LinkAttribute::Group(0));
    assert_eq!(
        msg.attributes[8],
        LinkAttribute::Other(DefaultNla::new(
            40,
            vec![0xff, 0xff, 0x00, 0x00]
        ))
    );

    // byte-for-byte re-encode, attribute order and padding preserved
    assert_eq!(msg.buffer_len(), LINK_MSG.len());
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    assert_eq!(&emitted[..], &LINK_MSG[..]);
}

#[test]
fn named_flags_set_value_and_change_mask() {
    let mut msg = LinkMessage::default();
    msg.header.flags =
        LinkFlags::Named(vec!["UP".to_string(), "!PROMISC".to_string()]);

    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);

    let buffer = LinkMessageBuffer::new(&emitted);
    assert_eq!(buffer.flags(), 0x1);
    assert_eq!(buffer.change_mask(), 0x101);
}

#[test]
fn operstate_names_encode_to_codes() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::OperState(
        "DORMANT".parse::<State>().unwrap(),
    ));
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    // attribute value starts right after the 16 byte header + 4 byte TLV
    assert_eq!(emitted[20], 5);
}

#[test]
fn netns_fd_value_is_emitted() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::NetNsFd(NetNs::Fd(7)));
    let emitted = msg.encode().unwrap();
    assert_eq!(&emitted[20..24], &7i32.to_ne_bytes());
}

#[test]
fn missing_netns_name_fails_encode() {
    let mut msg = LinkMessage::default();
    msg.attributes.push(LinkAttribute::NetNsFd(NetNs::Name(
        "no-such-namespace-here".to_string(),
    )));
    assert!(msg.encode().is_err());
}

#[test]
fn truncated_buffer_is_an_error() {
    let bytes = [0u8; 12];
    assert!(LinkMessageBuffer::new_checked(&&bytes[..]).is_err());
}
