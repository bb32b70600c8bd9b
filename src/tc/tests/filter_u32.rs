// SPDX-License-Identifier: MIT

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::tc::{
    TcAttribute, TcFilterU32Option, TcMessage, TcMessageBuffer, TcOptions,
    TcPolice, TcPoliceOption, TcU32Key, TcU32Selector,
};

#[test]
fn selector_keys_are_big_endian() {
    let selector = TcU32Selector {
        flags: 1,
        keys: vec![TcU32Key {
            mask: 0x00ff_0000,
            val: 0x0006_0000,
            off: 8,
            offmask: 0,
        }],
        ..Default::default()
    };
    let mut emitted = vec![0; selector.buffer_len()];
    selector.emit(&mut emitted);

    assert_eq!(emitted.len(), 32);
    assert_eq!(emitted[2], 1); // nkeys
    assert_eq!(&emitted[16..20], &[0x00, 0xff, 0x00, 0x00]); // mask, network order
    assert_eq!(&emitted[20..24], &[0x00, 0x06, 0x00, 0x00]); // value, network order
    assert_eq!(&emitted[24..28], &8i32.to_ne_bytes());

    let parsed = TcU32Selector::parse(emitted.as_slice()).unwrap();
    assert_eq!(parsed, selector);
}

#[test]
fn selector_with_bad_key_count_is_an_error() {
    let mut emitted = vec![0u8; 16];
    emitted[2] = 2; // two keys declared, none present
    assert!(TcU32Selector::parse(emitted.as_slice()).is_err());
}

#[test]
fn u32_filter_message_round_trip() {
    let mut msg = TcMessage::with_index(2);
    msg.attributes
        .push(TcAttribute::Kind("u32".to_string()));
    msg.attributes
        .push(TcAttribute::Options(TcOptions::U32(vec![
            TcFilterU32Option::ClassId(0x0001_0010),
            TcFilterU32Option::Hash(0x8000_0000),
            TcFilterU32Option::Selector(TcU32Selector {
                keys: vec![TcU32Key {
                    mask: 0xffff_ffff,
                    val: 0x0a00_0001,
                    off: 16,
                    offmask: 0,
                }],
                ..Default::default()
            }),
            TcFilterU32Option::Police(vec![TcPoliceOption::Tbf(TcPolice {
                action: 2,
                burst: 10_000,
                mtu: 2048,
                ..Default::default()
            })]),
        ])));

    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    let parsed = TcMessage::parse(
        &TcMessageBuffer::new_checked(&emitted.as_slice()).unwrap(),
    )
    .unwrap();
    assert_eq!(parsed, msg);

    let mut again = vec![0; parsed.buffer_len()];
    parsed.emit(&mut again);
    assert_eq!(emitted, again);
}
