// SPDX-License-Identifier: MIT

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::tc::{
    TcAttribute, TcMessage, TcMessageBuffer, TcOptions, TcQdiscSfq,
    TcQdiscSfqV0, TcQdiscSfqV1, TcStats2, TcStatsBasic,
};

fn round_trip(msg: &TcMessage) -> TcMessage {
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    let parsed = TcMessage::parse(
        &TcMessageBuffer::new_checked(&emitted.as_slice()).unwrap(),
    )
    .unwrap();
    let mut again = vec![0; parsed.buffer_len()];
    parsed.emit(&mut again);
    assert_eq!(emitted, again);
    parsed
}

#[test]
fn sfq_v0_options_by_length() {
    let mut msg = TcMessage::with_index(2);
    msg.attributes
        .push(TcAttribute::Kind("sfq".to_string()));
    msg.attributes
        .push(TcAttribute::Options(TcOptions::Sfq(TcQdiscSfq::V0(
            TcQdiscSfqV0 {
                quantum: 1514,
                perturb_period: 10,
                limit: 127,
                divisor: 1024,
                flows: 128,
            },
        ))));
    let parsed = round_trip(&msg);
    assert_eq!(parsed, msg);
}

#[test]
fn sfq_v1_options_by_length() {
    let mut msg = TcMessage::with_index(2);
    msg.attributes
        .push(TcAttribute::Kind("sfq".to_string()));
    msg.attributes
        .push(TcAttribute::Options(TcOptions::Sfq(TcQdiscSfq::V1(
            TcQdiscSfqV1 {
                quantum: 1514,
                perturb_period: 10,
                limit_v0: 127,
                divisor: 1024,
                flows: 128,
                depth: 127,
                qth_min: 10,
                qth_max: 20,
                wlog: 3,
                max_p: 0xa000_0000,
                ..Default::default()
            },
        ))));
    let parsed = round_trip(&msg);
    assert_eq!(parsed, msg);
}

#[test]
fn ingress_options_are_a_raw_word() {
    let mut msg = TcMessage::with_index(1);
    msg.attributes
        .push(TcAttribute::Kind("ingress".to_string()));
    msg.attributes.push(TcAttribute::Options(TcOptions::Ingress(
        Default::default(),
    )));
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);
    // 20 byte tcmsg + 12 byte kind attribute + 4 byte TLV header + u32
    assert_eq!(emitted.len(), 40);
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn options_for_unknown_kind_stay_opaque() {
    let mut msg = TcMessage::with_index(1);
    msg.attributes
        .push(TcAttribute::Kind("codel".to_string()));
    msg.attributes.push(TcAttribute::Options(TcOptions::Other(
        vec![1, 2, 3, 4, 5, 6, 7, 8],
    )));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn stats2_round_trip() {
    let mut msg = TcMessage::with_index(3);
    msg.attributes
        .push(TcAttribute::Kind("sfq".to_string()));
    msg.attributes.push(TcAttribute::Stats2(vec![
        TcStats2::Basic(TcStatsBasic {
            bytes: 1024,
            packets: 7,
        }),
        TcStats2::App(vec![9, 9, 9, 9]),
    ]));
    assert_eq!(round_trip(&msg), msg);
}
