// SPDX-License-Identifier: MIT

use netlink_packet_utils::nla::Nla;
use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::tc::psched::PschedClock;
use crate::tc::rtab::{TcRateSpec, LINKLAYER_ETHERNET};
use crate::tc::{
    TcAttribute, TcMessage, TcMessageBuffer, TcOptions, TcQdiscTbf,
    TcQdiscTbfOption, TcTbfQopt,
};

fn identity_clock() -> PschedClock {
    PschedClock::new(1, 1, 1_000_000)
}

fn parms() -> TcTbfQopt {
    TcTbfQopt {
        rate: TcRateSpec {
            rate: 1_000_000,
            linklayer: LINKLAYER_ETHERNET,
            ..Default::default()
        },
        limit: 10_000,
        buffer: 5_000,
        mtu: 1500,
        ..Default::default()
    }
}

#[test]
fn built_options_carry_parms_and_table() {
    let options = TcQdiscTbf::build_options(parms(), &identity_clock());
    assert_eq!(options.len(), 2);

    match &options[0] {
        TcQdiscTbfOption::Parms(built) => {
            assert_eq!(built.rate.cell_log, 3);
            assert_eq!(built.rate.cell_align, -1);
        }
        other => panic!("unexpected option {other:?}"),
    }
    match &options[1] {
        TcQdiscTbfOption::Rtab(table) => {
            assert_eq!(table.len(), 256);
            assert_eq!(table[0], 8);
            // the table attribute value is exactly 256 * 4 bytes
            assert_eq!(options[1].value_len(), 1024);
        }
        other => panic!("unexpected option {other:?}"),
    }
}

#[test]
fn peak_rate_adds_a_peak_table() {
    let mut qopt = parms();
    qopt.peak.rate = 2_000_000;
    let options = TcQdiscTbf::build_options(qopt, &identity_clock());
    assert_eq!(options.len(), 3);
    assert!(matches!(&options[2], TcQdiscTbfOption::Ptab(table)
        if table.len() == 256));
}

#[test]
fn tbf_message_round_trip() {
    let options = TcQdiscTbf::build_options(parms(), &identity_clock());
    let mut msg = TcMessage::with_index(4);
    msg.attributes
        .push(TcAttribute::Kind("tbf".to_string()));
    msg.attributes
        .push(TcAttribute::Options(TcOptions::Tbf(options)));

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

#[test]
fn every_attribute_is_word_aligned() {
    let options = TcQdiscTbf::build_options(parms(), &identity_clock());
    let msg = TcMessage::from_parts(
        Default::default(),
        vec![
            TcAttribute::Kind("tbf".to_string()),
            TcAttribute::Options(TcOptions::Tbf(options)),
        ],
    );
    let mut emitted = vec![0; msg.buffer_len()];
    msg.emit(&mut emitted);

    // walk the top-level attributes and check their offsets
    let mut offset = 20;
    while offset < emitted.len() {
        assert_eq!(offset % 4, 0);
        let length =
            u16::from_ne_bytes([emitted[offset], emitted[offset + 1]]) as usize;
        assert!(length >= 4);
        offset += (length + 3) & !3;
    }
    assert_eq!(offset, emitted.len());
}
