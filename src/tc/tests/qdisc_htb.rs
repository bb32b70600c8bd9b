// SPDX-License-Identifier: MIT

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::tc::psched::PschedClock;
use crate::tc::rtab::TcRateSpec;
use crate::tc::{
    TcAttribute, TcHtbGlob, TcHtbOpt, TcHtbXstats, TcMessage,
    TcMessageBuffer, TcOptions, TcQdiscHtb, TcQdiscHtbOption, TcXstats,
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
fn htb_init_defaults() {
    let options = TcQdiscHtb::build_init_options(TcHtbGlob::default());
    assert_eq!(
        options,
        vec![TcQdiscHtbOption::Init(TcHtbGlob {
            version: 3,
            rate2quantum: 0xa,
            defcls: 0x10,
            debug: 0,
            direct_pkts: 0,
        })]
    );
}

#[test]
fn htb_class_gets_rate_and_ceil_tables() {
    let clock = PschedClock::new(1, 1, 1_000_000);
    let parms = TcHtbOpt {
        rate: TcRateSpec {
            rate: 1_000_000,
            ..Default::default()
        },
        ceil: TcRateSpec {
            rate: 2_000_000,
            ..Default::default()
        },
        buffer: 1000,
        cbuffer: 2000,
        ..Default::default()
    };
    let options = TcQdiscHtb::build_class_options(parms, &clock);
    assert_eq!(options.len(), 3);
    match &options[0] {
        TcQdiscHtbOption::Parms(built) => {
            // mtu defaults to 1600: 1600 >> 3 = 200 fits a table index
            assert_eq!(built.rate.cell_log, 3);
            assert_eq!(built.ceil.cell_log, 3);
            assert_eq!(built.rate.cell_align, -1);
        }
        other => panic!("unexpected option {other:?}"),
    }
    assert!(matches!(&options[1], TcQdiscHtbOption::Rtab(t) if t.len() == 256));
    assert!(matches!(&options[2], TcQdiscHtbOption::Ctab(t) if t.len() == 256));
}

#[test]
fn htb_message_round_trip() {
    let clock = PschedClock::new(1, 1, 1_000_000);
    let options = TcQdiscHtb::build_class_options(
        TcHtbOpt {
            rate: TcRateSpec {
                rate: 125_000,
                ..Default::default()
            },
            ..Default::default()
        },
        &clock,
    );
    let mut msg = TcMessage::with_index(3);
    msg.attributes
        .push(TcAttribute::Kind("htb".to_string()));
    msg.attributes
        .push(TcAttribute::Options(TcOptions::Htb(options)));
    msg.attributes
        .push(TcAttribute::Xstats(TcXstats::Htb(TcHtbXstats {
            lends: 1,
            borrows: 2,
            giants: 0,
            tokens: 1000,
            ctokens: 2000,
        })));
    assert_eq!(round_trip(&msg), msg);
}

#[test]
fn xstats_for_unknown_kind_stay_opaque() {
    let mut msg = TcMessage::with_index(3);
    msg.attributes
        .push(TcAttribute::Kind("codel".to_string()));
    msg.attributes
        .push(TcAttribute::Xstats(TcXstats::Other(vec![1, 2, 3, 4])));
    assert_eq!(round_trip(&msg), msg);
}
