// SPDX-License-Identifier: MIT

use netlink_packet_utils::traits::{Emitable, Parseable};

use crate::tc::{
    TcAttribute, TcMessage, TcMessageBuffer, TcOptions, TcQdiscPfifoFast,
    TcStats,
};

#[test]
fn pfifo_fast_options_round_trip() {
    let mut msg = TcMessage::with_index(1);
    msg.attributes
        .push(TcAttribute::Kind("pfifo_fast".to_string()));
    msg.attributes.push(TcAttribute::Options(
        TcOptions::PfifoFast(TcQdiscPfifoFast::default()),
    ));
    msg.attributes.push(TcAttribute::Stats(TcStats {
        bytes: 1 << 33,
        packets: 1234,
        drops: 1,
        ..Default::default()
    }));

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
