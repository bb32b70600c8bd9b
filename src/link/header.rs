// SPDX-License-Identifier: MIT

use netlink_packet_utils::{
    nla::{NlaBuffer, NlasIterator},
    traits::{Emitable, Parseable},
    DecodeError,
};

use crate::link::LinkFlags;
use crate::AddressFamily;

const LINK_HEADER_LEN: usize = 16;

buffer!(LinkMessageBuffer(LINK_HEADER_LEN) {
    interface_family: (u8, 0),
    reserved_1: (u8, 1),
    device_type: (u16, 2..4),
    link_index: (i32, 4..8),
    flags: (u32, 8..12),
    change_mask: (u32, 12..LINK_HEADER_LEN),
    payload: (slice, LINK_HEADER_LEN..),
});

impl<'a, T: AsRef<[u8]> + ?Sized> LinkMessageBuffer<&'a T> {
    pub fn attributes(
        &self,
    ) -> impl Iterator<Item = Result<NlaBuffer<&'a [u8]>, DecodeError>> {
        NlasIterator::new(self.payload())
    }
}

/// High level representation of `RTM_GETLINK`, `RTM_SETLINK`, `RTM_NEWLINK`
/// and `RTM_DELLINK` message headers.
///
/// These headers have the following structure:
///
/// ```no_rust
/// 0                8                16              24               32
/// +----------------+----------------+----------------+----------------+
/// |interface family|    reserved    |           device type           |
/// +----------------+----------------+----------------+----------------+
/// |                             link index                            |
/// +----------------+----------------+----------------+----------------+
/// |                               flags                               |
/// +----------------+----------------+----------------+----------------+
/// |                            change mask                            |
/// +----------------+----------------+----------------+----------------+
/// ```
///
/// `LinkHeader` exposes all these fields except for the "reserved" one.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct LinkHeader {
    /// Address family: one of the `AF_*` constants.
    pub interface_family: AddressFamily,
    /// Link type, one of the `ARPHRD_*` constants.
    pub device_type: u16,
    /// Link index.
    pub index: i32,
    /// Device flags, either raw bits or a set of flag names (the latter
    /// only when building a request, see [LinkFlags]).
    pub flags: LinkFlags,
    /// Change mask for the `flags` field. Overridden by the resolved
    /// mask when `flags` is a named set.
    pub change_mask: u32,
}

impl Emitable for LinkHeader {
    fn buffer_len(&self) -> usize {
        LINK_HEADER_LEN
    }

    fn emit(&self, buffer: &mut [u8]) {
        let (flags, change_mask) = self.flags.resolve(self.change_mask);
        let mut packet = LinkMessageBuffer::new(buffer);
        packet.set_interface_family(self.interface_family.into());
        packet.set_device_type(self.device_type);
        packet.set_link_index(self.index);
        packet.set_flags(flags);
        packet.set_change_mask(change_mask);
    }
}

impl<T: AsRef<[u8]>> Parseable<LinkMessageBuffer<T>> for LinkHeader {
    fn parse(buf: &LinkMessageBuffer<T>) -> Result<Self, DecodeError> {
        Ok(Self {
            interface_family: buf.interface_family().into(),
            device_type: buf.device_type(),
            index: buf.link_index(),
            flags: LinkFlags::Value(buf.flags()),
            change_mask: buf.change_mask(),
        })
    }
}
