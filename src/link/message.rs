// SPDX-License-Identifier: MIT

use std::io;

use anyhow::Context;
use netlink_packet_utils::{
    traits::{Emitable, Parseable},
    DecodeError,
};

use super::netns::NetnsFd;
use super::{
    InfoData, InfoKind, LinkAttribute, LinkHeader, LinkInfo,
    LinkMessageBuffer, NetNs,
};

#[derive(Debug, PartialEq, Eq, Clone, Default)]
#[non_exhaustive]
pub struct LinkMessage {
    pub header: LinkHeader,
    pub attributes: Vec<LinkAttribute>,
}

impl LinkMessage {
    /// Serializes the message, resolving named network-namespace
    /// references on the way.
    ///
    /// Each `IFLA_NET_NS_FD` attribute holding a name opens
    /// `/var/run/netns/<name>` read-only; the emitted attribute carries
    /// the descriptor number and the descriptor is closed again when this
    /// function returns, on success and on failure alike.
    pub fn encode(&self) -> Result<Vec<u8>, io::Error> {
        let mut message = self.clone();
        let mut namespaces = Vec::new();
        for attribute in &mut message.attributes {
            if let LinkAttribute::NetNsFd(NetNs::Name(name)) = attribute {
                let netns = NetnsFd::open(name)?;
                *attribute =
                    LinkAttribute::NetNsFd(NetNs::Fd(netns.as_raw_fd()));
                namespaces.push(netns);
            }
        }
        let mut buffer = vec![0; message.buffer_len()];
        message.emit(&mut buffer);
        drop(namespaces);
        Ok(buffer)
    }

    /// Value of the `IFLA_IFNAME` attribute, if present.
    pub fn if_name(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attribute| match attribute {
            LinkAttribute::IfName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Value of the `IFLA_MASTER` attribute, if present.
    pub fn master(&self) -> Option<u32> {
        self.attributes.iter().find_map(|attribute| match attribute {
            LinkAttribute::Master(index) => Some(*index),
            _ => None,
        })
    }

    /// The `IFLA_LINKINFO` container, if present.
    pub fn link_info(&self) -> Option<&[LinkInfo]> {
        self.attributes.iter().find_map(|attribute| match attribute {
            LinkAttribute::LinkInfo(infos) => Some(infos.as_slice()),
            _ => None,
        })
    }

    pub fn link_info_mut(&mut self) -> Option<&mut Vec<LinkInfo>> {
        self.attributes.iter_mut().find_map(|attribute| {
            match attribute {
                LinkAttribute::LinkInfo(infos) => Some(infos),
                _ => None,
            }
        })
    }

    /// The `IFLA_INFO_KIND` of the link-info container, if present.
    pub fn info_kind(&self) -> Option<&InfoKind> {
        self.link_info()?.iter().find_map(|info| match info {
            LinkInfo::Kind(kind) => Some(kind),
            _ => None,
        })
    }

    /// The `IFLA_INFO_DATA` of the link-info container, if present.
    pub fn info_data(&self) -> Option<&InfoData> {
        self.link_info()?.iter().find_map(|info| match info {
            LinkInfo::Data(data) => Some(data),
            _ => None,
        })
    }
}

impl Emitable for LinkMessage {
    fn buffer_len(&self) -> usize {
        self.header.buffer_len() + self.attributes.as_slice().buffer_len()
    }

    fn emit(&self, buffer: &mut [u8]) {
        self.header.emit(buffer);
        self.attributes
            .as_slice()
            .emit(&mut buffer[self.header.buffer_len()..]);
    }
}

impl<'a, T: AsRef<[u8]> + 'a> Parseable<LinkMessageBuffer<&'a T>>
    for LinkMessage
{
    fn parse(buf: &LinkMessageBuffer<&'a T>) -> Result<Self, DecodeError> {
        let header = LinkHeader::parse(buf)
            .context("failed to parse link message header")?;
        let attributes = Vec::<LinkAttribute>::parse(buf)
            .context("failed to parse link message NLAs")?;
        Ok(LinkMessage { header, attributes })
    }
}

impl<'a, T: AsRef<[u8]> + 'a> Parseable<LinkMessageBuffer<&'a T>>
    for Vec<LinkAttribute>
{
    fn parse(buf: &LinkMessageBuffer<&'a T>) -> Result<Self, DecodeError> {
        let mut attributes = vec![];
        for nla_buf in buf.attributes() {
            attributes.push(LinkAttribute::parse(&nla_buf?)?);
        }
        Ok(attributes)
    }
}
