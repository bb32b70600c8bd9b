// SPDX-License-Identifier: MIT

use log::debug;
use netlink_packet_core::{NetlinkBuffer, NetlinkMessage, NetlinkPayload};

use super::{compat, Host, LinkLookup, ProxyError, TunTapSetup, Verdict};
use crate::link::{
    InfoBond, InfoBridge, InfoData, InfoKind, LinkAttribute, LinkInfo,
    LinkMessage,
};
use crate::RouteNetlinkMessage;

const OVS_KINDS: [&str; 2] = ["ovs-bridge", "openvswitch"];

fn is_ovs_kind(kind: &InfoKind) -> bool {
    match kind {
        InfoKind::Other(s) => OVS_KINDS.contains(&s.as_str()),
        _ => false,
    }
}

fn decode_link(data: &[u8]) -> Result<LinkMessage, ProxyError> {
    let message = NetlinkMessage::<RouteNetlinkMessage>::deserialize(data)?;
    use self::RouteNetlinkMessage::*;
    match message.payload {
        NetlinkPayload::InnerMessage(
            NewLink(msg) | DelLink(msg) | GetLink(msg) | SetLink(msg),
        ) => Ok(msg),
        _ => Err(ProxyError::Decode("expected a link message".into())),
    }
}

/// Policy layer over the link codec.
///
/// Requests and dump responses pass through here before the transport
/// touches the kernel. `ancient` marks kernels that cannot manage
/// bridges and bonds over netlink, routing those operations through the
/// sysfs/brctl backends instead.
///
/// Invocations are serialized by the transport; every side effect has
/// completed by the time a verdict is returned.
#[derive(Debug)]
pub struct RtnlProxy<H> {
    host: H,
    ancient: bool,
}

impl<H: Host> RtnlProxy<H> {
    pub fn new(host: H, ancient: bool) -> Self {
        Self { host, ancient }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Rewrites a dump response (a concatenation of netlink packets),
    /// filling in the master, kind and device data the kernel left out.
    pub fn link_dump(&self, data: &[u8]) -> Result<Verdict, ProxyError> {
        let mut offset = 0;
        let mut inbox = Vec::new();
        while offset < data.len() {
            let buf = NetlinkBuffer::new_checked(&data[offset..])?;
            let length = buf.length() as usize;
            let message = NetlinkMessage::<RouteNetlinkMessage>::deserialize(
                &data[offset..offset + length],
            )?;
            inbox.push(message);
            offset += length;
        }

        let mut out = Vec::with_capacity(data.len());
        for mut message in inbox {
            if let NetlinkPayload::InnerMessage(
                RouteNetlinkMessage::NewLink(link),
            ) = &mut message.payload
            {
                self.enrich(link);
            }
            message.finalize();
            let start = out.len();
            out.resize(start + message.buffer_len(), 0);
            message.serialize(&mut out[start..]);
        }
        Ok(Verdict::Forward(out))
    }

    /// `RTM_NEWLINK`: intercepts the kinds the kernel cannot create.
    pub fn new_link(&self, data: &[u8]) -> Result<Verdict, ProxyError> {
        let link = decode_link(data)?;
        let kind = match link.info_kind() {
            Some(kind) => kind.clone(),
            None => return Ok(Verdict::Forward(data.to_vec())),
        };

        if kind == InfoKind::Tuntap {
            let setup = TunTapSetup::from_link_message(&link)?;
            self.host.create_tuntap(&setup)?;
            return Ok(Verdict::Handled);
        }
        if is_ovs_kind(&kind) {
            let name = required_name(&link)?;
            compat::add_ovs_bridge(&self.host, name)?;
            return Ok(Verdict::Handled);
        }
        if self.ancient && matches!(kind, InfoKind::Bridge | InfoKind::Bond) {
            let name = required_name(&link)?;
            match kind {
                InfoKind::Bridge => compat::create_bridge(&self.host, name)?,
                _ => compat::create_bond(&self.host, name)?,
            }
            // RTM_NEWLINK notifications are not intercepted, so give the
            // device time to show up in sysfs.
            self.host.sleep(compat::ANCIENT_BARRIER);
            return Ok(Verdict::Handled);
        }
        Ok(Verdict::Forward(data.to_vec()))
    }

    /// `RTM_DELLINK`: the request only carries the index, so the full
    /// record is re-fetched through the transport to learn the kind.
    pub fn del_link(
        &self,
        lookup: &mut dyn LinkLookup,
        data: &[u8],
    ) -> Result<Verdict, ProxyError> {
        let request = decode_link(data)?;
        let link = lookup.link_by_index(request.header.index)?;
        let kind = match link.info_kind() {
            Some(kind) => kind.clone(),
            None => return Ok(Verdict::Forward(data.to_vec())),
        };

        if is_ovs_kind(&kind) {
            let name = required_name(&link)?;
            compat::del_ovs_bridge(&self.host, name)?;
            return Ok(Verdict::Handled);
        }
        if self.ancient && matches!(kind, InfoKind::Bridge | InfoKind::Bond) {
            let name = required_name(&link)?;
            match kind {
                InfoKind::Bridge => compat::del_bridge(&self.host, name)?,
                _ => compat::del_bond(&self.host, name)?,
            }
            self.host.sleep(compat::ANCIENT_BARRIER);
            return Ok(Verdict::Handled);
        }
        Ok(Verdict::Forward(data.to_vec()))
    }

    /// `RTM_SETLINK`: device data writes go through sysfs, and in
    /// ancient mode a master change becomes a port attach or detach.
    pub fn set_link(
        &self,
        lookup: &mut dyn LinkLookup,
        data: &[u8],
    ) -> Result<Verdict, ProxyError> {
        let link = decode_link(data)?;

        if let Some(data_attrs) = link.info_data() {
            let mut code = 0;
            match data_attrs {
                InfoData::Bond(attrs) => {
                    let name = required_name(&link)?;
                    for attribute in attrs {
                        if let Some((file, value)) = attribute.sysfs_entry() {
                            let rc = compat::set_bond(
                                &self.host, name, file, &value,
                            );
                            if rc != 0 {
                                code = rc;
                            }
                        }
                    }
                }
                InfoData::Bridge(attrs) => {
                    let name = required_name(&link)?;
                    for attribute in attrs {
                        if let Some((file, value)) = attribute.sysfs_entry() {
                            let rc = compat::set_bridge(
                                &self.host, name, file, &value,
                            );
                            if rc != 0 {
                                code = rc;
                            }
                        }
                    }
                }
                _ => {}
            }
            if code != 0 {
                return Err(ProxyError::Sysfs(code));
            }
        }

        let master = match link.master() {
            Some(master) if self.ancient => master,
            _ => return Ok(Verdict::Forward(data.to_vec())),
        };
        let port = name_by_index(lookup, link.header.index)?;
        if master == 0 {
            // port delete: find the current master and its kind first
            let master_index = compat::get_master(&self.host, &port)
                .ok_or_else(|| ProxyError::NoMaster(port.clone()))?;
            let master_name = name_by_index(lookup, master_index)?;
            match compat::master_kind(&self.host, &master_name) {
                Some(InfoKind::Bridge) => {
                    compat::del_bridge_port(&self.host, &master_name, &port)?
                }
                Some(InfoKind::Bond) => {
                    compat::del_bond_port(&self.host, &master_name, &port)?
                }
                _ => debug!("unknown master kind for {master_name}"),
            }
        } else {
            let master_name = name_by_index(lookup, master as i32)?;
            match compat::master_kind(&self.host, &master_name) {
                Some(InfoKind::Bridge) => {
                    compat::add_bridge_port(&self.host, &master_name, &port)?
                }
                Some(InfoKind::Bond) => {
                    compat::add_bond_port(&self.host, &master_name, &port)?
                }
                _ => debug!("unknown master kind for {master_name}"),
            }
        }
        Ok(Verdict::Handled)
    }

    /// Fills in what the kernel left out of one dump record.
    fn enrich(&self, link: &mut LinkMessage) {
        let ifname = match link.if_name() {
            Some(name) => name.to_string(),
            None => return,
        };

        if self.ancient && link.master().is_none() {
            if let Some(master) = compat::get_master(&self.host, &ifname) {
                link.attributes.push(LinkAttribute::Master(master as u32));
            }
        }

        let mut kind = link.info_kind().cloned();
        if kind.is_none() {
            kind = compat::interface_kind(&self.host, &ifname);
            if let Some(kind) = &kind {
                match link.link_info_mut() {
                    Some(infos) => infos.push(LinkInfo::Kind(kind.clone())),
                    None => link.attributes.push(LinkAttribute::LinkInfo(
                        vec![LinkInfo::Kind(kind.clone())],
                    )),
                }
            }
        }

        let kind = match kind {
            Some(kind) => kind,
            None => return,
        };
        if !matches!(kind, InfoKind::Bond | InfoKind::Bridge) {
            return;
        }
        if link.info_data().is_some() {
            return;
        }

        let data = match kind {
            InfoKind::Bond => {
                let mut attrs = Vec::new();
                for file in InfoBond::SYSFS_NAMES {
                    if let Some(value) = compat::read_sysfs_attribute(
                        &self.host, &ifname, &kind, file,
                    ) {
                        if let Some(attr) = InfoBond::from_sysfs(file, value) {
                            attrs.push(attr);
                        }
                    }
                }
                if attrs.is_empty() {
                    return;
                }
                InfoData::Bond(attrs)
            }
            _ => {
                let mut attrs = Vec::new();
                for file in InfoBridge::SYSFS_NAMES {
                    if let Some(value) = compat::read_sysfs_attribute(
                        &self.host, &ifname, &kind, file,
                    ) {
                        if let Some(attr) =
                            InfoBridge::from_sysfs(file, value)
                        {
                            attrs.push(attr);
                        }
                    }
                }
                if attrs.is_empty() {
                    return;
                }
                InfoData::Bridge(attrs)
            }
        };
        if let Some(infos) = link.link_info_mut() {
            infos.push(LinkInfo::Data(data));
        }
    }
}

fn required_name(link: &LinkMessage) -> Result<&str, ProxyError> {
    link.if_name()
        .ok_or(ProxyError::MissingAttribute("IFLA_IFNAME"))
}

fn name_by_index(
    lookup: &mut dyn LinkLookup,
    index: i32,
) -> Result<String, ProxyError> {
    let link = lookup.link_by_index(index)?;
    link.if_name()
        .map(str::to_string)
        .ok_or(ProxyError::MissingAttribute("IFLA_IFNAME"))
}
