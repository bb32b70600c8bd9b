// SPDX-License-Identifier: MIT

mod bond;
mod bridge;
mod info_data;
mod infos;
mod tuntap;
mod veth;
mod vlan;

pub(crate) use self::infos::VecLinkInfo;
pub use self::{
    bond::{BondAdInfo, InfoBond},
    bridge::InfoBridge,
    info_data::InfoData,
    infos::{InfoKind, LinkInfo},
    tuntap::{InfoTunTap, TunTapIfr},
    veth::InfoVeth,
    vlan::InfoVlan,
};
