// SPDX-License-Identifier: MIT

//! The `rtnl-compat` crate abstracts the rtnetlink link and traffic-control
//! packet families into Rust data types, and layers a compatibility proxy on
//! top of the codec for kernels that cannot service link management over
//! netlink.
//!
//! This crate is grouped into these modules:
//!  * `link`: NIC interface messages, similar to the `ip link` command.
//!  * `tc`: traffic control messages, similar to the `tc` command.
//!  * `proxy`: interception of link operations, emulating them through
//!    sysfs, ioctl and external tools where required.
//!
//! The datagram transport itself is out of scope: the proxy consumes raw
//! netlink payloads and answers with a forward-or-handled verdict.

pub mod link;
pub mod proxy;
pub mod tc;

mod family;
mod message;

pub use self::family::AddressFamily;
pub use self::message::{RouteNetlinkMessage, RouteNetlinkMessageBuffer};

#[macro_use]
extern crate netlink_packet_utils;

#[macro_use]
extern crate lazy_static;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
