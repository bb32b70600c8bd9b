// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

const NETNS_RUN_DIR: &str = "/var/run/netns";

/// A network namespace reference carried by the `IFLA_NET_NS_FD`
/// attribute.
///
/// There are two ways to specify a namespace: an already-open file
/// descriptor, passed to the kernel as is, or the name of a file under
/// `/var/run/netns`. Named references are resolved by
/// [`LinkMessage::encode`](crate::link::LinkMessage::encode), which keeps
/// the descriptor open for the duration of the encode only.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum NetNs {
    Fd(RawFd),
    Name(String),
}

/// Scoped read-only descriptor for a named network namespace. The
/// descriptor is closed when the guard is dropped.
#[derive(Debug)]
pub struct NetnsFd(File);

impl NetnsFd {
    pub fn open(name: &str) -> io::Result<Self> {
        File::open(Path::new(NETNS_RUN_DIR).join(name)).map(Self)
    }

    pub fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
