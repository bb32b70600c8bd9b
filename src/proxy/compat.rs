// SPDX-License-Identifier: MIT

//! sysfs and external-tool backends for kernels that do not manage
//! bridges and bonds over netlink.

use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use super::{Host, ProxyError};
use crate::link::InfoKind;

/// Settle time after an emulated create/delete: the device must be
/// visible (or gone) in sysfs by the time the verdict reaches the
/// caller.
pub(crate) const ANCIENT_BARRIER: Duration = Duration::from_millis(300);

const BONDING_MASTERS: &str = "/sys/class/net/bonding_masters";

fn class_net(name: &str, tail: &str) -> PathBuf {
    PathBuf::from(format!("/sys/class/net/{name}/{tail}"))
}

fn run_checked(
    host: &dyn Host,
    program: &str,
    args: &[&str],
) -> Result<(), ProxyError> {
    debug!("running {program} {args:?}");
    let code = host.run(program, args)?;
    if code != 0 {
        return Err(ProxyError::Command {
            program: program.to_string(),
            code,
        });
    }
    Ok(())
}

pub(crate) fn create_bridge(
    host: &dyn Host,
    name: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "brctl", &["addbr", name])
}

pub(crate) fn create_bond(
    host: &dyn Host,
    name: &str,
) -> Result<(), ProxyError> {
    host.write(BONDING_MASTERS.as_ref(), &format!("+{name}"))?;
    Ok(())
}

pub(crate) fn del_bridge(
    host: &dyn Host,
    name: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "ip", &["link", "set", "dev", name, "down"])?;
    run_checked(host, "brctl", &["delbr", name])
}

pub(crate) fn del_bond(host: &dyn Host, name: &str) -> Result<(), ProxyError> {
    run_checked(host, "ip", &["link", "set", "dev", name, "down"])?;
    host.write(BONDING_MASTERS.as_ref(), &format!("-{name}"))?;
    Ok(())
}

pub(crate) fn add_bridge_port(
    host: &dyn Host,
    master: &str,
    port: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "brctl", &["addif", master, port])
}

pub(crate) fn del_bridge_port(
    host: &dyn Host,
    master: &str,
    port: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "brctl", &["delif", master, port])
}

pub(crate) fn add_bond_port(
    host: &dyn Host,
    master: &str,
    port: &str,
) -> Result<(), ProxyError> {
    host.write(&class_net(master, "bonding/slaves"), &format!("+{port}"))?;
    Ok(())
}

pub(crate) fn del_bond_port(
    host: &dyn Host,
    master: &str,
    port: &str,
) -> Result<(), ProxyError> {
    host.write(&class_net(master, "bonding/slaves"), &format!("-{port}"))?;
    Ok(())
}

pub(crate) fn add_ovs_bridge(
    host: &dyn Host,
    name: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "ovs-vsctl", &["add-br", name])
}

pub(crate) fn del_ovs_bridge(
    host: &dyn Host,
    name: &str,
) -> Result<(), ProxyError> {
    run_checked(host, "ovs-vsctl", &["del-br", name])
}

/// Writes one bond attribute; returns the error code instead of failing
/// so set-link can accumulate across all attributes.
pub(crate) fn set_bond(
    host: &dyn Host,
    name: &str,
    attribute: &str,
    value: &str,
) -> i32 {
    write_code(host, class_net(name, &format!("bonding/{attribute}")), value)
}

pub(crate) fn set_bridge(
    host: &dyn Host,
    name: &str,
    attribute: &str,
    value: &str,
) -> i32 {
    write_code(host, class_net(name, &format!("bridge/{attribute}")), value)
}

fn write_code(host: &dyn Host, path: PathBuf, value: &str) -> i32 {
    match host.write(&path, value) {
        Ok(()) => 0,
        Err(error) => error.raw_os_error().unwrap_or(libc::EIO),
    }
}

/// Index of the interface's master, read from sysfs. Bridge ports record
/// it under `brport/bridge/ifindex`, bond slaves under `master/ifindex`.
pub(crate) fn get_master(host: &dyn Host, name: &str) -> Option<i32> {
    for tail in ["brport/bridge/ifindex", "master/ifindex"] {
        if let Ok(text) = host.read_to_string(&class_net(name, tail)) {
            if let Ok(index) = text.trim().parse() {
                return Some(index);
            }
        }
    }
    None
}

/// Kind of a master device, probed through the sysfs files only that
/// kind has.
pub(crate) fn master_kind(host: &dyn Host, name: &str) -> Option<InfoKind> {
    if host
        .read_to_string(&class_net(name, "bridge/stp_state"))
        .is_ok()
    {
        return Some(InfoKind::Bridge);
    }
    if host
        .read_to_string(&class_net(name, "bonding/mode"))
        .is_ok()
    {
        return Some(InfoKind::Bond);
    }
    None
}

/// Kind of an interface judged by its sysfs directory layout. RTNL on
/// the kernels this path serves does not report a kind, so the presence
/// of a `bonding` or `bridge` subdirectory is the only signal.
pub(crate) fn interface_kind(host: &dyn Host, name: &str) -> Option<InfoKind> {
    let entries = host
        .read_dir(&PathBuf::from(format!("/sys/class/net/{name}")))
        .ok()?;
    if entries.iter().any(|entry| entry == "bonding") {
        Some(InfoKind::Bond)
    } else if entries.iter().any(|entry| entry == "bridge") {
        Some(InfoKind::Bridge)
    } else {
        None
    }
}

/// Reads `/sys/class/net/<name>/{bonding,bridge}/<attribute>` as an
/// integer. The bond `mode` file holds the mode name followed by its
/// number, so the second token is the value there.
pub(crate) fn read_sysfs_attribute(
    host: &dyn Host,
    name: &str,
    kind: &InfoKind,
    attribute: &str,
) -> Option<i64> {
    let tail = match kind {
        InfoKind::Bond => format!("bonding/{attribute}"),
        InfoKind::Bridge => format!("bridge/{attribute}"),
        _ => return None,
    };
    let text = host.read_to_string(&class_net(name, &tail)).ok()?;
    let token = if matches!(kind, InfoKind::Bond) && attribute == "mode" {
        text.split_whitespace().nth(1)?
    } else {
        text.trim()
    };
    token.parse().ok()
}
