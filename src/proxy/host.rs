// SPDX-License-Identifier: MIT

use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use super::tuntap::{self, TunTapSetup};
use super::ProxyError;

/// Host access used by the proxy backends.
///
/// Whether an operation ends up as a subprocess, a sysfs write or an
/// ioctl is a property of the implementation; the policy code never
/// branches on it. Tests substitute a recording double.
pub trait Host {
    /// Runs an external tool with stdio connected to a null sink and
    /// returns its exit code.
    fn run(&self, program: &str, args: &[&str]) -> io::Result<i32>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, data: &str) -> io::Result<()>;

    /// Names of the entries of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>>;

    fn sleep(&self, duration: Duration);

    fn create_tuntap(&self, setup: &TunTapSetup) -> Result<(), ProxyError>;
}

/// The real host.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsHost;

impl Host for OsHost {
    fn run(&self, program: &str, args: &[&str]) -> io::Result<i32> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status.code().unwrap_or(-1))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, data: &str) -> io::Result<()> {
        fs::write(path, data)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }

    fn create_tuntap(&self, setup: &TunTapSetup) -> Result<(), ProxyError> {
        tuntap::create(setup)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::super::tuntap::TunTapSetup;
    use super::super::ProxyError;
    use super::Host;

    /// Test double: serves canned file and directory contents, records
    /// every side effect.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingHost {
        pub files: HashMap<PathBuf, String>,
        pub dirs: HashMap<PathBuf, Vec<String>>,
        /// Paths whose writes fail with the given error code.
        pub failing_writes: HashMap<PathBuf, i32>,
        pub commands: RefCell<Vec<String>>,
        pub writes: RefCell<Vec<(PathBuf, String)>>,
        pub tuntaps: RefCell<Vec<TunTapSetup>>,
        pub sleeps: RefCell<Vec<Duration>>,
    }

    impl RecordingHost {
        pub(crate) fn with_file(mut self, path: &str, data: &str) -> Self {
            self.files.insert(PathBuf::from(path), data.to_string());
            self
        }

        pub(crate) fn with_dir(mut self, path: &str, names: &[&str]) -> Self {
            self.dirs.insert(
                PathBuf::from(path),
                names.iter().map(|n| n.to_string()).collect(),
            );
            self
        }

        pub(crate) fn with_failing_write(
            mut self,
            path: &str,
            code: i32,
        ) -> Self {
            self.failing_writes.insert(PathBuf::from(path), code);
            self
        }

        pub(crate) fn commands(&self) -> Vec<String> {
            self.commands.borrow().clone()
        }

        pub(crate) fn writes(&self) -> Vec<(PathBuf, String)> {
            self.writes.borrow().clone()
        }
    }

    impl Host for RecordingHost {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<i32> {
            let mut line = vec![program.to_string()];
            line.extend(args.iter().map(|a| a.to_string()));
            self.commands.borrow_mut().push(line.join(" "));
            Ok(0)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.files.get(path).cloned().ok_or_else(|| {
                io::Error::from_raw_os_error(libc::ENOENT)
            })
        }

        fn write(&self, path: &Path, data: &str) -> io::Result<()> {
            if let Some(code) = self.failing_writes.get(path) {
                return Err(io::Error::from_raw_os_error(*code));
            }
            self.writes
                .borrow_mut()
                .push((path.to_path_buf(), data.to_string()));
            Ok(())
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<String>> {
            self.dirs.get(path).cloned().ok_or_else(|| {
                io::Error::from_raw_os_error(libc::ENOENT)
            })
        }

        fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
        }

        fn create_tuntap(
            &self,
            setup: &TunTapSetup,
        ) -> Result<(), ProxyError> {
            self.tuntaps.borrow_mut().push(setup.clone());
            Ok(())
        }
    }
}
