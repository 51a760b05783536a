use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;

use log::{debug, trace};
use nix::errno::Errno;

use crate::error::{HcError, Result};
use crate::hcioctl::{self, Operation};
use crate::ioctl::{self, HcIoctlBuffer};
use crate::transport::Transport;

/// Device is an open file handle to the HC62 driver.
pub struct Device {
    path: String,
    handle: Option<File>,
}

impl Device {
    /// The first board, see [`hcioctl::FIRST_DEVICE_INDEX`].
    pub fn new() -> Self {
        Device::new_at(&hcioctl::device_path(hcioctl::FIRST_DEVICE_INDEX))
    }

    pub fn new_at(path: &str) -> Self {
        Device {
            path: path.to_owned(),
            handle: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Opens the driver. Does nothing when already open.
    pub fn open(&mut self) -> io::Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }
        let file = OpenOptions::new().read(true).write(true).open(&self.path)?;
        debug!("opened {}", self.path);
        self.handle = Some(file);
        Ok(())
    }

    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!("closed {}", self.path);
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Device::new()
    }
}

impl Transport for Device {
    fn control(&mut self, op: Operation, input: &[u8], output: &mut [u8]) -> Result<usize> {
        let f = self
            .handle
            .as_ref()
            .ok_or_else(|| HcError::transport(op, Errno::ENODEV))?;
        let mut buffer = HcIoctlBuffer::new(input, output);
        trace!(
            "ioctl {:#010x} ({}) in {} out {}",
            ioctl::request_code(op),
            op,
            buffer.in_len,
            buffer.out_len
        );
        let res = unsafe { ioctl::control(f.as_raw_fd(), op, &mut buffer) }
            .map_err(|errno| HcError::transport(op, errno))?;
        Ok((res.max(0) as usize).min(output.len()))
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.close();
    }
}
