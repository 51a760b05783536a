use std::mem;

use nix::libc::c_int;

use crate::hcioctl::{Operation, TransferMethod};

pub const HC_IOC_MAGIC: u8 = b'H';

/// Argument of every HC62 ioctl: the encoded request and the reply buffer.
/// The driver returns the number of reply bytes it produced.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct HcIoctlBuffer {
    pub in_ptr: u64,
    pub in_len: u32,
    pub out_len: u32,
    pub out_ptr: u64,
}

impl HcIoctlBuffer {
    pub fn new(input: &[u8], output: &mut [u8]) -> Self {
        HcIoctlBuffer {
            in_ptr: input.as_ptr() as u64,
            in_len: input.len() as u32,
            out_len: output.len() as u32,
            out_ptr: output.as_mut_ptr() as u64,
        }
    }
}

/// Request number within [`HC_IOC_MAGIC`].
pub const fn nr(op: Operation) -> u8 {
    (op.function() - 0x800) as u8
}

/// `_IOWR(HC_IOC_MAGIC, nr, HcIoctlBuffer)` for `op`.
pub fn request_code(op: Operation) -> u32 {
    request_code_readwrite!(HC_IOC_MAGIC, nr(op), mem::size_of::<HcIoctlBuffer>()) as u32
}

ioctl_readwrite!(prog_fpga, HC_IOC_MAGIC, 0, HcIoctlBuffer);
ioctl_readwrite!(prog_init, HC_IOC_MAGIC, 1, HcIoctlBuffer);
ioctl_readwrite!(prog_end, HC_IOC_MAGIC, 2, HcIoctlBuffer);
ioctl_readwrite!(write, HC_IOC_MAGIC, 3, HcIoctlBuffer);
ioctl_readwrite!(read, HC_IOC_MAGIC, 4, HcIoctlBuffer);
ioctl_readwrite!(block_write, HC_IOC_MAGIC, 5, HcIoctlBuffer);
ioctl_readwrite!(block_read, HC_IOC_MAGIC, 6, HcIoctlBuffer);
ioctl_readwrite!(chip_select, HC_IOC_MAGIC, 7, HcIoctlBuffer);

/// Issues the ioctl matching `op` on `fd`.
///
/// # Safety
///
/// The pointers in `buffer` must stay valid for the duration of the call.
pub unsafe fn control(fd: c_int, op: Operation, buffer: &mut HcIoctlBuffer) -> nix::Result<c_int> {
    let func: unsafe fn(c_int, *mut HcIoctlBuffer) -> nix::Result<c_int> = match op {
        Operation::ProgramFpga => prog_fpga,
        Operation::ProgramInit => prog_init,
        Operation::ProgramEnd => prog_end,
        Operation::Write => write,
        Operation::Read => read,
        Operation::BlockWrite => block_write,
        Operation::BlockRead => block_read,
        Operation::ChipSelect => chip_select,
    };
    func(fd, buffer as *mut HcIoctlBuffer)
}

// Control code scheme of the original driver platform.
pub const FILE_DEVICE_UNKNOWN: u32 = 0x22;
pub const METHOD_BUFFERED: u32 = 0;
pub const METHOD_IN_DIRECT: u32 = 1;
pub const METHOD_OUT_DIRECT: u32 = 2;
pub const FILE_ANY_ACCESS: u32 = 0;

pub const fn ctl_code(device_type: u32, function: u32, method: u32, access: u32) -> u32 {
    (device_type << 16) | (access << 14) | (function << 2) | method
}

/// The `CTL_CODE` value the original driver expects for `op`.
pub const fn windows_control_code(op: Operation) -> u32 {
    let method = match op.method() {
        TransferMethod::Buffered => METHOD_BUFFERED,
        TransferMethod::InDirect => METHOD_IN_DIRECT,
        TransferMethod::OutDirect => METHOD_OUT_DIRECT,
    };
    ctl_code(FILE_DEVICE_UNKNOWN, op.function(), method, FILE_ANY_ACCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_codes() {
        assert_eq!(windows_control_code(Operation::ProgramFpga), 0x0022_2000);
        assert_eq!(windows_control_code(Operation::ProgramInit), 0x0022_2004);
        assert_eq!(windows_control_code(Operation::ProgramEnd), 0x0022_2008);
        assert_eq!(windows_control_code(Operation::Write), 0x0022_200c);
        assert_eq!(windows_control_code(Operation::Read), 0x0022_2010);
        assert_eq!(windows_control_code(Operation::BlockWrite), 0x0022_2016);
        assert_eq!(windows_control_code(Operation::BlockRead), 0x0022_2019);
        assert_eq!(windows_control_code(Operation::ChipSelect), 0x0022_201c);
    }

    #[test]
    fn linux_codes_are_distinct() {
        let mut codes: Vec<u32> = Operation::ALL.iter().map(|&op| request_code(op)).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Operation::ALL.len());
        for op in Operation::ALL.iter() {
            assert_eq!(request_code(*op) & 0xff, nr(*op) as u32);
            assert_eq!((request_code(*op) >> 8) & 0xff, HC_IOC_MAGIC as u32);
        }
    }

    #[test]
    fn buffer_points_at_payloads() {
        let input = [1u8, 0, 5, 0];
        let mut output = [0u8; 4];
        let buffer = HcIoctlBuffer::new(&input, &mut output);
        assert_eq!(buffer.in_len, 4);
        assert_eq!(buffer.out_len, 4);
        assert_eq!(buffer.in_ptr, input.as_ptr() as u64);
        assert_eq!(mem::size_of::<HcIoctlBuffer>(), 24);
    }
}
