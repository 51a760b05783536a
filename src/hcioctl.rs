//! Data contract shared with the HC62 board driver.
//!
//! Every record is little-endian and packed in declaration order, the way the
//! driver reads its `WORD`/`ULONG` fields. The fixed buffers of the driver
//! structures are carried here as length-checked vectors, so the size caps are
//! enforced when a request is built instead of being implied by an array type.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{HcError, Result};

/// Maximum number of FPGA chips that can be on a board.
pub const MAX_CHIP_COUNT: usize = 10;

/// Capacity of the program buffer, in bytes.
pub const MAX_DATA_LENGTH: usize = 16384;

/// Capacity of a block transfer, in 32-bit words (16 KB).
pub const MAX_BLOCK_WORDS: usize = 4096;

/// Only the lower five bits of a scalar register address reach the chip.
pub const REGISTER_ADDRESS_MASK: u16 = 0x1f;

/// Name used by applications on the original platform. Append "1" for the first board.
pub const APP_SYMBOLIC_NAME: &str = r"\\.\HC62_";
/// Symbolic link created by the driver on the original platform. Append "1" for the first board.
pub const DRVR_SYMBOLIC_NAME: &str = r"\??\HC62_";
/// Internal device object name on the original platform. Append "0" for the first board.
pub const DRVR_INTERNAL_NAME: &str = r"\Device\HC62_";

/// Prefix of the character device nodes created by the driver.
pub const HC_DEVICE_PREFIX: &str = "/dev/hc62_";
/// Boards are numbered from one, like the application names above.
pub const FIRST_DEVICE_INDEX: u32 = 1;

/// Path of the device node for board `index`.
pub fn device_path(index: u32) -> String {
    format!("{}{}", HC_DEVICE_PREFIX, index)
}

/// How the driver maps the buffers of a control call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    Buffered,
    InDirect,
    OutDirect,
}

/// The operations understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ProgramFpga,
    ProgramInit,
    ProgramEnd,
    Write,
    Read,
    BlockWrite,
    BlockRead,
    ChipSelect,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::ProgramFpga,
        Operation::ProgramInit,
        Operation::ProgramEnd,
        Operation::Write,
        Operation::Read,
        Operation::BlockWrite,
        Operation::BlockRead,
        Operation::ChipSelect,
    ];

    /// Driver function number of the operation.
    pub const fn function(self) -> u32 {
        match self {
            Operation::ProgramFpga => 0x800,
            Operation::ProgramInit => 0x801,
            Operation::ProgramEnd => 0x802,
            Operation::Write => 0x803,
            Operation::Read => 0x804,
            Operation::BlockWrite => 0x805,
            Operation::BlockRead => 0x806,
            Operation::ChipSelect => 0x807,
        }
    }

    pub const fn method(self) -> TransferMethod {
        match self {
            Operation::BlockWrite => TransferMethod::OutDirect,
            Operation::BlockRead => TransferMethod::InDirect,
            _ => TransferMethod::Buffered,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::ProgramFpga => "program-fpga",
            Operation::ProgramInit => "program-init",
            Operation::ProgramEnd => "program-end",
            Operation::Write => "write",
            Operation::Read => "read",
            Operation::BlockWrite => "block-write",
            Operation::BlockRead => "block-read",
            Operation::ChipSelect => "chip-select",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask of the chips a request targets. Chip 0 is the LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChipSelect(u16);

impl ChipSelect {
    pub const SIZE: usize = 2;

    pub const NONE: ChipSelect = ChipSelect(0);
    pub const ALL: ChipSelect = ChipSelect((1 << MAX_CHIP_COUNT) - 1);

    /// Wraps a raw mask. Bits above the last chip on the board are refused.
    pub fn new(mask: u16) -> Result<Self> {
        if mask & !Self::ALL.0 != 0 {
            return Err(HcError::InvalidChipMask {
                mask,
                reason: "selects a chip beyond the board",
            });
        }
        Ok(ChipSelect(mask))
    }

    /// Selects a single chip.
    pub fn chip(index: usize) -> Result<Self> {
        if index >= MAX_CHIP_COUNT {
            return Err(HcError::InvalidChipMask {
                mask: 1u16.checked_shl(index as u32).unwrap_or(0),
                reason: "chip index out of range",
            });
        }
        Ok(ChipSelect(1 << index))
    }

    pub fn from_chips<I: IntoIterator<Item = usize>>(chips: I) -> Result<Self> {
        let mut mask = 0;
        for index in chips {
            mask |= ChipSelect::chip(index)?.0;
        }
        Ok(ChipSelect(mask))
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn contains(self, chip: usize) -> bool {
        chip < MAX_CHIP_COUNT && self.0 & (1 << chip) != 0
    }

    /// Indices of the selected chips, lowest first.
    pub fn chips(self) -> impl Iterator<Item = usize> {
        (0..MAX_CHIP_COUNT).filter(move |&chip| self.contains(chip))
    }

    /// The selected chip when exactly one is selected.
    pub fn single(self) -> Option<usize> {
        if self.count() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    pub(crate) fn require_any(self) -> Result<Self> {
        if self.is_empty() {
            return Err(HcError::InvalidChipMask {
                mask: self.0,
                reason: "no chip selected",
            });
        }
        Ok(self)
    }

    /// Reads are only defined for one chip at a time; the hardware result of a
    /// multi-chip read is unspecified, so such masks are refused.
    pub(crate) fn require_single(self) -> Result<Self> {
        match self.count() {
            1 => Ok(self),
            0 => Err(HcError::InvalidChipMask {
                mask: self.0,
                reason: "no chip selected",
            }),
            _ => Err(HcError::InvalidChipMask {
                mask: self.0,
                reason: "reads must select exactly one chip",
            }),
        }
    }

    pub fn encode(self) -> Vec<u8> {
        let mut buf = vec![0; Self::SIZE];
        LittleEndian::write_u16(&mut buf, self.0);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        expect_len("chip select", bytes, Self::SIZE)?;
        ChipSelect::new(LittleEndian::read_u16(bytes))?.require_any()
    }
}

impl fmt::Display for ChipSelect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#012b}", self.0)
    }
}

fn expect_len(what: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(HcError::Malformed {
            what,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

fn decode_header(what: &'static str, bytes: &[u8]) -> Result<(ChipSelect, u16)> {
    if bytes.len() < 4 {
        return Err(HcError::Malformed {
            what,
            expected: 4,
            actual: bytes.len(),
        });
    }
    let chip_select = ChipSelect::new(LittleEndian::read_u16(&bytes[0..2]))?;
    Ok((chip_select, LittleEndian::read_u16(&bytes[2..4])))
}

/// Bitstream data for the selected chips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRequest {
    chip_select: ChipSelect,
    data: Vec<u8>,
}

impl ProgramRequest {
    pub fn new(chip_select: ChipSelect, data: Vec<u8>) -> Result<Self> {
        if data.len() > MAX_DATA_LENGTH {
            return Err(HcError::PayloadTooLarge {
                len: data.len(),
                max: MAX_DATA_LENGTH,
                unit: "bytes",
            });
        }
        Ok(ProgramRequest {
            chip_select: chip_select.require_any()?,
            data,
        })
    }

    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The mask plus the bytes actually carried, not the full buffer capacity.
    pub fn transfer_len(&self) -> usize {
        ChipSelect::SIZE + self.data.len()
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.chip_select.encode();
        buf.extend_from_slice(&self.data);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ChipSelect::SIZE {
            return Err(HcError::Malformed {
                what: "program",
                expected: ChipSelect::SIZE,
                actual: bytes.len(),
            });
        }
        let chip_select = ChipSelect::new(LittleEndian::read_u16(bytes))?;
        ProgramRequest::new(chip_select, bytes[ChipSelect::SIZE..].to_vec())
    }
}

/// Scalar register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRequest {
    chip_select: ChipSelect,
    address: u16,
    data: u32,
}

impl WriteRequest {
    pub const SIZE: usize = 8;

    pub fn new(chip_select: ChipSelect, address: u16, data: u32) -> Result<Self> {
        Ok(WriteRequest {
            chip_select: chip_select.require_any()?,
            address,
            data,
        })
    }

    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Register actually addressed on the chip.
    pub fn register(&self) -> u16 {
        self.address & REGISTER_ADDRESS_MASK
    }

    pub fn data(&self) -> u32 {
        self.data
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0; Self::SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.chip_select.bits());
        LittleEndian::write_u16(&mut buf[2..4], self.address);
        LittleEndian::write_u32(&mut buf[4..8], self.data);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        expect_len("write", bytes, Self::SIZE)?;
        let (chip_select, address) = decode_header("write", bytes)?;
        WriteRequest::new(chip_select, address, LittleEndian::read_u32(&bytes[4..8]))
    }
}

/// Scalar register read. The reply is one little-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    chip_select: ChipSelect,
    address: u16,
}

impl ReadRequest {
    pub const SIZE: usize = 4;
    pub const RESPONSE_SIZE: usize = 4;

    /// Fails unless exactly one chip is selected.
    pub fn new(chip_select: ChipSelect, address: u16) -> Result<Self> {
        Ok(ReadRequest {
            chip_select: chip_select.require_single()?,
            address,
        })
    }

    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn register(&self) -> u16 {
        self.address & REGISTER_ADDRESS_MASK
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0; Self::SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.chip_select.bits());
        LittleEndian::write_u16(&mut buf[2..4], self.address);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        expect_len("read", bytes, Self::SIZE)?;
        let (chip_select, address) = decode_header("read", bytes)?;
        ReadRequest::new(chip_select, address)
    }
}

/// Block read starting at `address`. The caller sizes the reply buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReadRequest {
    chip_select: ChipSelect,
    address: u16,
}

impl BlockReadRequest {
    pub const SIZE: usize = 4;

    /// Fails unless exactly one chip is selected.
    pub fn new(chip_select: ChipSelect, address: u16) -> Result<Self> {
        Ok(BlockReadRequest {
            chip_select: chip_select.require_single()?,
            address,
        })
    }

    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0; Self::SIZE];
        LittleEndian::write_u16(&mut buf[0..2], self.chip_select.bits());
        LittleEndian::write_u16(&mut buf[2..4], self.address);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        expect_len("block read", bytes, Self::SIZE)?;
        let (chip_select, address) = decode_header("block read", bytes)?;
        BlockReadRequest::new(chip_select, address)
    }
}

/// Block write of up to [`MAX_BLOCK_WORDS`] words starting at `address`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockWriteRequest {
    chip_select: ChipSelect,
    address: u16,
    words: Vec<u32>,
}

impl BlockWriteRequest {
    /// Size of the driver structure header, which already counts one data word.
    pub const HEADER_SIZE: usize = 8;

    pub fn new(chip_select: ChipSelect, address: u16, words: Vec<u32>) -> Result<Self> {
        if words.len() > MAX_BLOCK_WORDS {
            return Err(HcError::PayloadTooLarge {
                len: words.len(),
                max: MAX_BLOCK_WORDS,
                unit: "words",
            });
        }
        Ok(BlockWriteRequest {
            chip_select: chip_select.require_any()?,
            address,
            words,
        })
    }

    pub fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn transfer_len(&self) -> usize {
        Self::HEADER_SIZE + self.words.len() * 4 - 4
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0; self.transfer_len()];
        LittleEndian::write_u16(&mut buf[0..2], self.chip_select.bits());
        LittleEndian::write_u16(&mut buf[2..4], self.address);
        LittleEndian::write_u32_into(&self.words, &mut buf[4..]);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (chip_select, address) = decode_header("block write", bytes)?;
        let payload = &bytes[4..];
        if payload.len() % 4 != 0 {
            return Err(HcError::Malformed {
                what: "block write",
                expected: bytes.len() - payload.len() % 4,
                actual: bytes.len(),
            });
        }
        let mut words = vec![0; payload.len() / 4];
        LittleEndian::read_u32_into(payload, &mut words);
        BlockWriteRequest::new(chip_select, address, words)
    }
}

/// One control call worth of input, tagged with its operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ProgramInit(ChipSelect),
    Program(ProgramRequest),
    ProgramEnd(ChipSelect),
    Write(WriteRequest),
    Read(ReadRequest),
    BlockWrite(BlockWriteRequest),
    BlockRead(BlockReadRequest),
    ChipSelect(ChipSelect),
}

impl Request {
    pub fn operation(&self) -> Operation {
        match self {
            Request::ProgramInit(_) => Operation::ProgramInit,
            Request::Program(_) => Operation::ProgramFpga,
            Request::ProgramEnd(_) => Operation::ProgramEnd,
            Request::Write(_) => Operation::Write,
            Request::Read(_) => Operation::Read,
            Request::BlockWrite(_) => Operation::BlockWrite,
            Request::BlockRead(_) => Operation::BlockRead,
            Request::ChipSelect(_) => Operation::ChipSelect,
        }
    }

    pub fn chip_select(&self) -> ChipSelect {
        match self {
            Request::ProgramInit(cs) | Request::ProgramEnd(cs) | Request::ChipSelect(cs) => *cs,
            Request::Program(r) => r.chip_select(),
            Request::Write(r) => r.chip_select(),
            Request::Read(r) => r.chip_select(),
            Request::BlockWrite(r) => r.chip_select(),
            Request::BlockRead(r) => r.chip_select(),
        }
    }

    /// Number of input bytes handed to the control call.
    pub fn transfer_len(&self) -> usize {
        match self {
            Request::ProgramInit(_) | Request::ProgramEnd(_) | Request::ChipSelect(_) => {
                ChipSelect::SIZE
            }
            Request::Program(r) => r.transfer_len(),
            Request::Write(_) => WriteRequest::SIZE,
            Request::Read(_) => ReadRequest::SIZE,
            Request::BlockWrite(r) => r.transfer_len(),
            Request::BlockRead(_) => BlockReadRequest::SIZE,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            Request::ProgramInit(cs) | Request::ProgramEnd(cs) | Request::ChipSelect(cs) => {
                cs.encode()
            }
            Request::Program(r) => r.encode(),
            Request::Write(r) => r.encode(),
            Request::Read(r) => r.encode(),
            Request::BlockWrite(r) => r.encode(),
            Request::BlockRead(r) => r.encode(),
        }
    }

    pub fn decode(op: Operation, bytes: &[u8]) -> Result<Self> {
        Ok(match op {
            Operation::ProgramInit => Request::ProgramInit(ChipSelect::decode(bytes)?),
            Operation::ProgramFpga => Request::Program(ProgramRequest::decode(bytes)?),
            Operation::ProgramEnd => Request::ProgramEnd(ChipSelect::decode(bytes)?),
            Operation::Write => Request::Write(WriteRequest::decode(bytes)?),
            Operation::Read => Request::Read(ReadRequest::decode(bytes)?),
            Operation::BlockWrite => Request::BlockWrite(BlockWriteRequest::decode(bytes)?),
            Operation::BlockRead => Request::BlockRead(BlockReadRequest::decode(bytes)?),
            Operation::ChipSelect => Request::ChipSelect(ChipSelect::decode(bytes)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_chip_reads_are_accepted() {
        for chip in 0..MAX_CHIP_COUNT {
            let cs = ChipSelect::chip(chip).unwrap();
            assert_eq!(cs.single(), Some(chip));
            assert!(ReadRequest::new(cs, 3).is_ok());
            assert!(BlockReadRequest::new(cs, 0x100).is_ok());
        }
    }

    #[test]
    fn multi_chip_reads_are_refused() {
        for mask in [0b11u16, 0b101, 0b11_1111_1111, 0b10_0000_0001] {
            let cs = ChipSelect::new(mask).unwrap();
            assert!(matches!(
                ReadRequest::new(cs, 0),
                Err(HcError::InvalidChipMask { .. })
            ));
            assert!(matches!(
                BlockReadRequest::new(cs, 0),
                Err(HcError::InvalidChipMask { .. })
            ));
        }
    }

    #[test]
    fn empty_and_out_of_range_masks_are_refused() {
        assert!(matches!(
            WriteRequest::new(ChipSelect::NONE, 0, 0),
            Err(HcError::InvalidChipMask { mask: 0, .. })
        ));
        assert!(matches!(
            ChipSelect::new(1 << 10),
            Err(HcError::InvalidChipMask { mask: 0x400, .. })
        ));
        assert!(ChipSelect::chip(MAX_CHIP_COUNT).is_err());
        assert!(ChipSelect::chip(40).is_err());
        assert_eq!(ChipSelect::ALL.bits(), 0x3ff);
    }

    #[test]
    fn chip_iteration() {
        let cs = ChipSelect::from_chips(vec![0, 3, 9]).unwrap();
        assert_eq!(cs.bits(), 0b10_0000_1001);
        assert_eq!(cs.chips().collect::<Vec<_>>(), vec![0, 3, 9]);
        assert_eq!(cs.count(), 3);
        assert_eq!(cs.single(), None);
        assert!(!cs.contains(1));
    }

    #[test]
    fn program_payload_limit() {
        let cs = ChipSelect::chip(0).unwrap();
        let full = ProgramRequest::new(cs, vec![0xa5; MAX_DATA_LENGTH]).unwrap();
        assert_eq!(full.transfer_len(), MAX_DATA_LENGTH + 2);
        assert_eq!(full.encode().len(), full.transfer_len());

        match ProgramRequest::new(cs, vec![0; MAX_DATA_LENGTH + 1]) {
            Err(HcError::PayloadTooLarge { len, max, .. }) => {
                assert_eq!(len, 16385);
                assert_eq!(max, 16384);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn block_write_payload_limit() {
        let cs = ChipSelect::ALL;
        let full = BlockWriteRequest::new(cs, 0, vec![7; MAX_BLOCK_WORDS]).unwrap();
        assert_eq!(full.transfer_len(), 8 + 4 * 4096 - 4);
        assert_eq!(full.encode().len(), full.transfer_len());

        assert!(matches!(
            BlockWriteRequest::new(cs, 0, vec![0; MAX_BLOCK_WORDS + 1]),
            Err(HcError::PayloadTooLarge { len: 4097, max: 4096, .. })
        ));
    }

    #[test]
    fn write_record_layout() {
        let cs = ChipSelect::new(0b0000000001).unwrap();
        let request = WriteRequest::new(cs, 0x05, 0xDEAD_BEEF).unwrap();
        let bytes = request.encode();
        assert_eq!(bytes, vec![0x01, 0x00, 0x05, 0x00, 0xef, 0xbe, 0xad, 0xde]);

        let decoded = WriteRequest::decode(&bytes).unwrap();
        assert_eq!(decoded.chip_select().bits(), 0b1);
        assert_eq!(decoded.address(), 0x05);
        assert_eq!(decoded.data(), 0xDEAD_BEEF);
    }

    #[test]
    fn register_uses_low_five_bits() {
        let cs = ChipSelect::chip(2).unwrap();
        assert_eq!(WriteRequest::new(cs, 0x25, 0).unwrap().register(), 0x05);
        assert_eq!(ReadRequest::new(cs, 0xffff).unwrap().register(), 0x1f);
    }

    #[test]
    fn block_write_layout_skips_placeholder_word() {
        let cs = ChipSelect::chip(1).unwrap();
        let request = BlockWriteRequest::new(cs, 0x0010, vec![0x0403_0201, 0x0807_0605]).unwrap();
        assert_eq!(
            request.encode(),
            vec![0x02, 0x00, 0x10, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
        assert_eq!(request.transfer_len(), 12);
    }

    #[test]
    fn decode_rejects_bad_lengths() {
        assert!(matches!(
            WriteRequest::decode(&[1, 0, 5, 0]),
            Err(HcError::Malformed { expected: 8, actual: 4, .. })
        ));
        assert!(matches!(
            Request::decode(Operation::ProgramInit, &[1]),
            Err(HcError::Malformed { .. })
        ));
        assert!(matches!(
            Request::decode(Operation::BlockWrite, &[1, 0, 0, 0, 9, 9]),
            Err(HcError::Malformed { expected: 4, actual: 6, .. })
        ));
    }

    #[test]
    fn decode_applies_mask_rules() {
        assert!(matches!(
            Request::decode(Operation::Read, &[0x03, 0x00, 0x01, 0x00]),
            Err(HcError::InvalidChipMask { mask: 0x03, .. })
        ));
        assert!(matches!(
            Request::decode(Operation::ChipSelect, &[0x00, 0x08]),
            Err(HcError::InvalidChipMask { mask: 0x0800, .. })
        ));
    }

    #[test]
    fn request_reports_operation_and_length() {
        let cs = ChipSelect::chip(4).unwrap();
        let request = Request::Program(ProgramRequest::new(cs, vec![1, 2, 3]).unwrap());
        assert_eq!(request.operation(), Operation::ProgramFpga);
        assert_eq!(request.transfer_len(), 5);
        assert_eq!(request.chip_select(), cs);

        let decoded = Request::decode(Operation::ProgramFpga, &request.encode()).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(Request::ProgramEnd(cs).encode(), vec![0x10, 0x00]);
    }

    #[test]
    fn device_names() {
        assert_eq!(device_path(FIRST_DEVICE_INDEX), "/dev/hc62_1");
        assert_eq!(APP_SYMBOLIC_NAME, "\\\\.\\HC62_");
        assert_eq!(DRVR_SYMBOLIC_NAME, "\\??\\HC62_");
        assert_eq!(DRVR_INTERNAL_NAME, "\\Device\\HC62_");
    }

    #[test]
    fn operation_functions_are_sequential() {
        for (i, op) in Operation::ALL.iter().enumerate() {
            assert_eq!(op.function(), 0x800 + i as u32);
        }
        assert_eq!(Operation::BlockWrite.method(), TransferMethod::OutDirect);
        assert_eq!(Operation::BlockRead.method(), TransferMethod::InDirect);
        assert_eq!(Operation::Read.method(), TransferMethod::Buffered);
    }
}
