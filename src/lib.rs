//! # hccontrol
//!
//! A library to drive the FPGA chips of an HC62 board: load bitstreams, access
//! the chip registers and move blocks of words, through the board's kernel driver.

#[macro_use]
extern crate nix;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

pub mod device;
pub mod error;
pub mod hcioctl;
#[allow(dead_code)]
mod ioctl;
pub mod sim;
pub mod transport;

pub use device::Device;
pub use error::{HcError, Result};
pub use hcioctl::{
    BlockReadRequest, BlockWriteRequest, ChipSelect, Operation, ProgramRequest, ReadRequest,
    Request, WriteRequest, MAX_BLOCK_WORDS, MAX_CHIP_COUNT, MAX_DATA_LENGTH,
};
pub use ioctl::{request_code, windows_control_code};
pub use sim::SimulatedBoard;
pub use transport::Transport;

/// HcControl issues the board operations over a [`Transport`].
pub struct HcControl<T = Device> {
    transport: T,
}

impl HcControl<Device> {
    /// Controls the first board. Call [`HcControl::open`] before use.
    pub fn new() -> Self {
        HcControl::with_transport(Device::new())
    }

    pub fn new_at(path: &str) -> Self {
        HcControl::with_transport(Device::new_at(path))
    }

    /// Open the driver.
    pub fn open(&mut self) -> Result<()> {
        Ok(self.transport.open()?)
    }

    /// Close the driver.
    pub fn close(&mut self) {
        self.transport.close()
    }
}

impl Default for HcControl<Device> {
    fn default() -> Self {
        HcControl::new()
    }
}

impl<T: Transport> HcControl<T> {
    pub fn with_transport(transport: T) -> Self {
        HcControl { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Sends a prepared request; the reply, if any, lands in `output`.
    pub fn submit(&mut self, request: &Request, output: &mut [u8]) -> Result<usize> {
        let op = request.operation();
        let input = request.encode();
        debug!(
            "{} chips {} in {} out {}",
            op,
            request.chip_select(),
            input.len(),
            output.len()
        );
        let n = self.transport.control(op, &input, output)?;
        trace!("{} returned {} bytes", op, n);
        Ok(n)
    }

    /// Puts the selected chips into programming mode.
    pub fn program_init(&mut self, chip_select: ChipSelect) -> Result<()> {
        let request = Request::ProgramInit(chip_select.require_any()?);
        self.submit(&request, &mut []).map(|_| ())
    }

    /// Sends one buffer of bitstream data, at most [`MAX_DATA_LENGTH`] bytes.
    pub fn program(&mut self, chip_select: ChipSelect, data: &[u8]) -> Result<()> {
        let request = Request::Program(ProgramRequest::new(chip_select, data.to_vec())?);
        self.submit(&request, &mut []).map(|_| ())
    }

    /// Ends programming of the selected chips.
    pub fn program_end(&mut self, chip_select: ChipSelect) -> Result<()> {
        let request = Request::ProgramEnd(chip_select.require_any()?);
        self.submit(&request, &mut []).map(|_| ())
    }

    /// Writes `data` to register `address` of every selected chip.
    pub fn write(&mut self, chip_select: ChipSelect, address: u16, data: u32) -> Result<()> {
        let request = Request::Write(WriteRequest::new(chip_select, address, data)?);
        self.submit(&request, &mut []).map(|_| ())
    }

    /// Reads register `address` of the one selected chip.
    pub fn read(&mut self, chip_select: ChipSelect, address: u16) -> Result<u32> {
        let request = Request::Read(ReadRequest::new(chip_select, address)?);
        let mut reply = [0u8; ReadRequest::RESPONSE_SIZE];
        let n = self.submit(&request, &mut reply)?;
        if n < reply.len() {
            return Err(HcError::ShortResponse {
                op: Operation::Read,
                expected: reply.len(),
                actual: n,
            });
        }
        Ok(LittleEndian::read_u32(&reply))
    }

    /// Writes `words` starting at `address` on every selected chip.
    pub fn block_write(
        &mut self,
        chip_select: ChipSelect,
        address: u16,
        words: &[u32],
    ) -> Result<()> {
        let request = Request::BlockWrite(BlockWriteRequest::new(
            chip_select,
            address,
            words.to_vec(),
        )?);
        self.submit(&request, &mut []).map(|_| ())
    }

    /// Reads `count` words starting at `address` from the one selected chip.
    pub fn block_read(
        &mut self,
        chip_select: ChipSelect,
        address: u16,
        count: usize,
    ) -> Result<Vec<u32>> {
        if count > MAX_BLOCK_WORDS {
            return Err(HcError::PayloadTooLarge {
                len: count,
                max: MAX_BLOCK_WORDS,
                unit: "words",
            });
        }
        let request = Request::BlockRead(BlockReadRequest::new(chip_select, address)?);
        let mut reply = vec![0u8; count * 4];
        let n = self.submit(&request, &mut reply)?;
        if n < reply.len() {
            return Err(HcError::ShortResponse {
                op: Operation::BlockRead,
                expected: reply.len(),
                actual: n,
            });
        }
        let mut words = vec![0u32; count];
        LittleEndian::read_u32_into(&reply, &mut words);
        Ok(words)
    }

    /// Routes subsequent board traffic to the selected chips.
    pub fn chip_select(&mut self, chip_select: ChipSelect) -> Result<()> {
        let request = Request::ChipSelect(chip_select.require_any()?);
        self.submit(&request, &mut []).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ProgramState;

    fn board() -> HcControl<SimulatedBoard> {
        HcControl::with_transport(SimulatedBoard::new())
    }

    #[test]
    fn write_then_read() {
        let mut hc = board();
        let cs = ChipSelect::new(0b0000000001).unwrap();
        hc.write(cs, 0x05, 0xDEAD_BEEF).unwrap();
        assert_eq!(hc.read(cs, 0x05).unwrap(), 0xDEAD_BEEF);
        assert_eq!(hc.read(cs, 0x25).unwrap(), 0xDEAD_BEEF);
        assert_eq!(hc.read(ChipSelect::chip(1).unwrap(), 0x05).unwrap(), 0);
    }

    #[test]
    fn multi_chip_read_never_reaches_transport() {
        let mut hc = board();
        let cs = ChipSelect::new(0b11).unwrap();
        assert!(matches!(hc.read(cs, 0), Err(HcError::InvalidChipMask { .. })));
        assert!(matches!(
            hc.block_read(cs, 0, 4),
            Err(HcError::InvalidChipMask { .. })
        ));
        assert!(hc.transport().calls().is_empty());
    }

    #[test]
    fn program_sequence() {
        let mut hc = board();
        let cs = ChipSelect::from_chips(vec![1, 7]).unwrap();
        hc.program_init(cs).unwrap();
        hc.program(cs, &[0xaa; MAX_DATA_LENGTH]).unwrap();
        hc.program(cs, &[0x55; 10]).unwrap();
        hc.program_end(cs).unwrap();

        let sim = hc.into_inner();
        for index in [1, 7] {
            let chip = sim.chip(index).unwrap();
            assert_eq!(chip.state(), ProgramState::Configured);
            assert_eq!(chip.bitstream().len(), MAX_DATA_LENGTH + 10);
        }
        assert_eq!(
            sim.calls(),
            &[
                (Operation::ProgramInit, 2),
                (Operation::ProgramFpga, MAX_DATA_LENGTH + 2),
                (Operation::ProgramFpga, 12),
                (Operation::ProgramEnd, 2),
            ]
        );
    }

    #[test]
    fn oversized_payloads_are_refused() {
        let mut hc = board();
        let cs = ChipSelect::chip(0).unwrap();
        assert!(matches!(
            hc.program(cs, &vec![0; MAX_DATA_LENGTH + 1]),
            Err(HcError::PayloadTooLarge { .. })
        ));
        assert!(matches!(
            hc.block_write(cs, 0, &vec![0; MAX_BLOCK_WORDS + 1]),
            Err(HcError::PayloadTooLarge { .. })
        ));
        assert!(matches!(
            hc.block_read(cs, 0, MAX_BLOCK_WORDS + 1),
            Err(HcError::PayloadTooLarge { .. })
        ));
        assert!(hc.transport().calls().is_empty());
    }

    #[test]
    fn empty_selection_is_refused() {
        let mut hc = board();
        assert!(hc.chip_select(ChipSelect::NONE).is_err());
        assert!(hc.program_init(ChipSelect::NONE).is_err());
        assert!(hc.write(ChipSelect::NONE, 0, 0).is_err());
    }

    struct Silent;

    impl Transport for Silent {
        fn control(
            &mut self,
            _op: Operation,
            _input: &[u8],
            _output: &mut [u8],
        ) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn short_reply_is_reported() {
        let mut hc = HcControl::with_transport(Silent);
        let cs = ChipSelect::chip(3).unwrap();
        assert!(matches!(
            hc.read(cs, 1),
            Err(HcError::ShortResponse { op: Operation::Read, expected: 4, actual: 0 })
        ));
        assert!(matches!(
            hc.block_read(cs, 1, 2),
            Err(HcError::ShortResponse { expected: 8, .. })
        ));
    }

    #[test]
    fn hccontrol_constants() {
        assert_eq!(HcControl::new().transport().path(), "/dev/hc62_1");
        assert_eq!(MAX_CHIP_COUNT, 10);
    }
}
