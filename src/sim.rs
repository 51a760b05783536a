//! In-memory stand-in for an HC62 board.
//!
//! The simulated driver checks request lengths and the program bracket the
//! way the kernel driver does, so it can stand behind [`HcControl`] in tests
//! and in `hctest --simulate`.
//!
//! [`HcControl`]: crate::HcControl

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};
use nix::errno::Errno;

use crate::error::{HcError, Result};
use crate::hcioctl::{
    ChipSelect, Operation, Request, MAX_BLOCK_WORDS, MAX_CHIP_COUNT, REGISTER_ADDRESS_MASK,
};
use crate::transport::Transport;

const REGISTER_COUNT: usize = REGISTER_ADDRESS_MASK as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramState {
    #[default]
    Unprogrammed,
    Loading,
    Configured,
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedChip {
    registers: [u32; REGISTER_COUNT],
    memory: BTreeMap<u16, u32>,
    state: ProgramState,
    bitstream: Vec<u8>,
}

impl SimulatedChip {
    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn bitstream(&self) -> &[u8] {
        &self.bitstream
    }

    pub fn register(&self, address: u16) -> u32 {
        self.registers[(address & REGISTER_ADDRESS_MASK) as usize]
    }

    /// Block memory word; unwritten words read as zero.
    pub fn word(&self, address: u16) -> u32 {
        self.memory.get(&address).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedBoard {
    chips: Vec<SimulatedChip>,
    selected: ChipSelect,
    calls: Vec<(Operation, usize)>,
}

impl SimulatedBoard {
    pub fn new() -> Self {
        SimulatedBoard {
            chips: vec![SimulatedChip::default(); MAX_CHIP_COUNT],
            selected: ChipSelect::NONE,
            calls: Vec::new(),
        }
    }

    pub fn chip(&self, index: usize) -> Option<&SimulatedChip> {
        self.chips.get(index)
    }

    /// Mask set by the last chip-select call.
    pub fn selected(&self) -> ChipSelect {
        self.selected
    }

    /// Every control call received, with its input length.
    pub fn calls(&self) -> &[(Operation, usize)] {
        &self.calls
    }

    fn refuse(op: Operation, errno: Errno, why: &str) -> HcError {
        warn!("simulated board refused {}: {}", op, why);
        HcError::transport(op, errno)
    }

    fn execute(&mut self, request: Request, output: &mut [u8]) -> Result<usize> {
        let op = request.operation();
        let cs = request.chip_select();
        match request {
            Request::ProgramInit(_) => {
                for chip in cs.chips() {
                    let chip = &mut self.chips[chip];
                    chip.state = ProgramState::Loading;
                    chip.bitstream.clear();
                }
            }
            Request::Program(r) => {
                if cs.chips().any(|i| self.chips[i].state != ProgramState::Loading) {
                    return Err(Self::refuse(op, Errno::EIO, "chip not in programming mode"));
                }
                for chip in cs.chips() {
                    self.chips[chip].bitstream.extend_from_slice(r.data());
                }
            }
            Request::ProgramEnd(_) => {
                if cs.chips().any(|i| self.chips[i].state != ProgramState::Loading) {
                    return Err(Self::refuse(op, Errno::EIO, "chip not in programming mode"));
                }
                for chip in cs.chips() {
                    self.chips[chip].state = ProgramState::Configured;
                }
            }
            Request::Write(r) => {
                for chip in cs.chips() {
                    self.chips[chip].registers[r.register() as usize] = r.data();
                }
            }
            Request::Read(r) => {
                if output.len() < 4 {
                    return Err(Self::refuse(op, Errno::EINVAL, "reply buffer too small"));
                }
                let chip = &self.chips[cs.chips().next().unwrap_or(0)];
                LittleEndian::write_u32(&mut output[..4], chip.register(r.register()));
                return Ok(4);
            }
            Request::BlockWrite(r) => {
                for chip in cs.chips() {
                    let memory = &mut self.chips[chip].memory;
                    for (i, word) in r.words().iter().enumerate() {
                        memory.insert(r.address().wrapping_add(i as u16), *word);
                    }
                }
            }
            Request::BlockRead(r) => {
                if output.len() % 4 != 0 || output.len() > MAX_BLOCK_WORDS * 4 {
                    return Err(Self::refuse(op, Errno::EINVAL, "bad reply buffer length"));
                }
                let chip = &self.chips[cs.chips().next().unwrap_or(0)];
                for (i, out) in output.chunks_exact_mut(4).enumerate() {
                    LittleEndian::write_u32(out, chip.word(r.address().wrapping_add(i as u16)));
                }
                return Ok(output.len());
            }
            Request::ChipSelect(_) => {
                self.selected = cs;
            }
        }
        Ok(0)
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        SimulatedBoard::new()
    }
}

impl Transport for SimulatedBoard {
    fn control(&mut self, op: Operation, input: &[u8], output: &mut [u8]) -> Result<usize> {
        debug!("simulated {} in {} out {}", op, input.len(), output.len());
        self.calls.push((op, input.len()));
        let request = Request::decode(op, input)
            .map_err(|err| Self::refuse(op, Errno::EINVAL, &err.to_string()))?;
        self.execute(request, output)
    }
}
