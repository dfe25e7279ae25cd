//! Emulator for the Hack computer from Nand2Tetris: a minimalist Harvard
//! architecture, single-cycle, 16-bit CPU with separate ROM and RAM.
//!
//! The [`Cpu`] holds A, D and PC and is clocked in two phases, [`Cpu::tick`]
//! and [`Cpu::tock`]. The [`Computer`] owns the CPU and both memories and
//! drives one fetch/execute/writeback cycle per [`Computer::step`]. Screen and
//! keyboard live outside, in whatever host drives the computer.

pub mod alu;
mod computer;
mod cpu;
mod error;
pub mod image;
mod instruction;

pub use computer::{Computer, Cycle, DEFAULT_RAM_SIZE, DEFAULT_ROM_SIZE};
pub use cpu::{Cpu, MemoryWrite};
pub use error::{BusErrors, Error, Result};
pub use instruction::{Dest, Instruction, Jump};
