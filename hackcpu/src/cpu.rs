use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::alu;
use crate::instruction::Instruction;

/// A memory write requested by the tick phase. The CPU never touches memory
/// itself; whoever owns the RAM decides whether (and how) to apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryWrite {
    /// The value A held *before* this cycle's commit.
    pub address: u16,
    /// The ALU output.
    pub value: u16,
    /// Only a C-instruction with the M destination bit set writes.
    pub enabled: bool,
}

pub struct Cpu {
    /// The address register. Also the jump target and the address of M.
    a: u16,
    /// The data register. Always the x input of the ALU.
    d: u16,
    /// The program counter, indexing ROM.
    pc: u16,
}
impl Debug for Cpu {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(
            fmt,
            "PC:{pc:04X} A:{a:04X} D:{d:04X}",
            pc = self.pc,
            a = self.a,
            d = self.d,
        )
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Cpu {
        return Cpu { a: 0, d: 0, pc: 0 };
    }

    /// The rising edge of the clock. Decodes and executes `instruction`,
    /// commits A, D and PC, and hands back the memory write (if any) for the
    /// caller to perform.
    ///
    /// `in_m` is the RAM word at the current A. `reset` forces the next PC to
    /// 0, overriding any jump, and leaves A and D to the instruction.
    pub fn tick(&mut self, instruction: Instruction, in_m: u16, reset: bool) -> MemoryWrite {
        let old_a = self.a;
        let y = if instruction.is_compute() && instruction.reads_memory() {
            in_m
        } else {
            old_a
        };
        let out = alu::compute(self.d, y, instruction.comp());

        // Work out every next value from the old registers before committing
        // any of them.
        let (next_a, next_d, jump, write) = if instruction.is_compute() {
            let dest = instruction.dest();
            (
                if dest.writes_a() { out.result } else { old_a },
                if dest.writes_d() { out.result } else { self.d },
                instruction.jump().taken(out.zero, out.negative),
                dest.writes_m(),
            )
        } else {
            (instruction.word(), self.d, false, false)
        };
        let next_pc = if reset {
            0
        } else if jump {
            old_a
        } else {
            self.pc.wrapping_add(1)
        };

        self.a = next_a;
        self.d = next_d;
        self.pc = next_pc;

        MemoryWrite {
            address: old_a,
            value: out.result,
            enabled: write,
        }
    }

    /// The falling edge of the clock: the PC and A that the next cycle will
    /// fetch from.
    pub fn tock(&self) -> (u16, u16) {
        (self.pc, self.a)
    }

    pub fn get_a(&self) -> u16 {
        self.a
    }
    pub fn get_d(&self) -> u16 {
        self.d
    }
    pub fn get_pc(&self) -> u16 {
        self.pc
    }
}

#[cfg(any(test, feature = "override-registers"))]
impl Cpu {
    pub fn set_a(&mut self, value: u16) {
        self.a = value;
    }
    pub fn set_d(&mut self, value: u16) {
        self.d = value;
    }
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 111a cccc ccdd djjj
    const D_EQ_A: Instruction = Instruction(0b1110_110000_010_000);
    const M_EQ_D: Instruction = Instruction(0b1110_001100_001_000);
    const D_EQ_M: Instruction = Instruction(0b1111_110000_010_000);
    const A_EQ_A_PLUS_1_JMP: Instruction = Instruction(0b1110_110111_100_111);
    const D_JEQ: Instruction = Instruction(0b1110_001100_000_010);

    fn cpu_with(a: u16, d: u16, pc: u16) -> Cpu {
        let mut cpu = Cpu::new();
        cpu.set_a(a);
        cpu.set_d(d);
        cpu.set_pc(pc);
        cpu
    }

    #[test]
    fn a_instruction_loads_literal() {
        let mut cpu = cpu_with(9, 42, 10);
        let write = cpu.tick(Instruction(1234), 0xFFFF, false);
        assert!(!write.enabled);
        assert_eq!(cpu.get_a(), 1234);
        assert_eq!(cpu.get_d(), 42);
        assert_eq!(cpu.get_pc(), 11);
    }

    #[test]
    fn a_selects_memory_operand() {
        let mut cpu = cpu_with(5, 0, 0);
        cpu.tick(D_EQ_M, 77, false);
        assert_eq!(cpu.get_d(), 77);
        cpu.tick(D_EQ_A, 77, false);
        assert_eq!(cpu.get_d(), 5);
    }

    #[test]
    fn memory_write_uses_old_a() {
        let mut cpu = cpu_with(300, 8, 0);
        let write = cpu.tick(M_EQ_D, 0, false);
        assert_eq!(
            write,
            MemoryWrite {
                address: 300,
                value: 8,
                enabled: true
            }
        );
    }

    #[test]
    fn jump_goes_to_old_a_even_when_a_changes() {
        let mut cpu = cpu_with(100, 0, 3);
        cpu.tick(A_EQ_A_PLUS_1_JMP, 0, false);
        assert_eq!(cpu.get_pc(), 100);
        assert_eq!(cpu.get_a(), 101);
    }

    #[test]
    fn untaken_jump_increments() {
        let mut cpu = cpu_with(100, 1, 3);
        cpu.tick(D_JEQ, 0, false);
        assert_eq!(cpu.get_pc(), 4);
        let mut cpu = cpu_with(100, 0, 3);
        cpu.tick(D_JEQ, 0, false);
        assert_eq!(cpu.get_pc(), 100);
    }

    #[test]
    fn reset_overrides_jump() {
        let mut cpu = cpu_with(100, 7, 3);
        cpu.tick(A_EQ_A_PLUS_1_JMP, 0, true);
        assert_eq!(cpu.get_pc(), 0);
        assert_eq!(cpu.get_a(), 101);
        assert_eq!(cpu.get_d(), 7);
    }

    #[test]
    fn pc_wraps() {
        let mut cpu = cpu_with(0, 0, 0xFFFF);
        cpu.tick(Instruction(0), 0, false);
        assert_eq!(cpu.get_pc(), 0);
    }

    #[test]
    fn tock_exports_committed_registers() {
        let mut cpu = Cpu::new();
        cpu.tick(Instruction(21), 0, false);
        assert_eq!(cpu.tock(), (1, 21));
    }
}
