//! Property-based tests for the ALU and the CPU's tick/tock contract.

use hackcpu::{alu, Cpu, Instruction};
use proptest::prelude::*;

fn cpu_with(a: u16, d: u16, pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.set_a(a);
    cpu.set_d(d);
    cpu.set_pc(pc);
    cpu
}

/// A C-instruction from its fields: 111a cccc ccdd djjj
fn c_instruction(reads_memory: bool, comp: u8, dest: u8, jump: u8) -> Instruction {
    Instruction(
        0b1110_0000_0000_0000
            | (reads_memory as u16) << 12
            | (comp as u16 & 0x3F) << 6
            | (dest as u16 & 0x7) << 3
            | (jump as u16 & 0x7),
    )
}

proptest! {
    #[test]
    fn alu_is_pure(x in any::<u16>(), y in any::<u16>(), comp in 0u8..64) {
        prop_assert_eq!(alu::compute(x, y, comp), alu::compute(x, y, comp));
    }

    #[test]
    fn alu_flags_match_result(x in any::<u16>(), y in any::<u16>(), comp in 0u8..64) {
        let out = alu::compute(x, y, comp);
        prop_assert_eq!(out.zero, out.result == 0);
        prop_assert_eq!(out.negative, (out.result >> 15) & 1 == 1);
    }

    #[test]
    fn alu_add_and_subtract(x in any::<u16>(), y in any::<u16>()) {
        prop_assert_eq!(alu::compute(x, y, 0b000010).result, x.wrapping_add(y));
        prop_assert_eq!(alu::compute(x, y, 0b010011).result, x.wrapping_sub(y));
        prop_assert_eq!(alu::compute(x, y, 0b000111).result, y.wrapping_sub(x));
        prop_assert_eq!(alu::compute(x, y, 0b000000).result, x & y);
        prop_assert_eq!(alu::compute(x, y, 0b010101).result, x | y);
    }

    #[test]
    fn a_instruction_loads_literal(
        a in any::<u16>(),
        d in any::<u16>(),
        pc in any::<u16>(),
        literal in 0u16..0x8000,
        in_m in any::<u16>(),
        reset in any::<bool>(),
    ) {
        let mut cpu = cpu_with(a, d, pc);
        let write = cpu.tick(Instruction(literal), in_m, reset);
        prop_assert!(!write.enabled);
        prop_assert_eq!(cpu.get_a(), literal);
        prop_assert_eq!(cpu.get_d(), d);
        let expected_pc = if reset { 0 } else { pc.wrapping_add(1) };
        prop_assert_eq!(cpu.get_pc(), expected_pc);
        prop_assert_eq!(cpu.tock(), (expected_pc, literal));
    }

    #[test]
    fn jump_target_is_old_a(
        a in any::<u16>(),
        d in any::<u16>(),
        pc in any::<u16>(),
        reads_memory in any::<bool>(),
        comp in 0u8..64,
        dest in 0u8..8,
        in_m in any::<u16>(),
    ) {
        // JMP always holds
        let mut cpu = cpu_with(a, d, pc);
        let write = cpu.tick(c_instruction(reads_memory, comp, dest, 0b111), in_m, false);
        prop_assert_eq!(cpu.get_pc(), a);
        prop_assert_eq!(write.address, a);
    }

    #[test]
    fn reset_overrides_jump(
        a in any::<u16>(),
        d in any::<u16>(),
        pc in any::<u16>(),
        reads_memory in any::<bool>(),
        comp in 0u8..64,
        dest in 0u8..8,
        in_m in any::<u16>(),
    ) {
        let instruction = c_instruction(reads_memory, comp, dest, 0b111);
        let mut running = cpu_with(a, d, pc);
        let mut resetting = cpu_with(a, d, pc);
        let running_write = running.tick(instruction, in_m, false);
        let resetting_write = resetting.tick(instruction, in_m, true);
        prop_assert_eq!(resetting.get_pc(), 0);
        prop_assert_eq!(resetting.get_a(), running.get_a());
        prop_assert_eq!(resetting.get_d(), running.get_d());
        prop_assert_eq!(resetting_write, running_write);
    }

    #[test]
    fn c_instruction_writes_only_its_destinations(
        a in any::<u16>(),
        d in any::<u16>(),
        reads_memory in any::<bool>(),
        comp in 0u8..64,
        dest in 0u8..8,
        in_m in any::<u16>(),
    ) {
        let mut cpu = cpu_with(a, d, 0);
        let write = cpu.tick(c_instruction(reads_memory, comp, dest, 0), in_m, false);
        let y = if reads_memory { in_m } else { a };
        let out = alu::compute(d, y, comp).result;
        prop_assert_eq!(cpu.get_a(), if dest & 0b100 != 0 { out } else { a });
        prop_assert_eq!(cpu.get_d(), if dest & 0b010 != 0 { out } else { d });
        prop_assert_eq!(write.enabled, dest & 0b001 != 0);
        prop_assert_eq!(write.value, out);
        prop_assert_eq!(cpu.get_pc(), 1);
    }
}
