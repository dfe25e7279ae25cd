//! The Hack ALU. Purely combinational: two 16-bit inputs, six control bits,
//! one 16-bit output and two flags.

// Bits of the comp field, high to low.
/// **zx**: zero the x input
pub const COMP_ZX: u8 = 0b_10_0000;
/// **nx**: bitwise-negate the x input (after zx)
pub const COMP_NX: u8 = 0b_01_0000;
/// **zy**: zero the y input
pub const COMP_ZY: u8 = 0b_00_1000;
/// **ny**: bitwise-negate the y input (after zy)
pub const COMP_NY: u8 = 0b_00_0100;
/// **f**: 1 selects x + y, 0 selects x & y
pub const COMP_F: u8 = 0b_00_0010;
/// **no**: bitwise-negate the output
pub const COMP_NO: u8 = 0b_00_0001;

/// Only the low six bits of a comp code mean anything.
pub const COMP_MASK: u8 = 0b_11_1111;

const WORD_SIGN_BIT: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub result: u16,
    /// The result is exactly zero.
    pub zero: bool,
    /// Bit 15 of the result is set.
    pub negative: bool,
}

fn is_bit_set(comp: u8, bit: u8) -> bool {
    comp & bit == bit
}

/// Run the ALU. `y` is either A or M, depending on the instruction; `x` is
/// always D. Total over all 64 comp codes, including the undocumented ones.
pub fn compute(x: u16, y: u16, comp: u8) -> AluOutput {
    let comp = comp & COMP_MASK;
    let x = if is_bit_set(comp, COMP_ZX) { 0 } else { x };
    let x = if is_bit_set(comp, COMP_NX) { !x } else { x };
    let y = if is_bit_set(comp, COMP_ZY) { 0 } else { y };
    let y = if is_bit_set(comp, COMP_NY) { !y } else { y };
    let result = if is_bit_set(comp, COMP_F) {
        x.wrapping_add(y)
    } else {
        x & y
    };
    let result = if is_bit_set(comp, COMP_NO) {
        !result
    } else {
        result
    };
    AluOutput {
        result,
        zero: result == 0,
        negative: result & WORD_SIGN_BIT != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: u16 = 17;
    const Y: u16 = 3;

    fn run(comp: u8) -> u16 {
        compute(X, Y, comp).result
    }

    #[test]
    fn documented_opcodes() {
        assert_eq!(run(0b101010), 0);
        assert_eq!(run(0b111111), 1);
        assert_eq!(run(0b111010), 0xFFFF);
        assert_eq!(run(0b001100), X);
        assert_eq!(run(0b110000), Y);
        assert_eq!(run(0b001101), !X);
        assert_eq!(run(0b110001), !Y);
        assert_eq!(run(0b001111), X.wrapping_neg());
        assert_eq!(run(0b110011), Y.wrapping_neg());
        assert_eq!(run(0b011111), X + 1);
        assert_eq!(run(0b110111), Y + 1);
        assert_eq!(run(0b001110), X - 1);
        assert_eq!(run(0b110010), Y - 1);
        assert_eq!(run(0b000010), X + Y);
        assert_eq!(run(0b010011), X - Y);
        assert_eq!(run(0b000111), Y.wrapping_sub(X));
        assert_eq!(run(0b000000), X & Y);
        assert_eq!(run(0b010101), X | Y);
    }

    #[test]
    fn addition_wraps() {
        let out = compute(0xFFFF, 1, 0b000010);
        assert_eq!(out.result, 0);
        assert!(out.zero);
        assert!(!out.negative);
    }

    #[test]
    fn flags_follow_result() {
        let out = compute(0, 0, 0b111010);
        assert_eq!(out.result, 0xFFFF);
        assert!(out.negative);
        assert!(!out.zero);

        let out = compute(0x1234, 0x4321, 0b000010);
        assert_eq!(out.result, 0x5555);
        assert!(!out.negative);
        assert!(!out.zero);
    }

    #[test]
    fn input_negation_happens_before_the_operation() {
        // nx, f=and, no: !(!x & y)
        let out = compute(0b1100, 0b1010, COMP_NX | COMP_NO);
        assert_eq!(out.result, !(!0b1100u16 & 0b1010));
    }

    #[test]
    fn high_comp_bits_are_ignored() {
        assert_eq!(compute(X, Y, 0b1100_0010), compute(X, Y, 0b0000_0010));
    }
}
