use std::fmt::{Debug, Display, Formatter, Result as FmtResult};

/*

  A-instruction:  0vvv vvvv vvvv vvvv      @value
  C-instruction:  1xxa cccc ccdd djjj      dest=comp;jump
                  ^   ^^^^^^^ ^^^ ^^^
                  |   |       |   \-- jump: lt eq gt
                  |   |       \------ dest: A D M
                  |   \-------------- a + comp: ALU operand select, ALU control
                  \------------------ kind

*/

const KIND_BIT: u16 = 0x8000;
const LITERAL_MASK: u16 = 0x7FFF;
const OPERAND_M_BIT: u16 = 1 << 12;
const COMP_SHIFT: u16 = 6;
const COMP_WIDTH_MASK: u16 = 0b11_1111;
const DEST_SHIFT: u16 = 3;
const DEST_WIDTH_MASK: u16 = 0b111;
const JUMP_WIDTH_MASK: u16 = 0b111;

/// One raw word fetched from ROM.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Instruction(pub u16);

impl Instruction {
    pub fn word(self) -> u16 {
        self.0
    }
    /// Bit 15: set for a C-instruction, clear for an A-instruction.
    pub fn is_compute(self) -> bool {
        self.0 & KIND_BIT != 0
    }
    /// Bits 14..0: the value an A-instruction loads.
    pub fn literal(self) -> u16 {
        self.0 & LITERAL_MASK
    }
    /// Bit 12 ("a"): the ALU's y operand is M rather than A.
    pub fn reads_memory(self) -> bool {
        self.0 & OPERAND_M_BIT != 0
    }
    /// Bits 11..6, 6 bits wide: the ALU control code.
    pub fn comp(self) -> u8 {
        ((self.0 >> COMP_SHIFT) & COMP_WIDTH_MASK) as u8
    }
    /// Bits 5..3, 3 bits wide.
    pub fn dest(self) -> Dest {
        Dest(((self.0 >> DEST_SHIFT) & DEST_WIDTH_MASK) as u8)
    }
    /// Bits 2..0, 3 bits wide.
    pub fn jump(self) -> Jump {
        Jump((self.0 & JUMP_WIDTH_MASK) as u8)
    }
}

/// Where a C-instruction stores its ALU result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dest(u8);

impl Dest {
    pub const A: u8 = 0b100;
    pub const D: u8 = 0b010;
    pub const M: u8 = 0b001;

    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn writes_a(self) -> bool {
        self.0 & Self::A != 0
    }
    pub fn writes_d(self) -> bool {
        self.0 & Self::D != 0
    }
    pub fn writes_m(self) -> bool {
        self.0 & Self::M != 0
    }
}

/// Under which ALU flag conditions a C-instruction jumps to A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump(u8);

impl Jump {
    pub const NEGATIVE: u8 = 0b100;
    pub const ZERO: u8 = 0b010;
    pub const POSITIVE: u8 = 0b001;

    pub fn bits(self) -> u8 {
        self.0
    }
    pub fn on_negative(self) -> bool {
        self.0 & Self::NEGATIVE != 0
    }
    pub fn on_zero(self) -> bool {
        self.0 & Self::ZERO != 0
    }
    pub fn on_positive(self) -> bool {
        self.0 & Self::POSITIVE != 0
    }
    /// Whether the jump happens, given the ALU flags.
    pub fn taken(self, zero: bool, negative: bool) -> bool {
        (self.on_negative() && negative)
            || (self.on_zero() && zero)
            || (self.on_positive() && !zero && !negative)
    }
}

/// Assembly mnemonic for one of the 28 documented (a, comp) combinations.
fn comp_mnemonic(reads_memory: bool, comp: u8) -> Option<&'static str> {
    // (with A, with M); comp codes that ignore y only exist with a=0
    let (with_a, with_m) = match comp {
        0b101010 => ("0", None),
        0b111111 => ("1", None),
        0b111010 => ("-1", None),
        0b001100 => ("D", None),
        0b001101 => ("!D", None),
        0b001111 => ("-D", None),
        0b011111 => ("D+1", None),
        0b001110 => ("D-1", None),
        0b110000 => ("A", Some("M")),
        0b110001 => ("!A", Some("!M")),
        0b110011 => ("-A", Some("-M")),
        0b110111 => ("A+1", Some("M+1")),
        0b110010 => ("A-1", Some("M-1")),
        0b000010 => ("D+A", Some("D+M")),
        0b010011 => ("D-A", Some("D-M")),
        0b000111 => ("A-D", Some("M-D")),
        0b000000 => ("D&A", Some("D&M")),
        0b010101 => ("D|A", Some("D|M")),
        _ => return None,
    };
    if reads_memory {
        with_m
    } else {
        Some(with_a)
    }
}

const JUMP_MNEMONICS: [&str; 8] = ["", "JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"];

impl Display for Instruction {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        if !self.is_compute() {
            return write!(fmt, "@{}", self.literal());
        }
        let dest = self.dest();
        if dest.bits() != 0 {
            for (enabled, name) in [
                (dest.writes_a(), "A"),
                (dest.writes_d(), "D"),
                (dest.writes_m(), "M"),
            ] {
                if enabled {
                    fmt.write_str(name)?;
                }
            }
            fmt.write_str("=")?;
        }
        match comp_mnemonic(self.reads_memory(), self.comp()) {
            Some(mnemonic) => fmt.write_str(mnemonic)?,
            None => write!(
                fmt,
                "comp({}0b{:06b})",
                if self.reads_memory() { "M," } else { "" },
                self.comp()
            )?,
        }
        let jump = self.jump().bits();
        if jump != 0 {
            write!(fmt, ";{}", JUMP_MNEMONICS[jump as usize])?;
        }
        Ok(())
    }
}

impl Debug for Instruction {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        write!(fmt, "{:04X} ({self})", self.0)
    }
}
