use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitOr, BitOrAssign},
    path::PathBuf,
};

use thiserror::Error;

/// Per-cycle bus faults, as a bitmask. Several may be set in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BusErrors(u8);

impl BusErrors {
    /// PC pointed past the end of ROM; the instruction read as 0.
    pub const ROM_READ_ERROR: BusErrors = BusErrors(0x1);
    /// A pointed past the end of RAM; M read as 0.
    pub const RAM_READ_ERROR: BusErrors = BusErrors(0x2);
    /// A write to M targeted an address past the end of RAM; it was dropped.
    pub const RAM_WRITE_ERROR: BusErrors = BusErrors(0x4);

    pub const fn empty() -> BusErrors {
        BusErrors(0)
    }
    pub const fn bits(self) -> u8 {
        self.0
    }
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub const fn contains(self, other: BusErrors) -> bool {
        self.0 & other.0 == other.0
    }
    pub fn insert(&mut self, other: BusErrors) {
        self.0 |= other.0;
    }
}

impl BitOr for BusErrors {
    type Output = BusErrors;
    fn bitor(self, rhs: BusErrors) -> BusErrors {
        BusErrors(self.0 | rhs.0)
    }
}

impl BitOrAssign for BusErrors {
    fn bitor_assign(&mut self, rhs: BusErrors) {
        self.insert(rhs);
    }
}

impl Display for BusErrors {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        if self.is_empty() {
            return fmt.write_str("no error");
        }
        let mut first = true;
        for (flag, name) in [
            (BusErrors::ROM_READ_ERROR, "ROM read error"),
            (BusErrors::RAM_READ_ERROR, "RAM read error"),
            (BusErrors::RAM_WRITE_ERROR, "RAM write error"),
        ] {
            if self.contains(flag) {
                if !first {
                    fmt.write_str(" | ")?;
                }
                fmt.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not open {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input in ROM, line {line}: {text}, starting from {rest}")]
    RomParse {
        line: usize,
        text: String,
        rest: String,
    },
    #[error("ROM image does not fit in {capacity} words")]
    RomTooLarge { capacity: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("halted on {errors} (0x{code:X}) in cycle {cycle}", code = .errors.bits())]
    Halted { cycle: u64, errors: BusErrors },
}
