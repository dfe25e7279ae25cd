use std::path::Path;

use log::*;

use crate::{
    cpu::{Cpu, MemoryWrite},
    error::{BusErrors, Error, Result},
    image,
    instruction::Instruction,
};

/// 32K words of ROM, as on the real machine.
pub const DEFAULT_ROM_SIZE: usize = 32 * 1024;
/// 32K words of RAM. The top of it is the screen and keyboard.
pub const DEFAULT_RAM_SIZE: usize = 32 * 1024;

/// What one clock cycle did, for callers that snoop on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cycle {
    pub errors: BusErrors,
    pub write: MemoryWrite,
}

/// The rest of the Hack computer around the CPU: ROM, RAM and the clock.
/// Devices (screen, keyboard) are left to the host, which reaches them
/// through [`Computer::mmio_get`] and [`Computer::mmio_set`] and by watching
/// the writes reported by [`Computer::step`].
pub struct Computer {
    rom: Vec<u16>,
    ram: Vec<u16>,
    cpu: Cpu,
    cycles: u64,
    /// Next instruction fetch address, as of the last tock.
    pc: u16,
    /// Next data fetch address, as of the last tock.
    a: u16,
}

impl Computer {
    pub fn new(rom_size: usize, ram_size: usize) -> Computer {
        return Computer {
            rom: vec![0; rom_size],
            ram: vec![0; ram_size],
            cpu: Cpu::new(),
            cycles: 0,
            pc: 0,
            a: 0,
        };
    }

    /// Clear the cycle counter and clock the CPU once with reset held. This
    /// is an out-of-band clear, not an executed instruction: it does not
    /// touch memory and does not count as a cycle.
    pub fn reset(&mut self) {
        self.cycles = 0;
        let _ = self.cpu.tick(Instruction(0), 0, true);
        (self.pc, self.a) = self.cpu.tock();
    }

    /// Run one clock cycle. Bus faults never stop the cycle: a bad fetch
    /// reads as 0, a bad write is dropped, and the fault is reported in the
    /// returned flags for the caller to act on.
    pub fn step(&mut self) -> Cycle {
        let mut errors = BusErrors::empty();

        let instruction = match self.rom.get(self.pc as usize) {
            Some(&word) => Instruction(word),
            None => {
                warn!("Invalid instruction read from {:04X}", self.pc);
                errors |= BusErrors::ROM_READ_ERROR;
                Instruction(0)
            }
        };
        let in_m = match self.ram.get(self.a as usize) {
            Some(&word) => word,
            None => {
                warn!("Invalid read from {:04X}", self.a);
                errors |= BusErrors::RAM_READ_ERROR;
                0
            }
        };

        let write = self.cpu.tick(instruction, in_m, false);
        trace!(
            "cycle {} PC {:04X} instruction {:?} A {:04X} inM {:04X}",
            self.cycles,
            self.pc,
            instruction,
            self.a,
            in_m
        );
        if write.enabled {
            match self.ram.get_mut(write.address as usize) {
                Some(cell) => *cell = write.value,
                None => {
                    warn!("Invalid write to {:04X}", write.address);
                    errors |= BusErrors::RAM_WRITE_ERROR;
                }
            }
            trace!(
                "writeM addressM {:04X} outM {:04X}",
                write.address,
                write.value
            );
        }

        (self.pc, self.a) = self.cpu.tock();
        trace!(
            "tock A {:04X} D {:04X} nextPC {:04X}",
            self.a,
            self.cpu.get_d(),
            self.pc
        );
        self.cycles += 1;
        Cycle { errors, write }
    }

    /// Read a RAM word on behalf of a device. Out of range reads as 0.
    pub fn mmio_get(&self, address: u16) -> u16 {
        match self.ram.get(address as usize) {
            Some(&word) => word,
            None => {
                warn!("mmio_get: {address:04X} beyond RAM size");
                0
            }
        }
    }

    /// Write a RAM word on behalf of a device. Out of range is ignored.
    pub fn mmio_set(&mut self, address: u16, value: u16) {
        match self.ram.get_mut(address as usize) {
            Some(cell) => *cell = value,
            None => warn!("mmio_set: {address:04X} beyond RAM size"),
        }
    }

    /// Reset, then run until `max_cycles` cycles have elapsed (0 runs
    /// forever). Unless `ignore_errors` is set, the first bus fault halts the
    /// run with [`Error::Halted`]. On completion RAM is dumped to `ram_dump`.
    pub fn run(
        &mut self,
        max_cycles: u64,
        ignore_errors: bool,
        ram_dump: impl AsRef<Path>,
    ) -> Result<u64> {
        self.reset();
        while max_cycles == 0 || self.cycles < max_cycles {
            let Cycle { errors, .. } = self.step();
            if !errors.is_empty() && !ignore_errors {
                error!("Exiting on error {}", errors.bits());
                return Err(Error::Halted {
                    cycle: self.cycles - 1,
                    errors,
                });
            }
        }
        info!("Completed {} cycles", self.cycles);
        self.dump_ram(ram_dump)?;
        Ok(self.cycles)
    }

    /// Load a ROM image in Hack machine language text. Words past the end of
    /// the program keep their previous contents.
    pub fn load_rom(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        info!("Loading ROM from '{}'", path.display());
        let file = image::open(path)?;
        self.load_rom_from(std::io::BufReader::new(file))
    }

    pub fn load_rom_from<R: std::io::BufRead>(&mut self, reader: R) -> Result<usize> {
        let count = image::parse_rom(reader, &mut self.rom)?;
        debug!("Loaded {count} instructions into ROM");
        Ok(count)
    }

    /// Load RAM from a raw dump of native-endian words. A short file is not
    /// fatal: whatever it holds is loaded and the rest stays as it was.
    pub fn load_ram(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        info!("Loading RAM from '{}'", path.display());
        let file = image::open(path)?;
        let count = self.load_ram_from(file)?;
        if count != self.ram.len() {
            warn!(
                "Read {count} of {} words from {}",
                self.ram.len(),
                path.display()
            );
        }
        Ok(count)
    }

    pub fn load_ram_from<R: std::io::Read>(&mut self, reader: R) -> Result<usize> {
        Ok(image::read_words(reader, &mut self.ram)?)
    }

    pub fn dump_rom(&self, path: impl AsRef<Path>) -> Result<usize> {
        image::dump(path, &self.rom)
    }

    pub fn dump_ram(&self, path: impl AsRef<Path>) -> Result<usize> {
        image::dump(path, &self.ram)
    }

    pub fn get_rom(&self) -> &[u16] {
        &self.rom
    }
    pub fn get_ram(&self) -> &[u16] {
        &self.ram
    }
    pub fn get_cpu(&self) -> &Cpu {
        &self.cpu
    }
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
    /// The address the next cycle fetches its instruction from.
    pub fn next_pc(&self) -> u16 {
        self.pc
    }
    /// The address the next cycle fetches M from.
    pub fn next_a(&self) -> u16 {
        self.a
    }
    pub fn show_cpu_state(&self) -> String {
        format!("cycle {} CPU: {:?}", self.cycles, self.cpu)
    }
}
