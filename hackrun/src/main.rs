use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use hackcpu::{Computer, DEFAULT_RAM_SIZE, DEFAULT_ROM_SIZE};
use log::*;

/// Run a Hack machine language program without any I/O devices, then dump
/// the final RAM.
#[derive(Parser, Debug)]
#[command(name = "hackrun")]
struct Args {
    /// Number of clock cycles to run. 0 runs indefinitely.
    #[arg(short = 'c', long, default_value_t = 0)]
    max_cycles: u64,

    /// Binary dump file to be loaded into RAM before starting the computer.
    #[arg(short = 'r', long, value_name = "PATH")]
    initial_ram: Option<PathBuf>,

    /// Trace every cycle.
    #[arg(short, long)]
    debug: bool,

    /// Ignore (memory) errors and continue.
    #[arg(short, long)]
    ignore_errors: bool,

    /// Where to echo the loaded ROM.
    #[arg(long, value_name = "PATH", default_value = "rom.dump")]
    rom_dump: PathBuf,

    /// Where to dump RAM once the run completes.
    #[arg(long, value_name = "PATH", default_value = "ram.dump")]
    ram_dump: PathBuf,

    /// Hack machine language file.
    rom: PathBuf,
}

// Exit statuses; clap itself exits with 2 on usage errors.
const EXIT_HALTED: u8 = 1;
const EXIT_LOAD_FAILED: u8 = 2;

fn run(args: &Args) -> anyhow::Result<u64> {
    let mut computer = Computer::new(DEFAULT_ROM_SIZE, DEFAULT_RAM_SIZE);
    computer
        .load_rom(&args.rom)
        .context("Unable to load the ROM")?;
    computer
        .dump_rom(&args.rom_dump)
        .context("Unable to echo the ROM")?;
    if let Some(initial_ram) = &args.initial_ram {
        computer
            .load_ram(initial_ram)
            .context("Unable to load the initial RAM")?;
    }
    let cycles = computer.run(args.max_cycles, args.ignore_errors, &args.ram_dump)?;
    debug!("{}", computer.show_cpu_state());
    Ok(cycles)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "trace" } else { "info" }),
    )
    .init();
    match run(&args) {
        Ok(cycles) => {
            info!("Ran {cycles} cycles, RAM dumped to {}", args.ram_dump.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            error!("{error:#}");
            match error.downcast_ref::<hackcpu::Error>() {
                Some(hackcpu::Error::Halted { .. }) => ExitCode::from(EXIT_HALTED),
                _ => ExitCode::from(EXIT_LOAD_FAILED),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags() {
        let args =
            Args::try_parse_from(["hackrun", "-c", "500", "-r", "init.ram", "-d", "-i", "prog.hack"])
                .unwrap();
        assert_eq!(args.max_cycles, 500);
        assert_eq!(args.initial_ram, Some(PathBuf::from("init.ram")));
        assert!(args.debug);
        assert!(args.ignore_errors);
        assert_eq!(args.rom, PathBuf::from("prog.hack"));
        assert_eq!(args.ram_dump, PathBuf::from("ram.dump"));
        assert_eq!(args.rom_dump, PathBuf::from("rom.dump"));
    }

    #[test]
    fn rom_is_required() {
        assert!(Args::try_parse_from(["hackrun", "-c", "5"]).is_err());
        assert!(Args::try_parse_from(["hackrun", "a.hack", "b.hack"]).is_err());
    }

    #[test]
    fn halted_run_is_distinguishable() {
        let dir = std::env::temp_dir();
        let rom = dir.join(format!("hackrun-{}-halt.hack", std::process::id()));
        // @32767, A=A+1: the third cycle reads M from one past the end of RAM
        std::fs::write(&rom, "0111111111111111\n1110110111100000\n").unwrap();
        let args = Args {
            max_cycles: 4,
            initial_ram: None,
            debug: false,
            ignore_errors: false,
            rom_dump: dir.join(format!("hackrun-{}-halt.rom.dump", std::process::id())),
            ram_dump: dir.join(format!("hackrun-{}-halt.ram.dump", std::process::id())),
            rom: rom.clone(),
        };
        let error = run(&args).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<hackcpu::Error>(),
            Some(hackcpu::Error::Halted { cycle: 2, .. })
        ));
        std::fs::remove_file(&rom).unwrap();
        std::fs::remove_file(&args.rom_dump).unwrap();
    }
}
