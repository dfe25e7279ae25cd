use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use hackcpu::{Computer, DEFAULT_RAM_SIZE, DEFAULT_ROM_SIZE};
use log::*;

mod config;
use config::HostConfig;
mod host;
use host::{Host, Stop};
mod keymap;
mod screen;

/// Run a Hack machine language program with a screen and keyboard.
#[derive(Parser, Debug)]
#[command(name = "hackio")]
struct Args {
    /// Number of clock cycles to run. 0 runs until the window is closed.
    #[arg(short = 'c', long, default_value_t = 0)]
    max_cycles: u64,

    /// Binary dump file to be loaded into RAM before starting the computer.
    #[arg(short = 'r', long, value_name = "PATH")]
    initial_ram: Option<PathBuf>,

    /// Approximate CPU speed in MHz. 0 runs as fast as possible.
    #[arg(short = 's', long, value_name = "MHZ", default_value_t = 2.0)]
    speed: f64,

    /// Screen refreshes (and keyboard polls) per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Trace every cycle.
    #[arg(short, long)]
    debug: bool,

    /// Ignore (memory) errors and continue.
    #[arg(short, long)]
    ignore_errors: bool,

    /// Where to echo the loaded ROM.
    #[arg(long, value_name = "PATH", default_value = "rom.dump")]
    rom_dump: PathBuf,

    /// Save the final screen as a PNG.
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,

    /// Hack machine language file.
    rom: PathBuf,
}

impl Args {
    fn host_config(&self) -> HostConfig {
        HostConfig {
            fps: self.fps,
            max_cycles: self.max_cycles,
            ignore_errors: self.ignore_errors,
            ..HostConfig::default()
        }
        .with_speed_mhz(self.speed)
    }
}

fn load(args: &Args) -> anyhow::Result<Computer> {
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
    Ok(computer)
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.debug { "trace" } else { "info" }),
    )
    .init();

    let mut computer = match load(&args) {
        Ok(computer) => computer,
        Err(error) => {
            error!("{error:#}");
            return ExitCode::from(2);
        }
    };
    let mut host = Host::new(args.host_config());
    let stop = match host.run(&mut computer) {
        Ok(stop) => stop,
        Err(error) => {
            error!("{error:#}");
            return ExitCode::FAILURE;
        }
    };
    info!("Stopped: {stop:?}");
    if let Some(path) = &args.screenshot {
        if let Err(error) = host.get_screen().save_png(path) {
            error!("{error:#}");
            return ExitCode::from(2);
        }
        info!("Saved screenshot to {}", path.display());
    }
    match stop {
        Stop::BusError(_) => ExitCode::FAILURE,
        Stop::MaxCycles | Stop::WindowClosed => ExitCode::SUCCESS,
    }
}
