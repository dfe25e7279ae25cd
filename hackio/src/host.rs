use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use hackcpu::{BusErrors, Computer, Cycle};
use log::*;
use sdl2::{pixels::PixelFormatEnum, render::TextureAccess};

use crate::{config::HostConfig, keymap::keymap, screen::Screen};

/// When running unpaced, how many cycles to run between checks of the clock.
const UNPACED_BATCH: u64 = 10_000;
/// Never run more than this many cycles without looking at the window, even
/// when far behind schedule.
const MAX_BATCH: u64 = 200_000;

/// Why the host stopped clocking the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    MaxCycles,
    BusError(BusErrors),
    WindowClosed,
}

/// The interactive Hack computer: drives the clock, mirrors the framebuffer
/// into a window and feeds the keyboard register.
pub struct Host {
    config: HostConfig,
    screen: Screen,
}

impl Host {
    pub fn new(config: HostConfig) -> Host {
        let screen = Screen::new(&config);
        Host { config, screen }
    }

    pub fn get_screen(&self) -> &Screen {
        &self.screen
    }

    /// Run up to `count` cycles, mirroring screen writes as they happen.
    /// Stops early on a bus error (unless errors are ignored) or once the
    /// configured cycle limit is reached.
    pub fn run_cycles(&mut self, computer: &mut Computer, count: u64) -> Option<Stop> {
        for _ in 0..count {
            if self.config.max_cycles_reached(computer.cycles()) {
                return Some(Stop::MaxCycles);
            }
            let Cycle { errors, write } = computer.step();
            if !errors.is_empty() && !self.config.ignore_errors {
                error!("Exiting after error {}", errors.bits());
                return Some(Stop::BusError(errors));
            }
            if write.enabled {
                self.screen.mirror_write(write.address, write.value);
            }
        }
        if self.config.max_cycles_reached(computer.cycles()) {
            return Some(Stop::MaxCycles);
        }
        None
    }

    pub fn key_down(&self, computer: &mut Computer, keycode: sdl2::keyboard::Keycode) {
        computer.mmio_set(self.config.keyboard, keymap(keycode));
    }

    pub fn key_up(&self, computer: &mut Computer) {
        computer.mmio_set(self.config.keyboard, 0);
    }

    /// Reset the computer and run it in a window until it stops.
    pub fn run(&mut self, computer: &mut Computer) -> anyhow::Result<Stop> {
        let sdl = sdl2::init().map_err(|e| anyhow!("Unable to initialize SDL: {e}"))?;
        let video = sdl
            .video()
            .map_err(|e| anyhow!("Unable to initialize SDL video: {e}"))?;
        let mut event_pump = sdl
            .event_pump()
            .map_err(|e| anyhow!("Couldn't get an event pump: {e}"))?;
        let window = video
            .window("hackio", self.screen.get_width(), self.screen.get_height())
            .allow_highdpi()
            .build()
            .context("Couldn't make an SDL window")?;
        let mut canvas = window
            .into_canvas()
            .build()
            .context("Couldn't make an SDL canvas")?;
        let texture_creator = canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture(
                PixelFormatEnum::ARGB8888,
                TextureAccess::Streaming,
                self.screen.get_width(),
                self.screen.get_height(),
            )
            .context("Could not create a native size texture")?;

        computer.reset();
        self.screen.refresh_from(computer);

        let frame_interval = self.config.frame_interval();
        let begin = Instant::now();
        let mut last_frame = begin;
        let stop = 'running: loop {
            let now = Instant::now();
            let count = match self.config.cycles_due(now - begin) {
                Some(due) => due.saturating_sub(computer.cycles()).min(MAX_BATCH),
                None => UNPACED_BATCH,
            };
            if let Some(stop) = self.run_cycles(computer, count) {
                break 'running stop;
            }
            if now - last_frame < frame_interval {
                if count == 0 {
                    std::thread::sleep(Duration::from_micros(500));
                }
                continue;
            }
            ///////////////////////////////////////////////////////////////////
            // Draw the screen
            ///////////////////////////////////////////////////////////////////
            if self.screen.take_dirty() {
                texture
                    .update(None, &self.screen.to_argb_bytes(), self.screen.pitch())
                    .context("Could not update the native texture with raw pixel data")?;
                canvas
                    .copy(&texture, None, None)
                    .map_err(|e| anyhow!("Could not copy native texture to window: {e}"))?;
                canvas.present();
            }
            ///////////////////////////////////////////////////////////////////
            // Keyboard and window events
            ///////////////////////////////////////////////////////////////////
            for event in event_pump.poll_iter() {
                use sdl2::event::Event;
                match event {
                    Event::Quit { .. } => break 'running Stop::WindowClosed,
                    Event::KeyDown {
                        keycode: Some(keycode),
                        ..
                    } => self.key_down(computer, keycode),
                    Event::KeyUp { .. } => self.key_up(computer),
                    _ => {}
                }
            }
            trace!("{}", computer.show_cpu_state());
            last_frame = now;
        };

        let elapsed = begin.elapsed().as_secs_f64();
        info!(
            "{} cycles {:.3} MIPS",
            computer.cycles(),
            computer.cycles() as f64 / 1_000_000.0 / elapsed
        );
        Ok(stop)
    }
}
