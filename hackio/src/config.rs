use std::time::Duration;

/// Hack screen: 512x256, one bit per pixel.
pub const SCREEN_WIDTH: u32 = 512;
pub const SCREEN_HEIGHT: u32 = 256;
/// Framebuffer address.
pub const SCREEN_BASE: u16 = 16384;
/// Keyboard address.
pub const KEYBOARD: u16 = 24576;

/// Everything the host needs to know about pacing and devices. Built once
/// from the command line and handed to [`crate::host::Host::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// How often to present the screen and poll for input.
    pub fps: u32,
    /// Thousands of instructions per second. 0 runs as fast as possible.
    pub kips: u32,
    pub width: u32,
    pub height: u32,
    pub screen_base: u16,
    pub keyboard: u16,
    /// Stop after this many cycles. 0 keeps running until the window closes.
    pub max_cycles: u64,
    /// Keep running after a bus error.
    pub ignore_errors: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            fps: 60,
            kips: 2000, // about 2 MHz, otherwise it is _too_ fast
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            screen_base: SCREEN_BASE,
            keyboard: KEYBOARD,
            max_cycles: 0,
            ignore_errors: false,
        }
    }
}

impl HostConfig {
    /// Set the instruction rate from a speed in MHz.
    pub fn with_speed_mhz(mut self, mhz: f64) -> Self {
        self.kips = (mhz * 1000.0).max(0.0) as u32;
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// How many cycles should have run after `elapsed`, or `None` when the
    /// CPU is not paced at all.
    pub fn cycles_due(&self, elapsed: Duration) -> Option<u64> {
        if self.kips == 0 {
            return None;
        }
        Some((elapsed.as_micros() * self.kips as u128 / 1000) as u64)
    }

    pub fn max_cycles_reached(&self, cycles: u64) -> bool {
        self.max_cycles != 0 && cycles >= self.max_cycles
    }
}
