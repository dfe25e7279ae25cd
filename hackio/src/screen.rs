use std::{fs::File, io::Write, path::Path};

use anyhow::Context;
use hackcpu::Computer;

use crate::config::HostConfig;

const WHITE: u32 = 0xFFFF_FFFF;
const BLACK: u32 = 0xFF00_0000;
const BITS_PER_WORD: u32 = 16;

/// The display, kept in step with the framebuffer region of RAM by watching
/// the CPU's writes. Each word is 16 pixels of one row; bit 0 is leftmost,
/// and a set bit is black.
pub struct Screen {
    width: u32,
    height: u32,
    base: u16,
    pixels: Vec<u32>,
    dirty: bool,
}

impl Screen {
    pub fn new(config: &HostConfig) -> Screen {
        Screen {
            width: config.width,
            height: config.height,
            base: config.screen_base,
            pixels: vec![WHITE; (config.width * config.height) as usize],
            dirty: true,
        }
    }

    fn words_per_row(&self) -> u32 {
        self.width / BITS_PER_WORD
    }

    /// Size of the framebuffer region, in words.
    pub fn words(&self) -> u32 {
        self.words_per_row() * self.height
    }

    pub fn contains(&self, address: u16) -> bool {
        let address = address as u32;
        let base = self.base as u32;
        address >= base && address < base + self.words()
    }

    /// Mirror one RAM write. Returns whether it landed on the screen.
    pub fn mirror_write(&mut self, address: u16, value: u16) -> bool {
        if !self.contains(address) {
            return false;
        }
        let offset = (address - self.base) as u32;
        let row = offset / self.words_per_row();
        let column = (offset % self.words_per_row()) * BITS_PER_WORD;
        let start = (row * self.width + column) as usize;
        for (bit, pixel) in self.pixels[start..start + BITS_PER_WORD as usize]
            .iter_mut()
            .enumerate()
        {
            *pixel = if value & (1 << bit) != 0 { BLACK } else { WHITE };
        }
        self.dirty = true;
        true
    }

    /// Redraw everything from RAM, e.g. after loading an initial RAM image.
    pub fn refresh_from(&mut self, computer: &Computer) {
        for offset in 0..self.words() {
            let address = self.base + offset as u16;
            self.mirror_write(address, computer.mmio_get(address));
        }
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// ARGB8888 pixels for an SDL streaming texture.
    pub fn to_argb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| pixel.to_ne_bytes())
            .collect()
    }

    pub fn pitch(&self) -> usize {
        std::mem::size_of::<u32>() * self.width as usize
    }

    pub fn get_width(&self) -> u32 {
        self.width
    }

    pub fn get_height(&self) -> u32 {
        self.height
    }

    /// Encode the display as an 8-bit grayscale PNG.
    pub fn write_png<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .context("Unable to write PNG header")?;
        let gray: Vec<u8> = self
            .pixels
            .iter()
            .map(|&pixel| if pixel == BLACK { 0x00 } else { 0xFF })
            .collect();
        writer
            .write_image_data(&gray)
            .context("Unable to write PNG image data")?;
        writer.finish().context("Unable to finish PNG")?;
        Ok(())
    }

    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Could not create screenshot {}", path.display()))?;
        self.write_png(std::io::BufWriter::new(file))
    }
}
