//! Getting words in and out of the machine. ROM images are Hack machine
//! language text; RAM images and dumps are raw native-endian 16-bit words,
//! with no attempt at endian neutrality.

use std::{
    fs::File,
    io::{BufRead, ErrorKind, Read, Write},
    path::Path,
};

use log::*;

use crate::error::{Error, Result};

const WORD_BYTES: usize = std::mem::size_of::<u16>();

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse one line of machine language the way `strtoul(line, .., 2)` would:
/// optional leading whitespace, an optional sign, then binary digits. Returns
/// the word (masked to 16 bits, negated for `-`) and whatever text follows
/// the digits.
fn parse_line(line: &str) -> (u16, &str) {
    let unsigned = line.trim_start_matches([' ', '\t', '\n', '\x0b', '\x0c', '\r']);
    let (negative, digits) = match unsigned.as_bytes().first() {
        Some(b'-') => (true, &unsigned[1..]),
        Some(b'+') => (false, &unsigned[1..]),
        _ => (false, unsigned),
    };
    let end = digits
        .find(|ch: char| ch != '0' && ch != '1')
        .unwrap_or(digits.len());
    if end == 0 {
        // No digits at all: the whole line is left over (an empty line is
        // just 0).
        return (0, line);
    }
    let word = digits[..end]
        .bytes()
        .fold(0u16, |word, bit| (word << 1) | (bit - b'0') as u16);
    let word = if negative { word.wrapping_neg() } else { word };
    (word, &digits[end..])
}

/// Fill `rom` from Hack machine language text, one instruction per line.
/// Returns the number of lines loaded. Any junk in a line aborts the whole
/// load; a program that does not parse must not run.
pub fn parse_rom<R: BufRead>(mut reader: R, rom: &mut [u16]) -> Result<usize> {
    let mut buffer = Vec::new();
    let mut address = 0;
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buffer);
        let line = match text.find(['\r', '\n']) {
            Some(end) => &text[..end],
            None => &text[..],
        };
        let (word, rest) = parse_line(line);
        if !rest.is_empty() {
            return Err(Error::RomParse {
                line: address + 1,
                text: line.to_string(),
                rest: rest.to_string(),
            });
        }
        let Some(cell) = rom.get_mut(address) else {
            return Err(Error::RomTooLarge {
                capacity: rom.len(),
            });
        };
        *cell = word;
        address += 1;
    }
    Ok(address)
}

/// Read as many whole words as `reader` has, up to `words.len()`, into the
/// front of `words`. Returns the count read; the rest of `words` is left
/// alone.
pub fn read_words<R: Read>(mut reader: R, words: &mut [u16]) -> std::io::Result<usize> {
    let mut bytes = vec![0u8; words.len() * WORD_BYTES];
    let mut filled = 0;
    while filled < bytes.len() {
        match reader.read(&mut bytes[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    let count = filled / WORD_BYTES;
    let chunks = bytes[..count * WORD_BYTES].chunks_exact(WORD_BYTES);
    for (word, chunk) in words.iter_mut().zip(chunks) {
        *word = u16::from_ne_bytes([chunk[0], chunk[1]]);
    }
    Ok(count)
}

/// Write `words` to `writer`. Returns how many whole words went out, which
/// is fewer than `words.len()` if the writer stopped accepting data or
/// failed part way. A failure is logged, not returned.
pub fn dump_to<W: Write>(mut writer: W, words: &[u16]) -> usize {
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_ne_bytes()).collect();
    let mut written = 0;
    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("Write failed after {written} bytes: {e}");
                break;
            }
        }
    }
    if let Err(e) = writer.flush() {
        warn!("Flush failed: {e}");
    }
    written / WORD_BYTES
}

/// Dump `words` to a file. A short write is only a warning; only failing to
/// create the file is an error.
pub fn dump(path: impl AsRef<Path>, words: &[u16]) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    // Unbuffered, so the count is what the file actually took.
    let written = dump_to(file, words);
    if written != words.len() {
        warn!(
            "Wrote {written} of {} words to {}",
            words.len(),
            path.display()
        );
    } else {
        debug!("Dumped {written} words to {}", path.display());
    }
    Ok(written)
}
