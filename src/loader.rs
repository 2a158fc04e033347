//! Loading markup into a parse buffer
//!
//! The parser works in place on a mutable buffer that ends at a NUL
//! byte. These helpers read a whole file or stream and append that
//! terminator.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Read a file into a NUL-terminated buffer
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let size = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let buf = read_terminated(file, size)?;
    tracing::debug!(path = %path.display(), len = buf.len() - 1, "loaded file");
    Ok(buf)
}

/// Read a stream to its end into a NUL-terminated buffer
pub fn load_reader(reader: impl Read) -> Result<Vec<u8>> {
    read_terminated(reader, 0)
}

fn read_terminated(mut reader: impl Read, size_hint: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(size_hint + 1);
    reader.read_to_end(&mut buf)?;
    buf.push(0);
    Ok(buf)
}
