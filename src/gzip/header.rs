use crate::bits::BitSink;

/// Gzip magic bytes and compression method (RFC 1952)
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const CM_DEFLATE: u8 = 8;

/// Gzip header flags (RFC 1952)
const FNAME: u8 = 1 << 3;

/// OS identifier for Unix
pub const OS_UNIX: u8 = 3;

/// Gzip member header (RFC 1952)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
    /// Original file name, written Latin-1 and NUL-terminated
    pub filename: Option<String>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self { mtime: 0, extra_flags: 0, os: OS_UNIX, filename: None }
    }
}

impl GzipHeader {
    pub fn flags(&self) -> u8 {
        if self.filename.is_some() {
            FNAME
        } else {
            0
        }
    }

    /// Serialize the header: 10 fixed bytes, then the optional file name
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(10);
        out.extend_from_slice(&GZIP_MAGIC);
        out.push(CM_DEFLATE);
        out.push(self.flags());
        out.extend_from_slice(&self.mtime.to_le_bytes());
        out.push(self.extra_flags);
        out.push(self.os);

        if let Some(name) = &self.filename {
            out.extend(latin1_bytes(name));
            out.push(0);
        }
        out
    }

    /// Write the header onto a byte-aligned sink
    pub fn write_to<S: BitSink + ?Sized>(&self, sink: &mut S) {
        sink.write_bytes(&self.to_bytes());
    }
}

/// Gzip trailer (8 bytes at end of member)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipTrailer {
    pub crc32: u32,
    /// Uncompressed length modulo 2^32
    pub isize: u32,
}

impl GzipTrailer {
    pub fn new(crc32: u32, input_len: u64) -> Self {
        Self { crc32, isize: input_len as u32 }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.crc32.to_le_bytes());
        out[4..].copy_from_slice(&self.isize.to_le_bytes());
        out
    }

    /// Write the trailer onto a sink already aligned to a byte boundary
    pub fn write_to<S: BitSink + ?Sized>(&self, sink: &mut S) {
        sink.write_bytes(&self.to_bytes());
    }
}

/// Gzip names are ISO-8859-1; characters outside it and embedded NULs become '?'
fn latin1_bytes(name: &str) -> impl Iterator<Item = u8> + '_ {
    name.chars().map(|c| match c as u32 {
        0 => b'?',
        code @ 1..=0xff => code as u8,
        _ => b'?',
    })
}
