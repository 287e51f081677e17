//! Data segments and the bit stream they are packed into.

use crate::ecc::Version;

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub(crate) fn mode_bits(self) -> u32 {
        match self {
            Self::Numeric => 0x1,
            Self::Alphanumeric => 0x2,
            Self::Byte => 0x4,
        }
    }

    /// Width of the character count field for the given version.
    pub(crate) fn num_char_count_bits(self, ver: Version) -> u8 {
        let widths: [u8; 3] = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
        };
        widths[usize::from((ver.value() + 7) / 17)]
    }
}

/// A growable sequence of bits, packed big-endian into bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant first.
    ///
    /// # Panics
    ///
    /// Panics if `len > 31` or `val` has bits set above `len`.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        for i in (0..len).rev() {
            let shift = 7 - (self.length & 7);
            if shift == 7 {
                self.data.push(0);
            }
            let bit = ((val >> i) & 1) as u8;
            if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    /// Bit at `index`, counting from the first appended bit.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.length, "Bit index out of range");
        (self.data[index >> 3] >> (7 - (index & 7))) & 1 != 0
    }

    /// Appends every bit of `other`.
    pub fn extend_from(&mut self, other: &BitBuffer) {
        for i in 0..other.len() {
            self.append_bits(u32::from(other.get(i)), 1);
        }
    }

    /// The packed bytes; the final byte is zero-padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// A segment of data in a QR code: a mode, a character count and the
/// already-packed payload bits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: BitBuffer,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        Self::new(QrSegmentMode::Byte, data.len(), bb)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains non-digit characters.
    pub fn make_numeric(text: &str) -> Self {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            assert!(b.is_ascii_digit(), "String contains non-numeric characters");
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Self::new(QrSegmentMode::Numeric, text.len(), bb)
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Panics
    ///
    /// Panics if `text` contains characters outside that set.
    pub fn make_alphanumeric(text: &str) -> Self {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let index = ALPHANUMERIC_CHARSET
                .find(c)
                .expect("String contains unencodable characters in alphanumeric mode");
            accumdata = accumdata * 45 + index as u32;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Self::new(QrSegmentMode::Alphanumeric, text.len(), bb)
    }

    /// Picks the densest single mode that can represent `text`.
    /// An empty string produces no segments.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            Vec::new()
        } else if Self::is_numeric(text) {
            vec![Self::make_numeric(text)]
        } else if Self::is_alphanumeric(text) {
            vec![Self::make_alphanumeric(text)]
        } else {
            vec![Self::make_bytes(text.as_bytes())]
        }
    }

    fn new(mode: QrSegmentMode, numchars: usize, data: BitBuffer) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    pub(crate) fn data(&self) -> &BitBuffer {
        &self.data
    }

    /// Bits needed to encode `segs` at `version`, or `None` when a character
    /// count overflows its field.
    pub(crate) fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.data.len())?;
        }
        Some(result)
    }

    pub fn is_numeric(text: &str) -> bool {
        text.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}
