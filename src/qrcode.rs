//! QR code encoding.
//!
//! Turns text or bytes into a [`QrMatrix`]: version selection, bit packing,
//! Reed–Solomon error correction, function-pattern placement, codeword
//! placement and mask selection, following the QR Code Model 2 standard
//! (versions 1–40, all four error correction levels).

use tracing::debug;

use crate::ecc::{self, Mask, QrCodeEcc, ReedSolomonGenerator, Version};
use crate::error::{QrError, Result};
use crate::segment::{BitBuffer, QrSegment};

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Knobs for [`QrMatrix::encode_segments`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Smallest version to consider.
    pub min_version: Version,
    /// Largest version to consider.
    pub max_version: Version,
    /// Force a mask instead of choosing the lowest-penalty one.
    pub mask: Option<Mask>,
    /// Raise the error correction level while the data still fits in the
    /// chosen version.
    pub boost_ecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            min_version: Version::MIN,
            max_version: Version::MAX,
            mask: None,
            boost_ecl: false,
        }
    }
}

/// A QR Code symbol: a square grid of dark and light modules.
///
/// Instances are immutable once built and own their modules. Encoding is
/// deterministic, so the same payload and level always give an equal matrix.
///
/// # Example
///
/// ```rust
/// use waqr::{QrCodeEcc, QrMatrix};
///
/// let qr = QrMatrix::encode_text("https://wa.me/15551234567", QrCodeEcc::High).unwrap();
/// assert_eq!(qr.version().value(), 4);
/// assert_eq!(qr.size(), 33);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrMatrix {
    version: Version,
    ecl: QrCodeEcc,
    mask: Mask,
    size: i32,
    /// Row-major, `true` is dark.
    modules: Vec<bool>,
}

impl QrMatrix {
    /// Encodes a text string at the given error correction level.
    ///
    /// The mode (numeric, alphanumeric or byte) and the smallest fitting
    /// version are chosen automatically. Fails with
    /// [`QrError::PayloadTooLong`] when version 40 cannot hold the text.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self> {
        let segs = QrSegment::make_segments(text);
        Self::encode_segments(&segs, ecl, &EncodeOptions::default())
    }

    /// Encodes arbitrary bytes in byte mode.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self> {
        let segs = [QrSegment::make_bytes(data)];
        Self::encode_segments(&segs, ecl, &EncodeOptions::default())
    }

    /// Encodes the given segments with explicit options.
    ///
    /// # Panics
    ///
    /// Panics if `options.min_version > options.max_version`.
    pub fn encode_segments(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self> {
        assert!(
            options.min_version <= options.max_version,
            "Invalid version range"
        );

        // Find the minimal version number to use
        let mut version = options.min_version;
        let datausedbits: usize = loop {
            let datacapacitybits = version.num_data_codewords(ecl) * 8;
            let dataused = QrSegment::get_total_bits(segs, version);
            match dataused {
                Some(n) if n <= datacapacitybits => break n,
                _ => {}
            }
            match version.next() {
                Some(next) if version < options.max_version => version = next,
                _ => {
                    let data_bits = dataused.unwrap_or_else(|| {
                        segs.iter().map(|seg| 4 + seg.data().len()).sum()
                    });
                    return Err(QrError::PayloadTooLong {
                        len: segs.iter().map(QrSegment::num_chars).sum(),
                        ecl,
                        data_bits,
                        capacity_bits: datacapacitybits,
                    });
                }
            }
        };

        // Increase the error correction level while the data still fits
        if options.boost_ecl {
            for newecl in [QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
                if newecl > ecl && datausedbits <= version.num_data_codewords(newecl) * 8 {
                    ecl = newecl;
                }
            }
        }

        let datacodewords = Self::pack_data_codewords(segs, version, ecl);
        debug_assert_eq!(datacodewords.len(), version.num_data_codewords(ecl));
        let allcodewords = Self::add_ecc_and_interleave(&datacodewords, version, ecl);

        let mut canvas = Canvas::with_function_patterns(version, ecl);
        canvas.draw_codewords(&allcodewords);

        let mask = match options.mask {
            Some(mask) => mask,
            None => canvas.choose_mask(ecl),
        };
        canvas.apply_mask(mask);
        canvas.draw_format_bits(ecl, mask);

        debug!(
            version = version.value(),
            ecl = ?ecl,
            mask = mask.value(),
            data_bits = datausedbits,
            "encoded QR matrix"
        );

        Ok(Self {
            version,
            ecl,
            mask,
            size: canvas.size,
            modules: canvas.modules,
        })
    }

    /// Concatenates the segments into the data codeword sequence, adding the
    /// terminator, byte alignment and the `0xEC 0x11` pad pattern.
    fn pack_data_codewords(segs: &[QrSegment], version: Version, ecl: QrCodeEcc) -> Vec<u8> {
        let datacapacitybits = version.num_data_codewords(ecl) * 8;
        let mut bb = BitBuffer::new();
        for seg in segs {
            bb.append_bits(seg.mode().mode_bits(), 4);
            // get_total_bits already checked the count fits its field
            bb.append_bits(seg.num_chars() as u32, seg.mode().num_char_count_bits(version));
            bb.extend_from(seg.data());
        }

        // Add terminator and pad up to a byte if applicable
        let numzerobits = (datacapacitybits - bb.len()).min(4);
        bb.append_bits(0, numzerobits as u8);
        let numzerobits = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8);
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xec, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8);
        }
        bb.into_bytes()
    }

    /// Splits the data into blocks, appends each block's EC codewords and
    /// interleaves the result. Short blocks come first.
    fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
        assert_eq!(data.len(), ver.num_data_codewords(ecl));
        let numblocks = ver.num_error_correction_blocks(ecl);
        let blockecclen = ver.ecc_codewords_per_block(ecl);
        let rawcodewords = ver.num_raw_data_modules() / 8;
        let numshortblocks = numblocks - rawcodewords % numblocks;
        let shortblocklen = rawcodewords / numblocks;

        let rs = ReedSolomonGenerator::new(blockecclen);
        let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(numblocks);
        let mut k = 0;
        for i in 0..numblocks {
            let datlen = shortblocklen - blockecclen + usize::from(i >= numshortblocks);
            let mut block = data[k..k + datlen].to_vec();
            k += datlen;
            let ecc = rs.compute_remainder(&block);
            if i < numshortblocks {
                // placeholder keeps every block the same length while interleaving
                block.push(0);
            }
            block.extend_from_slice(&ecc);
            blocks.push(block);
        }

        let mut result = Vec::with_capacity(rawcodewords);
        for i in 0..=shortblocklen {
            for (j, block) in blocks.iter().enumerate() {
                // Skip the placeholder byte in short blocks
                if i != shortblocklen - blockecclen || j >= numshortblocks {
                    result.push(block[i]);
                }
            }
        }
        debug_assert_eq!(result.len(), rawcodewords);
        result
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size in modules, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns the error correction level actually used.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.ecl
    }

    /// Returns the mask committed to this symbol.
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates: `true` for
    /// dark. Coordinates outside the symbol are light.
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        (0..self.size).contains(&x)
            && (0..self.size).contains(&y)
            && self.modules[(y * self.size + x) as usize]
    }

    /// Iterates over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.modules.chunks(self.size as usize)
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&dark| dark).count()
    }

    /// The mask penalty of this symbol as committed, format bits included.
    pub fn penalty_score(&self) -> i32 {
        penalty_score(&self.modules, self.size)
    }
}

/// Mutable working grid used while a symbol is being built.
struct Canvas {
    size: i32,
    modules: Vec<bool>,
    is_function: Vec<bool>,
}

impl Canvas {
    /// A blank grid with finders, separators, timing, alignment, version
    /// information and placeholder format bits already drawn.
    fn with_function_patterns(version: Version, ecl: QrCodeEcc) -> Self {
        let size = version.size();
        let cells = (size * size) as usize;
        let mut canvas = Self {
            size,
            modules: vec![false; cells],
            is_function: vec![false; cells],
        };

        for i in 0..size {
            canvas.set_function_module(6, i, i % 2 == 0);
            canvas.set_function_module(i, 6, i % 2 == 0);
        }

        canvas.draw_finder_pattern(3, 3);
        canvas.draw_finder_pattern(size - 4, 3);
        canvas.draw_finder_pattern(3, size - 4);

        let alignpatpos = version.alignment_pattern_positions();
        let last = alignpatpos.len().saturating_sub(1);
        for (i, &x) in alignpatpos.iter().enumerate() {
            for (j, &y) in alignpatpos.iter().enumerate() {
                // The three corners are taken by finder patterns
                let on_finder = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !on_finder {
                    canvas.draw_alignment_pattern(x, y);
                }
            }
        }

        // Reserve the format areas; real bits are drawn after masking
        canvas.draw_format_bits(ecl, Mask::new(0));
        canvas.draw_version(version);
        canvas
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    fn set_function_module(&mut self, x: i32, y: i32, isdark: bool) {
        let i = self.index(x, y);
        self.modules[i] = isdark;
        self.is_function[i] = true;
    }

    /// 9×9 finder including its separator, clipped at the symbol edge.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        for dy in -4..=4 {
            for dx in -4..=4 {
                let xx = x + dx;
                let yy = y + dy;
                if (0..self.size).contains(&xx) && (0..self.size).contains(&yy) {
                    let dist = dx.abs().max(dy.abs());
                    self.set_function_module(xx, yy, dist != 2 && dist != 4);
                }
            }
        }
    }

    fn draw_alignment_pattern(&mut self, x: i32, y: i32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.set_function_module(x + dx, y + dy, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    fn draw_format_bits(&mut self, ecl: QrCodeEcc, mask: Mask) {
        let bits = ecc::format_bits(ecl, mask);
        let size = self.size;

        // Around the top-left finder
        for i in 0..6 {
            self.set_function_module(8, i, get_bit(bits, i));
        }
        self.set_function_module(8, 7, get_bit(bits, 6));
        self.set_function_module(8, 8, get_bit(bits, 7));
        self.set_function_module(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.set_function_module(14 - i, 8, get_bit(bits, i));
        }

        // Split between the other two finders
        for i in 0..8 {
            self.set_function_module(size - 1 - i, 8, get_bit(bits, i));
        }
        for i in 8..15 {
            self.set_function_module(8, size - 15 + i, get_bit(bits, i));
        }
        self.set_function_module(8, size - 8, true);
    }

    fn draw_version(&mut self, version: Version) {
        if version.value() < 7 {
            return;
        }
        let bits = version.info_bits();
        for i in 0..18 {
            let bit = get_bit(bits, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function_module(a, b, bit);
            self.set_function_module(b, a, bit);
        }
    }

    /// Places codewords in the two-column zigzag, starting bottom-right and
    /// skipping the vertical timing column and every function module.
    fn draw_codewords(&mut self, data: &[u8]) {
        let totalbits = data.len() * 8;
        let mut i: usize = 0;
        let mut right = self.size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..self.size {
                for j in 0..2 {
                    let x = right - j;
                    let y = if upward { self.size - 1 - vert } else { vert };
                    let idx = self.index(x, y);
                    if !self.is_function[idx] && i < totalbits {
                        self.modules[idx] = (data[i >> 3] >> (7 - (i & 7))) & 1 != 0;
                        i += 1;
                    }
                    // Remainder bits stay light
                }
            }
            right -= 2;
        }
        debug_assert_eq!(i, totalbits);
    }

    /// XORs the mask onto the data modules. Applying the same mask twice
    /// restores the grid.
    fn apply_mask(&mut self, mask: Mask) {
        for y in 0..self.size {
            for x in 0..self.size {
                let idx = self.index(x, y);
                if !self.is_function[idx] {
                    self.modules[idx] ^= mask.inverts(x, y);
                }
            }
        }
    }

    /// Tries all eight masks and returns the lowest-penalty one, the lowest
    /// index winning ties. Leaves the grid unmasked.
    fn choose_mask(&mut self, ecl: QrCodeEcc) -> Mask {
        let mut best = Mask::new(0);
        let mut minpenalty = i32::MAX;
        for mask in Mask::all() {
            self.apply_mask(mask);
            self.draw_format_bits(ecl, mask);
            let penalty = penalty_score(&self.modules, self.size);
            debug!(mask = mask.value(), penalty, "mask candidate");
            if penalty < minpenalty {
                best = mask;
                minpenalty = penalty;
            }
            self.apply_mask(mask);
        }
        best
    }
}

/// Scores a grid by the four standard penalty rules.
fn penalty_score(modules: &[bool], size: i32) -> i32 {
    let at = |x: i32, y: i32| modules[(y * size + x) as usize];
    let mut result: i32 = 0;

    // Same-colour runs and finder-like patterns, rows then columns
    for horizontal in [true, false] {
        for a in 0..size {
            let mut runcolor = false;
            let mut runlen: i32 = 0;
            let mut runhistory = FinderPenalty::new(size);
            for b in 0..size {
                let color = if horizontal { at(b, a) } else { at(a, b) };
                if color == runcolor {
                    runlen += 1;
                    if runlen == 5 {
                        result += PENALTY_N1;
                    } else if runlen > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runlen);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = color;
                    runlen = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
        }
    }

    // 2×2 blocks of one colour
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color = at(x, y);
            if color == at(x + 1, y) && color == at(x, y + 1) && color == at(x + 1, y + 1) {
                result += PENALTY_N2;
            }
        }
    }

    // Balance of dark and light modules
    let dark = modules.iter().filter(|&&m| m).count() as i32;
    let total = size * size;
    // Smallest k such that (45-5k)% <= dark/total <= (55+5k)%
    let k = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    result += k * PENALTY_N4;
    result
}

/// Run-length history for spotting 1:1:3:1:1 finder-like patterns with a
/// light border of at least four modules on either side.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            // Treat the light border outside the symbol as part of the first run
            currentrunlength += self.qr_size;
        }
        self.run_history.copy_within(0..6, 1);
        self.run_history[0] = currentrunlength;
    }

    /// 0, 1 or 2 depending on how many sides of the centre run qualify.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

fn get_bit(x: u32, i: i32) -> bool {
    (x >> i) & 1 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const WA_URL: &str = "https://wa.me/15551234567";

    /// Reads the first copy of the format information back out of a matrix.
    fn read_format_bits(qr: &QrMatrix) -> u32 {
        let mut bits = 0u32;
        let mut put = |i: i32, dark: bool| bits |= u32::from(dark) << i;
        for i in 0..6 {
            put(i, qr.get_module(8, i));
        }
        put(6, qr.get_module(8, 7));
        put(7, qr.get_module(8, 8));
        put(8, qr.get_module(7, 8));
        for i in 9..15 {
            put(i, qr.get_module(14 - i, 8));
        }
        bits
    }

    #[test]
    fn test_wa_url_selects_version_4_at_high() {
        let qr = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        assert_eq!(qr.version(), Version::new(4));
        assert_eq!(qr.size(), 33);
        assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
        assert_eq!(qr.rows().count(), 33);
    }

    #[test]
    fn test_version_is_smallest_fitting() {
        let qr = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        let segs = QrSegment::make_segments(WA_URL);
        let smaller = EncodeOptions {
            max_version: Version::new(qr.version().value() - 1),
            ..EncodeOptions::default()
        };
        assert!(matches!(
            QrMatrix::encode_segments(&segs, QrCodeEcc::High, &smaller),
            Err(QrError::PayloadTooLong { .. })
        ));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        let b = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_format_information_matches_level_and_mask() {
        for ecl in QrCodeEcc::ALL {
            let qr = QrMatrix::encode_text("HELLO WORLD", ecl).unwrap();
            assert_eq!(read_format_bits(&qr), ecc::format_bits(ecl, qr.mask()));
        }
    }

    #[test]
    fn test_chosen_mask_has_minimal_penalty() {
        let long_url = "https://wa.me/".to_string() + &"1".repeat(150);
        let payloads = ["15551234567", "HELLO WORLD", WA_URL, long_url.as_str()];
        for text in payloads {
            let segs = QrSegment::make_segments(text);
            for ecl in QrCodeEcc::ALL {
                let auto = QrMatrix::encode_text(text, ecl).unwrap();
                let scores: Vec<i32> = Mask::all()
                    .map(|mask| {
                        let options = EncodeOptions {
                            mask: Some(mask),
                            ..EncodeOptions::default()
                        };
                        QrMatrix::encode_segments(&segs, ecl, &options)
                            .unwrap()
                            .penalty_score()
                    })
                    .collect();
                let min = *scores.iter().min().unwrap();
                assert_eq!(auto.penalty_score(), min, "{text:?} at {ecl:?}");
                let first_min = scores.iter().position(|&s| s == min).unwrap();
                assert_eq!(
                    usize::from(auto.mask().value()),
                    first_min,
                    "{text:?} at {ecl:?}"
                );
            }
        }
    }

    #[test]
    fn test_dark_count_matches_rows() {
        let qr = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        let counted: usize = qr
            .rows()
            .map(|row| row.iter().filter(|&&dark| dark).count())
            .sum();
        assert_eq!(qr.dark_count(), counted);
        assert!(qr.dark_count() > 0);
        assert!(qr.dark_count() < qr.rows().map(<[bool]>::len).sum());
    }

    #[test]
    fn test_forced_mask_is_kept() {
        let segs = QrSegment::make_segments(WA_URL);
        let options = EncodeOptions {
            mask: Some(Mask::new(6)),
            ..EncodeOptions::default()
        };
        let qr = QrMatrix::encode_segments(&segs, QrCodeEcc::Low, &options).unwrap();
        assert_eq!(qr.mask(), Mask::new(6));
    }

    #[test]
    fn test_finder_patterns_and_dark_module() {
        let qr = QrMatrix::encode_text(WA_URL, QrCodeEcc::High).unwrap();
        let size = qr.size();
        for (cx, cy) in [(3, 3), (size - 4, 3), (3, size - 4)] {
            assert!(qr.get_module(cx, cy));
            assert!(qr.get_module(cx - 3, cy - 3));
            assert!(!qr.get_module(cx - 2, cy - 2));
        }
        // Separators are light
        assert!(!qr.get_module(7, 0));
        assert!(!qr.get_module(0, 7));
        assert!(qr.get_module(8, size - 8));
        // Timing pattern alternates
        for i in 8..size - 8 {
            assert_eq!(qr.get_module(6, i), i % 2 == 0);
            assert_eq!(qr.get_module(i, 6), i % 2 == 0);
        }
    }

    #[test]
    fn test_out_of_bounds_is_light() {
        let qr = QrMatrix::encode_text("12345", QrCodeEcc::Low).unwrap();
        assert!(!qr.get_module(-1, 0));
        assert!(!qr.get_module(0, qr.size()));
    }

    #[test]
    fn test_version_information_drawn_from_7() {
        let options = EncodeOptions {
            min_version: Version::new(7),
            ..EncodeOptions::default()
        };
        let qr = QrMatrix::encode_segments(&QrSegment::make_segments("7"), QrCodeEcc::Low, &options)
            .unwrap();
        assert_eq!(qr.version(), Version::new(7));
        let bits = Version::new(7).info_bits();
        for i in 0..18 {
            let a = qr.size() - 11 + i % 3;
            let b = i / 3;
            assert_eq!(qr.get_module(a, b), get_bit(bits, i));
            assert_eq!(qr.get_module(b, a), get_bit(bits, i));
        }
    }

    #[test]
    fn test_payload_too_long() {
        let text = "x".repeat(1300);
        match QrMatrix::encode_text(&text, QrCodeEcc::High) {
            Err(QrError::PayloadTooLong {
                len,
                ecl,
                capacity_bits,
                ..
            }) => {
                assert_eq!(len, 1300);
                assert_eq!(ecl, QrCodeEcc::High);
                assert_eq!(capacity_bits, Version::MAX.num_data_codewords(QrCodeEcc::High) * 8);
            }
            other => panic!("expected PayloadTooLong, got {other:?}"),
        }
        // The same text fits at Low
        assert!(QrMatrix::encode_text(&text, QrCodeEcc::Low).is_ok());
    }

    #[test]
    fn test_boost_ecl() {
        let segs = QrSegment::make_segments("HELLO");
        let options = EncodeOptions {
            boost_ecl: true,
            ..EncodeOptions::default()
        };
        let qr = QrMatrix::encode_segments(&segs, QrCodeEcc::Low, &options).unwrap();
        assert_eq!(qr.version(), Version::MIN);
        assert_eq!(qr.error_correction_level(), QrCodeEcc::High);
    }

    #[test]
    fn test_interleave_two_block_sizes() {
        // 5-Q has two blocks of 15 and two of 16 data codewords.
        let ver = Version::new(5);
        let ecl = QrCodeEcc::Quartile;
        let data: Vec<u8> = (0..ver.num_data_codewords(ecl) as u8).collect();
        let all = QrMatrix::add_ecc_and_interleave(&data, ver, ecl);
        assert_eq!(all.len(), ver.num_raw_data_modules() / 8);
        assert_eq!(&all[..4], &[0, 15, 30, 46]);
        // Last data column only exists in the long blocks
        assert_eq!(&all[60..62], &[45, 61]);
    }

    #[test]
    fn test_pad_bytes_alternate() {
        let segs = QrSegment::make_segments("1");
        let codewords = QrMatrix::pack_data_codewords(&segs, Version::new(1), QrCodeEcc::Low);
        assert_eq!(codewords.len(), 19);
        // mode 0001, count 0000000001, data 0001, terminator 0000 -> 3 bytes
        assert_eq!(&codewords[..3], &[0x10, 0x04, 0x40]);
        assert_eq!(&codewords[3..7], &[0xec, 0x11, 0xec, 0x11]);
    }
}
