//! Bi-level run-length codec
//!
//! Packs a row-major sequence of on/off pixels into single-byte runs:
//! bit 7 carries the run color (set = ink), bits 0-6 carry the run
//! length (1-127). Runs longer than 127 pixels are split into
//! consecutive bytes of the same color.

/// Longest run a single byte can describe.
const MAX_RUN: u8 = 127;

/// Color flag, set on runs of ink pixels.
const INK_BIT: u8 = 0x80;

/// Encode a pixel sequence into RLE bytes.
///
/// Single left-to-right pass. An empty input produces an empty output;
/// a uniform input of length L produces exactly ceil(L/127) bytes.
pub fn encode(bits: &[bool]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut cur = false;
    let mut count: u8 = 0;

    fn flush(out: &mut Vec<u8>, color: bool, count: u8) {
        if count == 0 {
            return;
        }
        debug_assert!(count <= MAX_RUN, "run length {} exceeds 7 bits", count);
        out.push(if color { count | INK_BIT } else { count });
    }

    for &b in bits {
        if b == cur {
            count += 1;
        }
        if count == MAX_RUN || b != cur {
            flush(&mut out, cur, count);
            // A full run continues under the same color with nothing
            // pending; a color change starts the new run at the pixel
            // that triggered it.
            count = if b == cur { 0 } else { 1 };
            cur = b;
        }
    }
    flush(&mut out, cur, count);

    out
}

/// Expand RLE bytes back into the pixel sequence.
///
/// Exact inverse of [`encode`]: each byte contributes `byte & 0x7f`
/// copies of its color bit.
pub fn decode(bytes: &[u8]) -> Vec<bool> {
    let mut out = Vec::new();
    for &byte in bytes {
        let ink = byte & INK_BIT != 0;
        let len = (byte & MAX_RUN) as usize;
        out.extend(std::iter::repeat(ink).take(len));
    }
    out
}
