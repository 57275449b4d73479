//! Framing of the raw logger byte stream
//!
//! The logger writes fixed 16-byte frames, each starting with the
//! synchronization marker `FE 6B 28 40`. A frame is two big-endian `u32`
//! words followed by four big-endian `u16` payload words; the first word is
//! the marker itself.

use tracing::debug;

/// Synchronization marker opening every frame
pub const SYNC: [u8; 4] = [0xfe, 0x6b, 0x28, 0x40];

/// Length of one frame in bytes, marker included
pub const FRAME_LEN: usize = 16;

/// One 16-byte telemetry frame as found in the stream
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct RawFrame([u8; FRAME_LEN]);

/// A slice handed to [`RawFrame::try_from`] was not exactly one frame long
#[derive(Clone, Copy, Eq, PartialEq, Debug, thiserror::Error)]
#[error("frame must be 16 bytes, got {0}")]
pub struct FrameLengthError(pub usize);

impl RawFrame {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    /// Assemble a frame from its words, as the logger lays them out
    pub fn from_words(word0: u32, word1: u32, payload: [u16; 4]) -> Self {
        let mut b = [0u8; FRAME_LEN];
        b[0..4].copy_from_slice(&word0.to_be_bytes());
        b[4..8].copy_from_slice(&word1.to_be_bytes());
        for (i, p) in payload.iter().enumerate() {
            b[8 + 2 * i..10 + 2 * i].copy_from_slice(&p.to_be_bytes());
        }
        RawFrame(b)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// First 32-bit word (the sync marker for scanned frames)
    #[inline]
    pub fn word0(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Second 32-bit word: flag bits and timestamp
    #[inline]
    pub fn word1(&self) -> u32 {
        u32::from_be_bytes([self.0[4], self.0[5], self.0[6], self.0[7]])
    }

    /// Payload word `i` in `0..4`
    #[inline]
    pub fn payload(&self, i: usize) -> u16 {
        let o = 8 + 2 * i;
        u16::from_be_bytes([self.0[o], self.0[o + 1]])
    }

    /// All four payload words
    pub fn payloads(&self) -> [u16; 4] {
        [self.payload(0), self.payload(1), self.payload(2), self.payload(3)]
    }
}

impl TryFrom<&[u8]> for RawFrame {
    type Error = FrameLengthError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let b = <[u8; FRAME_LEN]>::try_from(bytes)
            .map_err(|_| FrameLengthError(bytes.len()))?;
        Ok(RawFrame(b))
    }
}

/// Iterator over the frames of a byte buffer.
///
/// Misaligned or corrupted regions are skipped a byte at a time until the
/// marker is found again; the number of bytes skipped so far is available
/// from [`Frames::skipped`]. A clone continues independently from the same
/// cursor; call [`frames`] again to rescan from the start.
#[derive(Clone, Debug)]
pub struct Frames<'a> {
    buf: &'a [u8],
    cursor: usize,
    skipped: usize,
}

/// Scan `buf` for frames
pub fn frames(buf: &[u8]) -> Frames<'_> {
    Frames { buf, cursor: 0, skipped: 0 }
}

impl<'a> Frames<'a> {
    /// Bytes passed over without finding a marker
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Current position in the buffer
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = RawFrame;

    fn next(&mut self) -> Option<RawFrame> {
        while self.buf.len() - self.cursor >= FRAME_LEN {
            let window = &self.buf[self.cursor..self.cursor + FRAME_LEN];
            if window[..SYNC.len()] == SYNC {
                self.cursor += FRAME_LEN;
                let mut b = [0u8; FRAME_LEN];
                b.copy_from_slice(window);
                return Some(RawFrame(b));
            }
            self.cursor += 1;
            self.skipped += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some((self.buf.len() - self.cursor) / FRAME_LEN))
    }
}

/// Collect all frames of `buf` in scan order
pub fn scan(buf: &[u8]) -> Vec<RawFrame> {
    let mut it = frames(buf);
    let v: Vec<RawFrame> = it.by_ref().collect();
    debug!(
        "scanned {} bytes: {} frames, {} bytes skipped",
        buf.len(),
        v.len(),
        it.skipped(),
    );
    v
}
