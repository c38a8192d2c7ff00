use super::marker::{Marker, SegmentKind, is_restart_code};

/// Values above this threshold have a `0xFF` top byte and a nonzero low
/// byte: a real marker, as opposed to a stuffed `FF 00` pair inside
/// entropy-coded data.
const MARKER_THRESHOLD: u16 = 0xFF00;

/// Decode the 16-bit big-endian value at `pos`, or `None` if fewer than two
/// bytes remain there. JPEG stores markers and length fields big-endian
/// regardless of host byte order.
pub(crate) fn read_u16be(data: &[u8], pos: usize) -> Option<u16> {
    let bytes = data.get(pos..pos + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Errors raised while scanning a JPEG segment stream.
///
/// Each one is fatal for the file being scanned: the stream cannot be
/// reliably resynchronized past a malformed or unrecognized segment, so the
/// scan fails closed and the caller leaves the file untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// Marker code outside the recognized set.
    #[error("unsupported marker 0x{code:04X} at offset {offset}")]
    UnsupportedMarker { code: u16, offset: usize },

    /// A length field is missing, or the declared length runs past the end
    /// of the buffer.
    #[error("truncated {marker} segment at offset {offset}: needs {needed} bytes, {available} remain")]
    Truncated {
        marker: Marker,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A declared length smaller than the two length bytes it must cover.
    #[error("invalid {marker} segment length {length} at offset {offset}")]
    InvalidLength {
        marker: Marker,
        offset: usize,
        length: u16,
    },
}

/// One segment of the stream: a decoded marker and the byte span
/// `[start, end)` it occupies in the scanned buffer (marker bytes included;
/// for scan segments the span runs to the end of the entropy-coded data).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub marker: Marker,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// Total bytes this segment spans, marker included.
    pub fn byte_len(&self) -> usize {
        self.end - self.start
    }

    /// The segment's bytes within the buffer it was scanned from.
    pub fn bytes<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.start..self.end]
    }

    /// The bytes after the marker and length field. Empty for standalone
    /// markers and zero-length payloads; for scan segments this covers the
    /// scan header body plus the entropy-coded run.
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        if self.byte_len() <= 4 {
            &[]
        } else {
            &data[self.start + 4..self.end]
        }
    }
}

/// Lazy segment iterator over a JPEG byte buffer.
///
/// Yields one [`Segment`] at a time, advancing a cursor by exactly each
/// segment's span. Iteration ends after the EOI segment, when fewer than two
/// bytes remain (a final lone byte cannot form a marker), or after the first
/// error; an error exhausts the iterator.
///
/// ```
/// use exif_strip::jpeg::{Marker, SegmentScanner};
///
/// let data = [0xFF, 0xD8, 0xFF, 0xD9];
/// let segments: Vec<_> = SegmentScanner::new(&data)
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[1].marker, Marker::Eoi);
/// ```
#[derive(Debug)]
pub struct SegmentScanner<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> SegmentScanner<'a> {
    /// Start a scan at the beginning of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            done: false,
        }
    }

    fn next_segment(&mut self) -> Result<Option<Segment>, ScanError> {
        let start = self.pos;
        let Some(code) = read_u16be(self.data, start) else {
            return Ok(None);
        };
        let marker = Marker::from_code(code).ok_or(ScanError::UnsupportedMarker {
            code,
            offset: start,
        })?;

        let end = match marker.kind() {
            SegmentKind::Standalone => start + 2,
            SegmentKind::Payload | SegmentKind::ExifCandidate => {
                self.length_prefixed_end(marker, start)?
            }
            SegmentKind::Scan => {
                let header_end = self.length_prefixed_end(marker, start)?;
                self.entropy_run_end(header_end)
            }
        };

        self.pos = end;
        if marker == Marker::Eoi {
            self.done = true;
        }
        Ok(Some(Segment { marker, start, end }))
    }

    /// End offset of a length-prefixed segment starting at `start`. The
    /// declared length includes the two length bytes, so the span is
    /// `2 + length`. Fails closed on a missing length field, a length that
    /// cannot cover itself, or a length past the end of the buffer.
    fn length_prefixed_end(&self, marker: Marker, start: usize) -> Result<usize, ScanError> {
        let Some(length) = read_u16be(self.data, start + 2) else {
            return Err(ScanError::Truncated {
                marker,
                offset: start,
                needed: 4,
                available: self.data.len() - start,
            });
        };
        if length < 2 {
            return Err(ScanError::InvalidLength {
                marker,
                offset: start,
                length,
            });
        }
        let needed = 2 + usize::from(length);
        if start + needed > self.data.len() {
            return Err(ScanError::Truncated {
                marker,
                offset: start,
                needed,
                available: self.data.len() - start,
            });
        }
        Ok(start + needed)
    }

    /// Advance through entropy-coded data starting at `pos` and return the
    /// offset of the next real marker, or the end of the buffer if none
    /// appears. Stuffed `FF 00` pairs fail the threshold test and restart
    /// markers are resync points, so both are consumed as data.
    fn entropy_run_end(&self, mut pos: usize) -> usize {
        while pos < self.data.len() {
            if let Some(candidate) = read_u16be(self.data, pos) {
                if candidate > MARKER_THRESHOLD && !is_restart_code(candidate) {
                    break;
                }
            }
            pos += 1;
        }
        pos
    }
}

impl Iterator for SegmentScanner<'_> {
    type Item = Result<Segment, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_segment() {
            Ok(Some(segment)) => Some(Ok(segment)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
