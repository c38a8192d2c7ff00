use std::fmt;

// Marker codes from ITU-T T.81. Restart and application markers are
// contiguous families of 8 and 16 codes.
const SOI: u16 = 0xFFD8;
const EOI: u16 = 0xFFD9;
const SOF0: u16 = 0xFFC0;
const SOF2: u16 = 0xFFC2;
const DHT: u16 = 0xFFC4;
const DQT: u16 = 0xFFDB;
const DRI: u16 = 0xFFDD;
const SOS: u16 = 0xFFDA;
const COM: u16 = 0xFFFE;
const RST0: u16 = 0xFFD0;
const RST7: u16 = 0xFFD7;
const APP0: u16 = 0xFFE0;
const APP15: u16 = 0xFFEF;

/// A decoded JPEG marker.
///
/// Restart and application markers are kept as families with an index
/// (`Rst(0..=7)`, `App(0..=15)`) instead of 24 separate variants. `App(1)`
/// is the only marker whose payload can carry EXIF metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Start of image.
    Soi,
    /// End of image.
    Eoi,
    /// Baseline DCT frame header.
    Sof0,
    /// Progressive DCT frame header.
    Sof2,
    /// Huffman table definition.
    Dht,
    /// Quantization table definition.
    Dqt,
    /// Restart interval definition.
    Dri,
    /// Start of scan; entropy-coded data follows the scan header.
    Sos,
    /// Comment.
    Com,
    /// Restart marker `RSTn`, `n` in `0..=7`.
    Rst(u8),
    /// Application segment `APPn`, `n` in `0..=15`.
    App(u8),
}

/// How a segment's extent is determined, one shape per marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Marker only, 2 bytes, no payload (SOI, EOI, RSTn).
    Standalone,
    /// A 2-byte big-endian length follows the marker; the length counts the
    /// two length bytes themselves, so the segment spans `2 + length` bytes.
    Payload,
    /// Length-prefixed like [`SegmentKind::Payload`], but the payload prefix
    /// decides whether the segment is EXIF metadata (APP1 only).
    ExifCandidate,
    /// Length-prefixed scan header, then entropy-coded data running to the
    /// next real marker (SOS).
    Scan,
}

impl Marker {
    /// Decode a 16-bit marker code, or `None` for codes outside the
    /// recognized set (the caller treats those as a fatal scan error).
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            SOI => Some(Marker::Soi),
            EOI => Some(Marker::Eoi),
            SOF0 => Some(Marker::Sof0),
            SOF2 => Some(Marker::Sof2),
            DHT => Some(Marker::Dht),
            DQT => Some(Marker::Dqt),
            DRI => Some(Marker::Dri),
            SOS => Some(Marker::Sos),
            COM => Some(Marker::Com),
            RST0..=RST7 => Some(Marker::Rst((code - RST0) as u8)),
            APP0..=APP15 => Some(Marker::App((code - APP0) as u8)),
            _ => None,
        }
    }

    /// The 16-bit code this marker encodes to.
    pub fn code(self) -> u16 {
        match self {
            Marker::Soi => SOI,
            Marker::Eoi => EOI,
            Marker::Sof0 => SOF0,
            Marker::Sof2 => SOF2,
            Marker::Dht => DHT,
            Marker::Dqt => DQT,
            Marker::Dri => DRI,
            Marker::Sos => SOS,
            Marker::Com => COM,
            Marker::Rst(n) => RST0 + u16::from(n),
            Marker::App(n) => APP0 + u16::from(n),
        }
    }

    /// The segment shape this marker introduces.
    pub fn kind(self) -> SegmentKind {
        match self {
            Marker::Soi | Marker::Eoi | Marker::Rst(_) => SegmentKind::Standalone,
            Marker::App(1) => SegmentKind::ExifCandidate,
            Marker::Sos => SegmentKind::Scan,
            Marker::Sof0
            | Marker::Sof2
            | Marker::Dht
            | Marker::Dqt
            | Marker::Dri
            | Marker::Com
            | Marker::App(_) => SegmentKind::Payload,
        }
    }
}

/// Whether a 16-bit value is a restart marker code (`0xFFD0..=0xFFD7`).
///
/// Restart markers are resync points inside entropy-coded data and must not
/// terminate a scan run.
pub fn is_restart_code(code: u16) -> bool {
    (RST0..=RST7).contains(&code)
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Soi => f.write_str("SOI"),
            Marker::Eoi => f.write_str("EOI"),
            Marker::Sof0 => f.write_str("SOF0"),
            Marker::Sof2 => f.write_str("SOF2"),
            Marker::Dht => f.write_str("DHT"),
            Marker::Dqt => f.write_str("DQT"),
            Marker::Dri => f.write_str("DRI"),
            Marker::Sos => f.write_str("SOS"),
            Marker::Com => f.write_str("COM"),
            Marker::Rst(n) => write!(f, "RST{n}"),
            Marker::App(n) => write!(f, "APP{n}"),
        }
    }
}
