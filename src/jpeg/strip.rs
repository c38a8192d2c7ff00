use super::marker::SegmentKind;
use super::scanner::{ScanError, SegmentScanner};

/// Payload prefix that identifies an APP1 segment as EXIF: `Exif` followed
/// by two NUL padding bytes.
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// True if an APP1 payload carries the EXIF signature. A payload shorter
/// than the signature cannot be EXIF, so it is kept.
pub fn is_exif_payload(payload: &[u8]) -> bool {
    payload.starts_with(EXIF_SIGNATURE)
}

/// Outcome of stripping one JPEG buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripResult {
    /// The rewritten stream, EXIF segments removed.
    pub output: Vec<u8>,
    /// How many EXIF APP1 segments were dropped.
    pub removed_segments: usize,
    /// Total bytes those segments spanned.
    pub removed_bytes: usize,
}

impl StripResult {
    /// True when no EXIF segment was found.
    pub fn is_clean(&self) -> bool {
        self.removed_segments == 0
    }
}

/// Rewrite a JPEG byte stream with every EXIF APP1 segment removed.
///
/// Every other segment is copied through byte for byte, in its original
/// order, with no re-encoding. APP1 segments whose payload does not start
/// with the EXIF signature (XMP, for instance) are kept. Bytes after the
/// EOI marker never reach the output.
///
/// Fails on the first malformed or unrecognized segment; the caller should
/// then leave the original file untouched.
pub fn strip_exif(data: &[u8]) -> Result<StripResult, ScanError> {
    let mut output = Vec::with_capacity(data.len());
    let mut removed_segments = 0;
    let mut removed_bytes = 0;

    for segment in SegmentScanner::new(data) {
        let segment = segment?;
        if segment.marker.kind() == SegmentKind::ExifCandidate
            && is_exif_payload(segment.payload(data))
        {
            log::debug!(
                "dropping {} segment at offset {} ({} bytes)",
                segment.marker,
                segment.start,
                segment.byte_len(),
            );
            removed_segments += 1;
            removed_bytes += segment.byte_len();
        } else {
            output.extend_from_slice(segment.bytes(data));
        }
    }

    Ok(StripResult {
        output,
        removed_segments,
        removed_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A length-prefixed segment: marker, declared length, payload.
    fn segment(code: u16, payload: &[u8]) -> Vec<u8> {
        let length = (payload.len() + 2) as u16;
        let mut bytes = code.to_be_bytes().to_vec();
        bytes.extend_from_slice(&length.to_be_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn exif_app1(body: &[u8]) -> Vec<u8> {
        let mut payload = EXIF_SIGNATURE.to_vec();
        payload.extend_from_slice(body);
        segment(0xFFE1, &payload)
    }

    /// SOI, the given metadata segments, a minimal scan, EOI.
    fn jpeg(metadata: &[Vec<u8>]) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        for seg in metadata {
            data.extend_from_slice(seg);
        }
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        data.extend_from_slice(&[0x01, 0xFF, 0x00, 0x51, 0xFF, 0xD2, 0x44]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    // ── signature detection ──────────────────────────────────────────

    #[test]
    fn detects_exact_signature() {
        assert!(is_exif_payload(b"Exif\0\0"));
        assert!(is_exif_payload(b"Exif\0\0MM\x00\x2A"));
    }

    #[test]
    fn rejects_near_misses() {
        assert!(!is_exif_payload(b"exif\0\0"));
        assert!(!is_exif_payload(b"Exif\0\x01"));
        assert!(!is_exif_payload(b"XMP\0"));
        assert!(!is_exif_payload(b""));
    }

    #[test]
    fn rejects_payload_shorter_than_signature() {
        assert!(!is_exif_payload(b"Exif\0"));
        assert!(!is_exif_payload(b"Ex"));
    }

    // ── stripping ────────────────────────────────────────────────────

    #[test]
    fn removes_single_exif_segment() {
        let dqt = segment(0xFFDB, &[0x00, 0x10, 0x20]);
        let exif = exif_app1(&[0xAA; 32]);
        let input = jpeg(&[dqt.clone(), exif.clone()]);
        let expected = jpeg(&[dqt]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, expected);
        assert_eq!(result.removed_segments, 1);
        assert_eq!(result.removed_bytes, exif.len());
        assert!(!result.is_clean());
    }

    #[test]
    fn removes_every_exif_segment() {
        let com = segment(0xFFFE, b"hello");
        let input = jpeg(&[exif_app1(&[1, 2, 3]), com.clone(), exif_app1(&[4; 64])]);
        let expected = jpeg(&[com]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, expected);
        assert_eq!(result.removed_segments, 2);
        assert_eq!(result.removed_bytes, input.len() - expected.len());
    }

    #[test]
    fn keeps_non_exif_app1() {
        let xmp = segment(0xFFE1, b"http://ns.adobe.com/xap/1.0/\0<x/>");
        let input = jpeg(&[xmp]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, input);
        assert!(result.is_clean());
    }

    #[test]
    fn keeps_app1_too_short_to_be_exif() {
        // Payloads shorter than the 6-byte signature, including a truncated
        // prefix of it, stay in the stream.
        let stub = segment(0xFFE1, b"Exif\0");
        let tiny = segment(0xFFE1, b"AB");
        let input = jpeg(&[stub, tiny]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, input);
        assert_eq!(result.removed_segments, 0);
    }

    #[test]
    fn keeps_other_app_segments() {
        let jfif = segment(0xFFE0, b"JFIF\0\x01\x02\x00\x00\x01\x00\x01\x00\x00");
        let adobe = segment(0xFFEE, b"Adobe\0");
        let input = jpeg(&[jfif, adobe]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, input);
    }

    #[test]
    fn clean_input_passes_through_unchanged() {
        let input = jpeg(&[
            segment(0xFFDB, &[0u8; 65]),
            segment(0xFFC0, &[0x08, 0x00, 0x10, 0x00, 0x10, 0x01, 0x01, 0x11, 0x00]),
            segment(0xFFC4, &[0x00, 0x01, 0x02]),
            segment(0xFFDD, &[0x00, 0x04]),
        ]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, input);
        assert_eq!(result.removed_bytes, 0);
    }

    #[test]
    fn stripping_is_idempotent() {
        let input = jpeg(&[exif_app1(&[7; 16]), segment(0xFFFE, b"note")]);
        let first = strip_exif(&input).unwrap();
        let second = strip_exif(&first.output).unwrap();
        assert_eq!(second.output, first.output);
        assert!(second.is_clean());
    }

    #[test]
    fn entropy_data_is_copied_byte_for_byte() {
        // The scan run in `jpeg` carries a stuffed FF 00 pair and a restart
        // marker; both must survive the rewrite untouched.
        let input = jpeg(&[exif_app1(b"x")]);
        let result = strip_exif(&input).unwrap();
        let tail = [0xFF, 0xDA, 0x00, 0x02, 0x01, 0xFF, 0x00, 0x51, 0xFF, 0xD2, 0x44, 0xFF, 0xD9];
        assert!(result.output.ends_with(&tail));
    }

    #[test]
    fn works_without_a_scan_segment() {
        // SOI, EXIF APP1, COM, EOI. No scan data is required for removal.
        let mut input = vec![0xFF, 0xD8];
        input.extend_from_slice(&exif_app1(&[0x11; 8]));
        input.extend_from_slice(&segment(0xFFFE, b"kept"));
        input.extend_from_slice(&[0xFF, 0xD9]);

        let mut expected = vec![0xFF, 0xD8];
        expected.extend_from_slice(&segment(0xFFFE, b"kept"));
        expected.extend_from_slice(&[0xFF, 0xD9]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, expected);
        assert_eq!(result.removed_segments, 1);
    }

    #[test]
    fn bytes_after_eoi_are_dropped() {
        let clean = jpeg(&[]);
        let mut input = clean.clone();
        input.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let result = strip_exif(&input).unwrap();
        assert_eq!(result.output, clean);
        assert_eq!(result.removed_segments, 0);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let result = strip_exif(&[]).unwrap();
        assert!(result.output.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn malformed_stream_is_rejected() {
        let mut input = vec![0xFF, 0xD8];
        input.extend_from_slice(&exif_app1(b"data"));
        input.extend_from_slice(&[0xFF, 0x01]);

        let err = strip_exif(&input).unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedMarker { code: 0xFF01, .. }));
    }

    #[test]
    fn truncated_exif_segment_is_rejected() {
        // Declared length runs past the buffer end; nothing is salvaged.
        let mut input = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x40, 0x00];
        input.extend_from_slice(EXIF_SIGNATURE);

        let err = strip_exif(&input).unwrap_err();
        assert!(matches!(err, ScanError::Truncated { .. }));
    }
}
