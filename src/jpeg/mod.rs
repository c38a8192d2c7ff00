//! JPEG segment-stream parsing and EXIF removal.
//!
//! This module provides two layers:
//!
//! - [`SegmentScanner`] — Walk a JPEG byte buffer one segment at a time,
//!   spanning entropy-coded scan data without decoding it
//! - [`strip_exif`] — Rewrite a buffer with every EXIF APP1 segment removed
//!   and every other byte copied through untouched
//!
//! Marker codes and length fields are decoded big-endian as the format
//! requires. Malformed streams fail with a [`ScanError`] naming the marker
//! and offset; nothing is ever salvaged from a stream that does not parse.

mod marker;
mod scanner;
mod strip;

pub use marker::{Marker, SegmentKind, is_restart_code};
pub use scanner::{ScanError, Segment, SegmentScanner};
pub use strip::{EXIF_SIGNATURE, StripResult, is_exif_payload, strip_exif};
