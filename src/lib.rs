//! # exif-strip
//!
//! Strip EXIF metadata from JPEG files in place, without re-encoding. The
//! file is parsed at the segment level: EXIF APP1 segments are dropped and
//! every other byte is copied through untouched, so image quality and all
//! non-EXIF metadata (XMP, ICC profiles, comments) survive exactly as they
//! were.
//!
//! ## Quick Start
//!
//! The simplest way to use the library is through the pipeline module, which
//! handles the full read → strip → rewrite flow per file:
//!
//! ```rust,no_run
//! use exif_strip::config::Config;
//! use exif_strip::pipeline::{collect_jpegs, process_file};
//! use std::path::PathBuf;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Load config from file (extensions, dry run, backups)
//!     let config = Config::load(Some("config.json".as_ref()))?;
//!
//!     // Collect JPEG files from paths (files or directories)
//!     let files = collect_jpegs(&[PathBuf::from("./photos")], &config);
//!
//!     for path in &files {
//!         let result = process_file(path, &config);
//!
//!         if let Some(ref err) = result.error {
//!             eprintln!("Error processing {}: {err}", path.display());
//!         } else if result.rewritten {
//!             println!(
//!                 "{}: removed {} bytes of EXIF",
//!                 path.display(),
//!                 result.removed_bytes
//!             );
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-Level Usage
//!
//! The segment layer works on byte buffers and never touches the
//! filesystem:
//!
//! ```rust
//! use exif_strip::jpeg::strip_exif;
//!
//! // SOI, an EXIF APP1 segment, EOI.
//! let mut data = vec![0xFF, 0xD8];
//! data.extend_from_slice(&[0xFF, 0xE1, 0x00, 0x08]);
//! data.extend_from_slice(b"Exif\0\0");
//! data.extend_from_slice(&[0xFF, 0xD9]);
//!
//! let result = strip_exif(&data)?;
//! assert_eq!(result.output, [0xFF, 0xD8, 0xFF, 0xD9]);
//! assert_eq!(result.removed_segments, 1);
//! # Ok::<(), exif_strip::jpeg::ScanError>(())
//! ```
//!
//! ## What Gets Removed
//!
//! | Segment | Fate |
//! |---------|------|
//! | APP1 carrying `Exif\0\0` | Removed |
//! | APP1 carrying anything else (XMP, ...) | Kept |
//! | APP0, APP2–APP15 (JFIF, ICC, Adobe, ...) | Kept |
//! | Comments, tables, frame headers, scan data | Kept, byte for byte |
//! | Bytes after the EOI marker | Dropped |
//!
//! A file that does not parse as a JPEG segment stream is reported as an
//! error and left untouched; partial output is never written.
//!
//! ## Modules
//!
//! - [`config`] — Configuration types and loading/saving
//! - [`jpeg`] — Segment scanner, marker classification, and the stripper
//! - [`pipeline`] — Per-file processing and file collection

pub mod config;
pub mod jpeg;
pub mod pipeline;
