use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::jpeg;

/// The result of stripping a single JPEG file.
///
/// Carries the removal counts, whether the file on disk was rewritten, and
/// any error encountered. Errors are stored here rather than returned so a
/// batch can keep going past a bad file; the caller decides what a failure
/// means for the run as a whole.
///
/// # Example
///
/// ```rust,no_run
/// # use exif_strip::pipeline::process_file;
/// # use exif_strip::config::Config;
/// # let config = Config::default();
/// let result = process_file("photo.jpg".as_ref(), &config);
///
/// if result.error.is_none() {
///     println!(
///         "Removed {} segments ({} bytes)",
///         result.removed_segments, result.removed_bytes
///     );
/// }
/// ```
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    /// EXIF APP1 segments found (and removed, unless this was a dry run).
    pub removed_segments: usize,
    /// Total bytes those segments spanned.
    pub removed_bytes: usize,
    /// Bytes at the end of the stream outside any segment (after the EOI
    /// marker, or a final unpaired byte). Dropped by the rewrite.
    pub trailing_bytes: usize,
    /// File size before the rewrite.
    pub input_bytes: usize,
    /// Whether the file on disk was actually rewritten.
    pub rewritten: bool,
    /// If a backup was created, its path.
    pub backup_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl ProcessResult {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            removed_segments: 0,
            removed_bytes: 0,
            trailing_bytes: 0,
            input_bytes: 0,
            rewritten: false,
            backup_path: None,
            error: None,
        }
    }
}

/// Collect JPEG files from the given paths.
///
/// Accepts a mix of file paths and directory paths. Directories are walked
/// recursively (following symlinks). Only files whose extension matches the
/// configured list are included; an explicitly named file with the wrong
/// extension is skipped with a warning. A named path that does not exist
/// stays in the batch and is counted as a failed file when processed.
///
/// # Example
///
/// ```rust,no_run
/// use exif_strip::config::Config;
/// use exif_strip::pipeline::collect_jpegs;
/// use std::path::PathBuf;
///
/// let config = Config::default();
/// let files = collect_jpegs(
///     &[
///         PathBuf::from("photo.jpg"),   // single file
///         PathBuf::from("./photos/"),   // entire directory
///     ],
///     &config,
/// );
/// println!("Found {} JPEG files", files.len());
/// ```
pub fn collect_jpegs(paths: &[PathBuf], config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if config.matches_extension(path) {
                files.push(path.clone());
            } else {
                log::warn!("Skipping non-JPEG file: {}", path.display());
            }
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let p = entry.path();
                if p.is_file() && config.matches_extension(p) {
                    files.push(p.to_path_buf());
                }
            }
        } else {
            // Neither a file nor a directory at stat time. Keep it in the
            // batch; the per-file read error reports and counts it.
            files.push(path.clone());
        }
    }

    files
}

/// Create a backup of the original file. An existing backup is kept, so the
/// oldest original survives repeated runs.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let backup_path = path.with_extension(format!(
        "{}.bak",
        path.extension().unwrap_or_default().to_string_lossy()
    ));

    if !backup_path.exists() {
        std::fs::copy(path, &backup_path).context("Failed to create backup")?;
        log::debug!("Backup created: {}", backup_path.display());
    }

    Ok(backup_path)
}

/// Strip EXIF metadata from a single JPEG file, in place.
///
/// This is the main entry point for the library. The complete flow:
///
/// 1. **Read** — Loads the whole file into memory
/// 2. **Strip** — Scans the segment stream and drops every EXIF APP1 segment
/// 3. **Rewrite** — Writes the shortened stream back over the original file
///
/// A file that parses but contains nothing to remove is left untouched, so
/// timestamps survive and repeated runs are no-ops. With `dry_run` set,
/// nothing is written and the result reports what would have been removed.
/// With `backup_originals` set, the original is copied to `<name>.<ext>.bak`
/// before the rewrite; if that copy fails, the file is not touched.
///
/// A file that does not parse is reported in [`ProcessResult::error`] and
/// left exactly as it was. Partial output is never written.
///
/// # Example
///
/// ```rust,no_run
/// use exif_strip::config::Config;
/// use exif_strip::pipeline::process_file;
/// use std::path::Path;
///
/// let config = Config::default();
/// let result = process_file(Path::new("photo.jpg"), &config);
/// match result.error {
///     None => println!("Removed {} bytes of EXIF", result.removed_bytes),
///     Some(e) => eprintln!("Failed: {e}"),
/// }
/// ```
pub fn process_file(path: &Path, config: &Config) -> ProcessResult {
    let mut result = ProcessResult::new(path);

    let data = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            result.error = Some(format!("Failed to read file: {e}"));
            return result;
        }
    };
    result.input_bytes = data.len();

    if data.is_empty() {
        log::debug!("Empty file, skipping: {}", path.display());
        return result;
    }

    let stripped = match jpeg::strip_exif(&data) {
        Ok(stripped) => stripped,
        Err(e) => {
            result.error = Some(e.to_string());
            return result;
        }
    };
    result.removed_segments = stripped.removed_segments;
    result.removed_bytes = stripped.removed_bytes;
    result.trailing_bytes = data.len() - stripped.output.len() - stripped.removed_bytes;

    // The output only ever omits spans of the input, so equal lengths mean
    // identical bytes and there is nothing to write.
    if stripped.output.len() == data.len() {
        log::debug!("No EXIF in {}", path.display());
        return result;
    }

    if config.output.dry_run {
        return result;
    }

    if config.output.backup_originals {
        match backup_file(path) {
            Ok(backup) => result.backup_path = Some(backup),
            Err(e) => {
                result.error = Some(format!("{e}: {}", path.display()));
                return result;
            }
        }
    }

    if let Err(e) = std::fs::write(path, &stripped.output) {
        result.error = Some(format!("Failed to write file: {e}"));
        return result;
    }
    result.rewritten = true;

    result
}
