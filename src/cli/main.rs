use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use exif_strip::{config, pipeline};

#[derive(Parser, Debug)]
#[command(
    name = "exif-strip",
    version,
    about = "Strip EXIF metadata from JPEG files in place, without re-encoding image data"
)]
struct Cli {
    /// JPEG files or directories to process
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to config file (default: config.json next to binary)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initialize a default config.json and exit
    #[arg(long)]
    init: bool,

    /// Preview what would be removed without writing to files
    #[arg(long)]
    dry_run: bool,

    /// Keep each original beside the rewrite as a .bak file
    #[arg(short, long)]
    backup: bool,

    /// Stop at the first file that fails instead of continuing
    #[arg(long)]
    fail_fast: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Handle --init
    if cli.init {
        let config = config::Config::default();
        let path = cli.config.as_deref();
        config.save(path)?;
        let save_path = match path {
            Some(p) => p.to_path_buf(),
            None => config::Config::config_path()?,
        };
        println!("Default config written to {}", save_path.display());
        return Ok(());
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No input files or directories specified. Use --help for usage.");
    }

    // Load config
    let mut config = config::Config::load(cli.config.as_deref())?;

    // Override output behavior from CLI flags
    if cli.dry_run {
        config.output.dry_run = true;
    }
    if cli.backup {
        config.output.backup_originals = true;
    }
    if cli.fail_fast {
        config.output.fail_fast = true;
    }

    // Collect files
    let files = pipeline::collect_jpegs(&cli.paths, &config);
    if files.is_empty() {
        anyhow::bail!("No JPEG files found in the specified paths.");
    }

    log::info!("Found {} file(s) to process", files.len());
    if config.output.dry_run {
        log::info!("DRY RUN — no files will be modified");
    }

    // Process each file
    let mut results = Vec::new();
    let total = files.len();

    for (i, path) in files.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", i + 1, total, path.display());

        let result = pipeline::process_file(path, &config);

        if let Some(ref err) = result.error {
            log::error!("  Error: {err}");
        } else if result.removed_segments == 0 && result.trailing_bytes == 0 {
            log::info!("  Clean, nothing to remove");
        } else {
            let verb = if config.output.dry_run { "Would remove" } else { "Removed" };
            if result.removed_segments > 0 {
                log::info!(
                    "  {verb} {} EXIF segment(s), {} bytes",
                    result.removed_segments,
                    result.removed_bytes
                );
            }
            if result.trailing_bytes > 0 {
                log::info!("  {verb} {} trailing byte(s)", result.trailing_bytes);
            }
            if let Some(ref backup) = result.backup_path {
                log::info!("  Backup: {}", backup.display());
            }
        }

        let stop = config.output.fail_fast && result.error.is_some();
        results.push(result);
        if stop {
            log::warn!("Stopping at first failure (--fail-fast)");
            break;
        }
    }

    // JSON output
    if cli.json {
        let json_results: Vec<serde_json::Value> = results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "path": r.path.display().to_string(),
                    "removed_segments": r.removed_segments,
                    "removed_bytes": r.removed_bytes,
                    "trailing_bytes": r.trailing_bytes,
                    "input_bytes": r.input_bytes,
                    "rewritten": r.rewritten,
                    "backup": r.backup_path.as_ref().map(|p| p.display().to_string()),
                    "error": r.error,
                })
            })
            .collect();

        println!("{}", serde_json::to_string_pretty(&json_results)?);
    }

    // Summary
    let success = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.iter().filter(|r| r.error.is_some()).count();
    let affected = results.iter().filter(|r| r.removed_segments > 0).count();
    let segments: usize = results.iter().map(|r| r.removed_segments).sum();
    let bytes: usize = results.iter().map(|r| r.removed_bytes).sum();

    let verb = if config.output.dry_run { "Would remove" } else { "Removed" };
    log::info!("{verb} {segments} EXIF segment(s), {bytes} bytes, across {affected} file(s)");
    log::info!("Done: {success} succeeded, {failed} failed out of {total} files");

    if failed > 0 {
        anyhow::bail!("{failed} of {total} file(s) failed");
    }
    Ok(())
}
