//! Main copy command

use crate::config::{Config, Options};
use crate::executor::CopyScheduler;
use crate::rules::IgnoreResolver;
use crate::scanner::walk_tree;
use crate::types::{CopyJob, CopyResult, CpignoreError, EntryKind};
use crate::ui::ProgressReporter;
use std::fs;
use tracing::{debug, info};

/// Copy the source tree into the destination, skipping ignored entries.
///
/// Blocks until every copy job settles. Call it from synchronous code, not
/// from inside an async runtime.
///
/// # Returns
/// * `Ok(Vec<CopyResult>)` - One record per copied file or created directory
/// * `Err(CpignoreError)` - Invalid options or the first IO failure. Files
///   copied before the failure stay on disk.
///
/// # Example
/// ```no_run
/// use cpignore::Options;
///
/// let mut options = Options::new("packages/app", "build/app");
/// options.file_names = vec![".cpignore".to_string()];
/// let copied = cpignore::run(options)?;
/// println!("{} entries", copied.len());
/// # Ok::<(), cpignore::CpignoreError>(())
/// ```
pub fn run(options: Options) -> Result<Vec<CopyResult>, CpignoreError> {
    let config = Config::try_from(options)?;
    run_with_config(config)
}

/// Run with an already validated configuration.
pub fn run_with_config(config: Config) -> Result<Vec<CopyResult>, CpignoreError> {
    // Supplements compile before anything touches the disk.
    let resolver = IgnoreResolver::from_config(&config)?;

    if !config.destination.exists() {
        fs::create_dir_all(&config.destination)
            .map_err(|e| CpignoreError::at(&config.destination, e))?;
        debug!("Created destination {}", config.destination.display());
    }
    let destination_root = fs::canonicalize(&config.destination)
        .map_err(|e| CpignoreError::at(&config.destination, e))?;
    let nested_destination = destination_root
        .starts_with(&config.source)
        .then_some(destination_root.as_path());

    let reporter = ProgressReporter::new(config.logging);
    let mut scheduler =
        CopyScheduler::new(config.concurrency, config.keep_empty_folders, reporter.clone())?;
    debug!("Copying with up to {} jobs in flight", scheduler.limit());

    let stats = walk_tree(
        &config.source,
        &resolver,
        nested_destination,
        &mut |entry| {
            // No point starting more work once a job has failed.
            if !scheduler.has_failed() {
                scheduler.enqueue(CopyJob::for_entry(
                    &entry,
                    &config.source,
                    &config.destination,
                ));
            }
            Ok(())
        },
    )?;
    debug!(
        "Walked {} directories: {} included, {} ignored, {} unsupported",
        stats.directories, stats.included, stats.ignored, stats.unsupported
    );
    debug!("{} copy jobs enqueued", scheduler.enqueued());

    let manifest = scheduler.close_and_wait()?;

    let copied_files = manifest
        .iter()
        .filter(|result| result.kind == EntryKind::File)
        .count();
    reporter.finish(copied_files);
    info!(
        "Copied {} files from {} to {}",
        copied_files,
        config.source.display(),
        config.destination.display()
    );

    Ok(manifest)
}
