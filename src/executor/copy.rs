//! Single copy job execution

use crate::types::{CopyJob, CpignoreError, EntryKind};
use std::path::Path;
use tokio::fs;

/// Run one copy job.
///
/// Files are copied byte-for-byte, creating missing parent directories and
/// overwriting an existing destination file. Directories are created only when
/// `keep_empty_folders` is set; otherwise they appear on demand when a file
/// beneath them is copied.
///
/// # Returns
/// * `Ok(true)` - The file was copied or the directory created
/// * `Ok(false)` - Directory job with `keep_empty_folders` disabled (nothing done)
/// * `Err(CpignoreError)` - IO failure, tagged with the failing path
pub async fn execute_job(job: &CopyJob, keep_empty_folders: bool) -> Result<bool, CpignoreError> {
    match job.kind {
        EntryKind::File => {
            copy_file(&job.source, &job.destination).await?;
            Ok(true)
        }
        EntryKind::Directory if keep_empty_folders => {
            create_dir_all(&job.destination).await?;
            Ok(true)
        }
        EntryKind::Directory => Ok(false),
    }
}

/// Copy `src` to `dest`, creating parent directories as needed.
///
/// # Example
/// ```no_run
/// # async fn demo() -> Result<(), cpignore::CpignoreError> {
/// use cpignore::executor::copy_file;
/// use std::path::Path;
///
/// let bytes = copy_file(Path::new("src/a.txt"), Path::new("dist/a.txt")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn copy_file(src: &Path, dest: &Path) -> Result<u64, CpignoreError> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent).await?;
    }
    fs::copy(src, dest)
        .await
        .map_err(|e| CpignoreError::at(dest, e))
}

/// `create_dir_all` that treats an existing directory as success.
async fn create_dir_all(path: &Path) -> Result<(), CpignoreError> {
    fs::create_dir_all(path)
        .await
        .map_err(|e| CpignoreError::at(path, e))
}
