use crate::error::{AppError, Result as AppResult};
use log::{debug, trace};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Creates a directory and all its parent components if they are missing.
/// Idempotent: does nothing if the directory already exists.
pub fn ensure_directory(path: &Path) -> AppResult<()> {
    if !path.exists() {
        debug!("Creating directory: {}", path.display());
        fs::create_dir_all(path).map_err(|e| {
            AppError::Io(io::Error::new(
                e.kind(),
                format!("Failed to create directory {}: {}", path.display(), e),
            ))
        })?;
    } else if !path.is_dir() {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        )));
    }
    Ok(())
}

/// Writes a string slice to a file, creating it if it doesn't exist,
/// truncating if it does.
pub fn write_string_to_file(path: &Path, content: &str) -> AppResult<()> {
    trace!("Writing string to file: {}", path.display());
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut file = File::create(path).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to create/truncate file {}: {}", path.display(), e),
        ))
    })?;
    file.write_all(content.as_bytes()).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to write to file {}: {}", path.display(), e),
        ))
    })?;
    file.flush().map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!("Failed to flush file {}: {}", path.display(), e),
        ))
    })?;
    Ok(())
}

/// Copies a file from source to destination, overwriting an existing file.
pub fn copy_file_overwrite(source: &Path, destination: &Path) -> AppResult<u64> {
    trace!(
        "Copying file from {} to {}",
        source.display(),
        destination.display()
    );
    if let Some(parent) = destination.parent() {
        ensure_directory(parent)?;
    }
    fs::copy(source, destination).map_err(|e| {
        AppError::Io(io::Error::new(
            e.kind(),
            format!(
                "Failed to copy file from {} to {}: {}",
                source.display(),
                destination.display(),
                e
            ),
        ))
    })
}
