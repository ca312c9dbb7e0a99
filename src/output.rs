//! Command file output and file path generation

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for output operations
#[derive(Debug)]
pub enum OutputError {
    /// IO error while clearing the output directory
    Clear(PathBuf, io::Error),
    /// IO error while writing a command file
    Write(PathBuf, io::Error),
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputError::Clear(path, e) => write!(f, "Cannot clear '{}': {}", path.display(), e),
            OutputError::Write(path, e) => write!(f, "Cannot write '{}': {}", path.display(), e),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutputError::Clear(_, e) | OutputError::Write(_, e) => Some(e),
        }
    }
}

/// File name for the command at `index` (0-based).
///
/// | Index | File |
/// |-------|------|
/// | 0 | `message-0.txt` |
/// | 1 | `message-1.txt` |
pub fn command_file_name(index: usize) -> String {
    format!("message-{}.txt", index)
}

/// Remove every regular file directly inside `dir`.
///
/// Subdirectories are left alone. A missing directory is created.
pub fn clear_output_dir(dir: &Path) -> Result<(), OutputError> {
    if !dir.exists() {
        return fs::create_dir_all(dir).map_err(|e| OutputError::Clear(dir.to_path_buf(), e));
    }

    let entries = fs::read_dir(dir).map_err(|e| OutputError::Clear(dir.to_path_buf(), e))?;
    for entry in entries {
        let path = entry.map_err(|e| OutputError::Clear(dir.to_path_buf(), e))?.path();
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| OutputError::Clear(path.clone(), e))?;
        }
    }
    Ok(())
}

/// Replace the contents of `dir` with one file per command.
///
/// # Returns
///
/// The written paths, in command order.
pub fn write_commands(dir: &Path, commands: &[String]) -> Result<Vec<PathBuf>, OutputError> {
    clear_output_dir(dir)?;

    commands
        .iter()
        .enumerate()
        .map(|(i, command)| {
            let path = dir.join(command_file_name(i));
            fs::write(&path, command).map_err(|e| OutputError::Write(path.clone(), e))?;
            Ok(path)
        })
        .collect()
}
