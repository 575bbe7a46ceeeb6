use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid root: {0}")]
    InvalidRoot(String),
}

/// File extensions treated as YAML documents.
pub const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Name endings of backup copies, which are never repaired.
const BACKUP_ENDINGS: &[&str] = &[".backup", ".bak", ".orig", "~"];

/// Read a document and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a document
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Copy a document to `<path><suffix>` before it is overwritten.
///
/// Returns the backup's path. An existing backup is replaced.
pub fn backup_file(path: &Path, suffix: &str) -> Result<PathBuf, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    let backup = PathBuf::from(name);
    fs::copy(path, &backup).map_err(IoError::Io)?;
    Ok(backup)
}

/// Scan for YAML documents under a root directory
///
/// Hidden directories and backup copies are skipped; the result is sorted.
pub fn scan_yaml_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.exists() {
        return Err(IoError::InvalidRoot("root directory not found".to_string()));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

/// True for a file name that belongs to a backup copy.
pub fn is_backup_name(name: &str) -> bool {
    BACKUP_ENDINGS.iter().any(|ending| name.ends_with(ending))
}

pub fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext))
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if !name.starts_with('.') {
                scan_directory_recursive(&path, files)?;
            }
        } else if is_yaml_path(&path) && !is_backup_name(&name) {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_root(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidRoot("Directory does not exist".to_string()));
    }

    Ok(())
}
