use crate::utils::error::{GenieError, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let Some(text) = path.to_str() else {
        return Err(GenieError::InvalidPath {
            field: field_name.to_string(),
            value: path.to_string_lossy().into_owned(),
            reason: "Path is not valid UTF-8".to_string(),
        });
    };

    if text.is_empty() {
        return Err(GenieError::InvalidPath {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if text.contains('\0') {
        return Err(GenieError::InvalidPath {
            field: field_name.to_string(),
            value: text.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GenieError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Makes `path` absolute against the current directory, following symlinks
/// for every prefix that exists. Components past the last existing one are
/// appended as written, with `.` and `..` collapsed.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                // `..` after a symlink must step out of the link target.
                if let Ok(real) = std::fs::canonicalize(&resolved) {
                    resolved = real;
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    Ok(resolved)
}

/// Resolves every path and returns them together with the single directory
/// they all live in.
pub fn resolve_shared_parent(paths: &[&Path]) -> Result<(Vec<PathBuf>, PathBuf)> {
    let resolved = paths
        .iter()
        .map(|p| resolve_path(p))
        .collect::<Result<Vec<_>>>()?;

    let parents: BTreeSet<PathBuf> = resolved
        .iter()
        .map(|p| p.parent().map(Path::to_path_buf).unwrap_or_default())
        .collect();

    if parents.len() != 1 {
        return Err(GenieError::PathLayout {
            directories: parents.into_iter().collect(),
        });
    }

    let shared = parents.into_iter().next().unwrap_or_default();
    Ok((resolved, shared))
}

/// File name component as a string, for addressing a file inside a mount.
pub fn file_name(field_name: &str, path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| GenieError::InvalidPath {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "Path has no file name".to_string(),
        })
}
