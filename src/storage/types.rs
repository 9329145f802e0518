//! core type-safe wrappers around git primitives for the storage layer.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use git2::Oid;
use serde::{Serialize, Serializer};

/// This makes sure we don't accidentally pass a tree ID where a commit ID
/// is expected. The inner Oid is only accessible within the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(pub(crate) Oid);

impl CommitId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }

    /// raw Oid (for internal use only)
    pub(crate) fn raw(&self) -> Oid {
        self.0
    }

    /// parse CommitId from a hex string
    pub fn from_hex(hex: &str) -> Result<Self, git2::Error> {
        Oid::from_str(hex).map(CommitId)
    }

    /// short form of the commit ID
    pub fn short(&self) -> String {
        let hex = self.0.to_string();
        hex[..7.min(hex.len())].to_string()
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CommitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

/// Git tree identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(pub(crate) Oid);

impl TreeId {
    pub(crate) fn new(oid: Oid) -> Self {
        Self(oid)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated submodule path, relative to the superproject root.
///
/// Paths are stored `/`-separated, the way git writes them in trees and in
/// `.gitmodules`, so they compare and sort the same on every platform.
///
/// Valid paths:
/// - non-empty
/// - relative (no leading `/`)
/// - no `.` or `..` components, no empty components
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubmodulePath(String);

impl SubmodulePath {
    /// create a new SubmodulePath, validating the input
    pub fn new(path: impl Into<String>) -> Result<Self, InvalidPathError> {
        let path = path.into();
        Self::validate(&path)?;
        Ok(Self(path))
    }

    /// build a SubmodulePath from a filesystem path as reported by git2
    pub fn from_path(path: &Path) -> Result<Self, InvalidPathError> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part
                        .to_str()
                        .ok_or_else(|| InvalidPathError::NotUtf8(path.to_path_buf()))?;
                    parts.push(part);
                }
                _ => return Err(InvalidPathError::NotRelative(path.display().to_string())),
            }
        }
        Self::new(parts.join("/"))
    }

    fn validate(path: &str) -> Result<(), InvalidPathError> {
        if path.is_empty() {
            return Err(InvalidPathError::Empty);
        }

        if path.starts_with('/') {
            return Err(InvalidPathError::NotRelative(path.to_string()));
        }

        for (i, part) in path.split('/').enumerate() {
            if part.is_empty() || part == "." || part == ".." {
                return Err(InvalidPathError::InvalidComponent {
                    component: part.to_string(),
                    position: i,
                });
            }
        }

        Ok(())
    }

    /// join a child entry name onto this path (for recursive tree walks)
    pub fn join(&self, name: &str) -> Result<Self, InvalidPathError> {
        Self::new(format!("{}/{}", self.0, name))
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// resolve this path under a working directory
    pub fn under(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for SubmodulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubmodulePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// error type for invalid submodule paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPathError {
    Empty,
    NotRelative(String),
    InvalidComponent { component: String, position: usize },
    NotUtf8(PathBuf),
}

impl fmt::Display for InvalidPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "path cannot be empty"),
            Self::NotRelative(path) => write!(f, "path must be relative: '{}'", path),
            Self::InvalidComponent { component, position } => {
                write!(f, "invalid component '{}' at position {}", component, position)
            }
            Self::NotUtf8(path) => write!(f, "path is not valid utf-8: {}", path.display()),
        }
    }
}

impl std::error::Error for InvalidPathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submodule_path_valid() {
        assert!(SubmodulePath::new("lib").is_ok());
        assert!(SubmodulePath::new("vendor/lib-a").is_ok());
        assert!(SubmodulePath::new("deps/.hidden").is_ok());
    }

    #[test]
    fn test_submodule_path_invalid() {
        assert_eq!(SubmodulePath::new(""), Err(InvalidPathError::Empty));
        assert!(SubmodulePath::new("/abs").is_err());
        assert!(SubmodulePath::new("a//b").is_err());
        assert!(SubmodulePath::new("../escape").is_err());
        assert!(SubmodulePath::new("a/./b").is_err());
    }

    #[test]
    fn test_submodule_path_from_fs_path() {
        let path = SubmodulePath::from_path(Path::new("vendor/lib")).unwrap();
        assert_eq!(path.as_str(), "vendor/lib");
        assert!(SubmodulePath::from_path(Path::new("../lib")).is_err());
    }

    #[test]
    fn test_submodule_path_ordering() {
        let mut paths = vec![
            SubmodulePath::new("zlib").unwrap(),
            SubmodulePath::new("alpha").unwrap(),
            SubmodulePath::new("lib").unwrap(),
        ];
        paths.sort();
        let names: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, ["alpha", "lib", "zlib"]);
    }

    #[test]
    fn test_submodule_path_under_root() {
        let path = SubmodulePath::new("vendor/lib").unwrap();
        assert_eq!(path.under(Path::new("/repo")), Path::new("/repo/vendor/lib"));
    }

    #[test]
    fn test_commit_id_short() {
        let id = CommitId::from_hex("e3d27ccecae41194a9f16c405afc29dd832e4c7f").unwrap();
        assert_eq!(id.short(), "e3d27cc");
        assert_eq!(id.to_string(), "e3d27ccecae41194a9f16c405afc29dd832e4c7f");
    }
}
