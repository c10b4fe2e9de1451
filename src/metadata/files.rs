use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

/// Reports which referenced media files are absent.
pub trait ExistenceChecker {
    /// Return the subset of `paths` that do not exist, sorted and deduplicated.
    fn missing(&self, paths: &[&Path]) -> Vec<PathBuf>;
}

impl<F> ExistenceChecker for F
where
    F: Fn(&Path) -> bool,
{
    fn missing(&self, paths: &[&Path]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|p| !self(**p))
            .map(|p| p.to_path_buf())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Filesystem-backed checker. Relative paths resolve against `root` when set.
#[derive(Clone, Debug, Default)]
pub struct FsExistenceChecker {
    root: Option<PathBuf>,
}

impl FsExistenceChecker {
    /// Checker resolving relative paths against the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checker resolving relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ExistenceChecker for FsExistenceChecker {
    fn missing(&self, paths: &[&Path]) -> Vec<PathBuf> {
        (|p: &Path| self.resolve(p).exists()).missing(paths)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/files.rs"]
mod tests;
