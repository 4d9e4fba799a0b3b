//! Filesystem-backed hierarchy source.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{instrument, trace, warn};
use walkdir::WalkDir;

use crate::domain::{DomainError, DomainResult, HierarchySource, Listing};

/// Enumerates directories one level at a time.
#[derive(Debug, Clone, Default)]
pub struct DirectorySource {
    follow_links: bool,
    include_hidden: bool,
}

impl DirectorySource {
    pub fn new(follow_links: bool, include_hidden: bool) -> Self {
        Self {
            follow_links,
            include_hidden,
        }
    }

    fn unavailable(path: &Path, reason: impl ToString) -> DomainError {
        DomainError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Resolved locations `node` is inside of: every prefix of the walked path plus
/// every ancestor of where it actually lives.
fn enclosing_dirs(node: &Path) -> DomainResult<HashSet<PathBuf>> {
    let actual = node
        .canonicalize()
        .map_err(|e| DirectorySource::unavailable(node, e))?;
    let mut dirs: HashSet<PathBuf> = actual.ancestors().map(Path::to_path_buf).collect();
    dirs.extend(node.ancestors().filter_map(|p| p.canonicalize().ok()));
    Ok(dirs)
}

impl HierarchySource for DirectorySource {
    type Node = PathBuf;

    fn name(&self, node: &PathBuf) -> String {
        node.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| node.display().to_string())
    }

    #[instrument(level = "debug", skip(self))]
    fn list(&self, node: &PathBuf) -> DomainResult<Listing<PathBuf>> {
        if !node.is_dir() {
            return Err(Self::unavailable(node, "not a readable directory"));
        }

        // A followed link into one of these would re-enter the walk forever.
        let enclosing = if self.follow_links {
            Some(enclosing_dirs(node)?)
        } else {
            None
        };

        let mut listing = Listing::default();
        let walker = WalkDir::new(node)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links);

        for entry in walker {
            let entry = entry.map_err(|e| Self::unavailable(node, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.include_hidden && is_hidden(&name) {
                trace!(%name, "skipping hidden entry");
                continue;
            }
            let cyclic = entry.path_is_symlink()
                && enclosing.as_ref().is_some_and(|dirs| {
                    entry
                        .path()
                        .canonicalize()
                        .is_ok_and(|target| dirs.contains(&target))
                });
            if cyclic {
                warn!(
                    path = %entry.path().display(),
                    "symlink loops back to an ancestor, kept as a file"
                );
                listing.leaves.push(name);
            } else if entry.file_type().is_dir() {
                listing.containers.push((name, entry.into_path()));
            } else {
                listing.leaves.push(name);
            }
        }
        Ok(listing)
    }
}
