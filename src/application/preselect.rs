//! Initial selection of leaves by file extension.

use std::collections::HashSet;
use std::path::Path;

use crate::config::PreselectConfig;

/// Allow-list of extensions whose files start out checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preselection {
    /// Extensions without the leading dot
    extensions: HashSet<String>,
}

impl Preselection {
    /// Accepts extensions with or without a leading dot (`.mp4` or `mp4`).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Case-sensitive match on the name's last extension.
    pub fn is_preselected(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .map(|ext| self.extensions.contains(ext.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }
}

impl From<&PreselectConfig> for Preselection {
    fn from(config: &PreselectConfig) -> Self {
        Self::new(&config.extensions)
    }
}
