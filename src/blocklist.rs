use crate::config::Config;
use log::warn;
use std::fs;
use std::path::Path;

/// Path substrings that identify vulnerability-scanner probes.
///
/// Patterns are kept as loaded; both sides are lower-cased when matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockedPatterns(Vec<String>);

impl BlockedPatterns {
    pub fn new(patterns: Vec<String>) -> Self {
        Self(patterns)
    }

    /// Reads the configured file only when scanner blocking is enabled.
    pub fn for_config(config: &Config) -> Self {
        if config.block_scanners {
            Self::load(&config.blocked_paths_file)
        } else {
            Self::default()
        }
    }

    // Never fails: an unreadable or malformed file yields an empty list.
    pub fn load(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                warn!("Could not load {}: {}", path.display(), err);
                return Self::default();
            }
        };

        // A bare `null` is an empty list, not an error.
        match serde_json::from_str::<Option<Vec<String>>>(&data) {
            Ok(patterns) => Self::new(patterns.unwrap_or_default()),
            Err(err) => {
                warn!("Invalid JSON in {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Unanchored, case-insensitive substring match against the request path.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.0
            .iter()
            .any(|pattern| path.contains(&pattern.to_lowercase()))
    }
}
