use std::path::Path;

use serde::{Deserialize, Serialize};

use folio_diff::NormalizeOptions;
use folio_ledger::{Author, DEFAULT_BRANCH};
use folio_types::path;

use crate::error::{SdkError, SdkResult};

/// Document a fresh Workspace starts with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    pub path: String,
    pub content: String,
}

impl Default for SeedDocument {
    fn default() -> Self {
        Self {
            path: "README.md".into(),
            content: "# Welcome to Folio\n\nStart writing here.\n".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub author: Author,
    pub default_branch: String,
    pub normalize: NormalizeOptions,
    pub seed: SeedDocument,
    /// Remote folder the Workspace mirrors; empty for the repository root.
    pub remote_root: String,
    /// Per-subscriber event buffer.
    pub event_capacity: usize,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            author: Author::default(),
            default_branch: DEFAULT_BRANCH.into(),
            normalize: NormalizeOptions::default(),
            seed: SeedDocument::default(),
            remote_root: String::new(),
            event_capacity: 256,
        }
    }
}

impl FolioConfig {
    pub fn from_toml_str(raw: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validated()
    }

    /// Canonicalize `remote_root`, rejecting roots that are not plain folder paths.
    pub fn validated(mut self) -> SdkResult<Self> {
        self.remote_root = path::normalize_dir(&self.remote_root)
            .map_err(|e| SdkError::Config(format!("remote_root: {e}")))?;
        Ok(self)
    }

    pub fn load(path: &Path) -> SdkResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> SdkResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = FolioConfig::default();
        assert_eq!(c.default_branch, "main");
        assert_eq!(c.seed.path, "README.md");
        assert!(c.normalize.strip_trailing_blank_lines);
        assert!(c.remote_root.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = FolioConfig::from_toml_str(
            r#"
            default_branch = "trunk"
            remote_root = "vault"

            [author]
            name = "Ada"
            email = "ada@example.com"

            [normalize]
            strip_trailing_blank_lines = false
            "#,
        )
        .unwrap();
        assert_eq!(c.default_branch, "trunk");
        assert_eq!(c.author.name, "Ada");
        assert!(!c.normalize.strip_trailing_blank_lines);
        assert_eq!(c.seed, SeedDocument::default());
        assert_eq!(c.event_capacity, 256);
    }

    #[test]
    fn bad_toml_is_config_error() {
        assert!(matches!(
            FolioConfig::from_toml_str("default_branch = 3"),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn remote_root_is_canonicalized() {
        let c = FolioConfig::from_toml_str(r#"remote_root = "/vault/notes/""#).unwrap();
        assert_eq!(c.remote_root, "vault/notes");

        let err = FolioConfig::from_toml_str(r#"remote_root = "vault/../x""#).unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = FolioConfig::load_or_default(&dir.path().join("folio.toml")).unwrap();
        assert_eq!(c, FolioConfig::default());
    }
}
