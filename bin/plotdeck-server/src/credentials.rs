//! YAML-file credential store.
//!
//! One file holding at most an `openai` section with an `api_key`. Every
//! operation reads, modifies and rewrites the whole file; there is no
//! locking, so concurrent writers are last-write-wins. Absence of the
//! file or the key is a valid state, not an error.

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    openai: Option<OpenAiSection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

/// Read-modify-write access to the credential file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The stored API key, if any.
    pub fn api_key(&self) -> anyhow::Result<Option<String>> {
        Ok(self.load()?.openai.and_then(|s| s.api_key))
    }

    /// Store (or replace) the API key.
    pub fn store_api_key(&self, key: &str) -> anyhow::Result<()> {
        let mut file = self.load()?;
        file.openai = Some(OpenAiSection { api_key: Some(key.to_owned()) });
        self.save(&file)?;
        debug!(path = %self.path.display(), "stored API key");
        Ok(())
    }

    /// Remove the API key. The whole `openai` section is dropped so the
    /// file never retains an empty credential section.
    pub fn delete_api_key(&self) -> anyhow::Result<()> {
        let mut file = self.load()?;
        file.openai = None;
        self.save(&file)?;
        debug!(path = %self.path.display(), "deleted API key");
        Ok(())
    }

    fn load(&self) -> anyhow::Result<CredentialsFile> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialsFile::default())
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("reading credential file {}", self.path.display())
                })
            }
        };
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing credential file {}", self.path.display()))
    }

    fn save(&self, file: &CredentialsFile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_yaml::to_string(file)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing credential file {}", self.path.display()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CredentialStore::new(dir.path().join("credentials.yaml"));
        (dir, store)
    }

    #[test]
    fn missing_file_means_no_key() {
        let (_dir, store) = store();
        assert_eq!(store.api_key().expect("read"), None);
    }

    #[test]
    fn store_and_read_round_trip() {
        let (_dir, store) = store();
        store.store_api_key("sk-test-123").expect("store");
        assert_eq!(store.api_key().expect("read"), Some("sk-test-123".into()));
    }

    #[test]
    fn replacing_key_keeps_single_section() {
        let (_dir, store) = store();
        store.store_api_key("first").expect("store");
        store.store_api_key("second").expect("store");
        assert_eq!(store.api_key().expect("read"), Some("second".into()));
    }

    #[test]
    fn delete_leaves_no_empty_section() {
        let (dir, store) = store();
        store.store_api_key("sk-test-123").expect("store");
        store.delete_api_key().expect("delete");
        assert_eq!(store.api_key().expect("read"), None);

        let text = std::fs::read_to_string(dir.path().join("credentials.yaml")).expect("read");
        assert!(!text.contains("openai"));
    }

    #[test]
    fn delete_without_file_is_a_no_op() {
        let (_dir, store) = store();
        store.delete_api_key().expect("delete");
        assert_eq!(store.api_key().expect("read"), None);
    }
}
