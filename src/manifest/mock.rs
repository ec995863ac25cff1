use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::manifest::{SetVersion, VersionStore, WebManifest};
use std::sync::Mutex;

/// In-memory version manifest for testing without cargo
pub struct MockVersionStore {
    version: Mutex<Option<String>>,
    writes: Mutex<Vec<String>>,
    fail_set_with: Option<i32>,
}

impl MockVersionStore {
    /// Create a manifest holding `version`
    pub fn new(version: impl Into<String>) -> Self {
        MockVersionStore {
            version: Mutex::new(Some(version.into())),
            writes: Mutex::new(Vec::new()),
            fail_set_with: None,
        }
    }

    /// A manifest that does not exist; every read fails
    pub fn missing() -> Self {
        MockVersionStore {
            version: Mutex::new(None),
            writes: Mutex::new(Vec::new()),
            fail_set_with: None,
        }
    }

    /// Make every write fail as if the tool exited with `code`
    pub fn failing_writes(mut self, code: i32) -> Self {
        self.fail_set_with = Some(code);
        self
    }

    /// Current manifest contents
    pub fn current(&self) -> Option<String> {
        self.version.lock().ok().and_then(|v| v.clone())
    }

    /// Every value written to the manifest, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

impl VersionStore for MockVersionStore {
    fn get_version(&self) -> Result<String> {
        self.current().ok_or_else(|| ReleaseError::ToolInvocation {
            tool: "mock get-version".to_string(),
            code: 1,
            stderr: "manifest not found".to_string(),
        })
    }

    fn set_version(&self, change: &SetVersion) -> Result<()> {
        if let Some(code) = self.fail_set_with {
            return Err(ReleaseError::ToolInvocation {
                tool: "mock set-version".to_string(),
                code,
                stderr: "manifest is read-only".to_string(),
            });
        }

        let next = match change {
            SetVersion::Bump(level) => Version::parse(&self.get_version()?)?
                .bump(*level)
                .to_string(),
            SetVersion::Explicit(version) => version.clone(),
        };

        if let Ok(mut writes) = self.writes.lock() {
            writes.push(next.clone());
        }
        if let Ok(mut version) = self.version.lock() {
            *version = Some(next);
        }
        Ok(())
    }
}

/// Calls a [`MockWebManifest`] received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebCall {
    Install,
    SetVersion(String),
    Regenerate,
}

/// Secondary manifest that only records what it was asked to do
#[derive(Default)]
pub struct MockWebManifest {
    calls: Mutex<Vec<WebCall>>,
}

impl MockWebManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WebCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: WebCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl WebManifest for MockWebManifest {
    fn install(&self) -> Result<()> {
        self.record(WebCall::Install);
        Ok(())
    }

    fn set_version(&self, version: &str) -> Result<()> {
        self.record(WebCall::SetVersion(version.to_string()));
        Ok(())
    }

    fn regenerate(&self) -> Result<()> {
        self.record(WebCall::Regenerate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BumpLevel;

    #[test]
    fn test_mock_store_bump() {
        let store = MockVersionStore::new("1.2.3");
        store.set_version(&SetVersion::Bump(BumpLevel::Minor)).unwrap();
        assert_eq!(store.get_version().unwrap(), "1.3.0");
        assert_eq!(store.writes(), vec!["1.3.0".to_string()]);
    }

    #[test]
    fn test_mock_store_explicit() {
        let store = MockVersionStore::new("1.2.3");
        store
            .set_version(&SetVersion::Explicit("9.9.9".to_string()))
            .unwrap();
        assert_eq!(store.current().as_deref(), Some("9.9.9"));
    }

    #[test]
    fn test_mock_store_missing() {
        let store = MockVersionStore::missing();
        assert!(store.get_version().is_err());
    }

    #[test]
    fn test_mock_store_failing_writes() {
        let store = MockVersionStore::new("1.0.0").failing_writes(5);
        let err = store
            .set_version(&SetVersion::Bump(BumpLevel::Patch))
            .unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert_eq!(store.current().as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_mock_web_manifest_records_calls() {
        let web = MockWebManifest::new();
        web.install().unwrap();
        web.set_version("1.0.0").unwrap();
        assert_eq!(
            web.calls(),
            vec![WebCall::Install, WebCall::SetVersion("1.0.0".to_string())]
        );
    }
}
