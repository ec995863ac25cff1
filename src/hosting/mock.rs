use crate::error::{ReleaseError, Result};
use crate::hosting::{ReleaseHost, ReleaseRecord, ReleaseRequest};
use std::sync::Mutex;

/// Release host keeping releases in memory, newest first
#[derive(Default)]
pub struct MockReleaseHost {
    releases: Mutex<Vec<ReleaseRecord>>,
    created: Mutex<Vec<ReleaseRequest>>,
    list_limits: Mutex<Vec<usize>>,
}

impl MockReleaseHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose history holds these tags, newest first
    pub fn with_history<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let host = Self::new();
        if let Ok(mut releases) = host.releases.lock() {
            releases.extend(tags.into_iter().map(ReleaseRecord::new));
        }
        host
    }

    /// Requests passed to `create_release`, in call order
    pub fn created(&self) -> Vec<ReleaseRequest> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Limits passed to `list_releases`, in call order
    pub fn list_limits(&self) -> Vec<usize> {
        self.list_limits.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl ReleaseHost for MockReleaseHost {
    fn list_releases(&self, limit: usize) -> Result<Vec<ReleaseRecord>> {
        if let Ok(mut limits) = self.list_limits.lock() {
            limits.push(limit);
        }
        let releases = self.releases.lock().map(|r| r.clone()).unwrap_or_default();
        Ok(releases.into_iter().take(limit).collect())
    }

    fn create_release(&self, request: &ReleaseRequest) -> Result<()> {
        let mut releases = self
            .releases
            .lock()
            .map_err(|_| ReleaseError::structural("mock release list poisoned"))?;
        if releases.iter().any(|r| r.tag_name == request.tag) {
            return Err(ReleaseError::ToolInvocation {
                tool: "mock release create".to_string(),
                code: 1,
                stderr: format!("a release with tag {} already exists", request.tag),
            });
        }
        releases.insert(0, ReleaseRecord::new(&request.tag));
        if let Ok(mut created) = self.created.lock() {
            created.push(request.clone());
        }
        Ok(())
    }
}
