use crate::error::{ReleaseError, Result};
use crate::git::{Identity, SourceControl};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A commit recorded by [`MockRepository::commit_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCommit {
    pub id: String,
    pub message: String,
    pub author: Identity,
}

#[derive(Default)]
struct State {
    head: String,
    commits: Vec<MockCommit>,
    tags: BTreeMap<String, String>,
    pushed: Vec<(String, String)>,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    state: Mutex<State>,
    reject_push: bool,
}

impl MockRepository {
    /// Create a mock repository whose HEAD is `head`
    pub fn new(head: impl Into<String>) -> Self {
        MockRepository {
            state: Mutex::new(State {
                head: head.into(),
                ..State::default()
            }),
            reject_push: false,
        }
    }

    /// Make every push fail, as if the remote were unreachable
    pub fn rejecting_pushes(mut self) -> Self {
        self.reject_push = true;
        self
    }

    /// Add an existing tag pointing at `target`
    pub fn add_tag(&self, name: impl Into<String>, target: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.tags.insert(name.into(), target.into());
        }
    }

    pub fn commits(&self) -> Vec<MockCommit> {
        self.state
            .lock()
            .map(|s| s.commits.clone())
            .unwrap_or_default()
    }

    /// Tag name to target commit
    pub fn tags(&self) -> BTreeMap<String, String> {
        self.state.lock().map(|s| s.tags.clone()).unwrap_or_default()
    }

    /// (remote, tag) pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .map(|s| s.pushed.clone())
            .unwrap_or_default()
    }

    fn state(&self) -> Result<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| ReleaseError::Git(git2::Error::from_str("mock state poisoned")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("0".repeat(40))
    }
}

impl SourceControl for MockRepository {
    fn head_commit(&self) -> Result<String> {
        Ok(self.state()?.head.clone())
    }

    fn commit_all(&self, message: &str, identity: &Identity) -> Result<String> {
        let mut state = self.state()?;
        let id = format!("{:040x}", state.commits.len() + 1);
        state.commits.push(MockCommit {
            id: id.clone(),
            message: message.to_string(),
            author: identity.clone(),
        });
        state.head = id.clone();
        Ok(id)
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let mut state = self.state()?;
        if state.tags.contains_key(name) {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "tag '{}' already exists",
                name
            ))));
        }
        state.tags.insert(name.to_string(), target.to_string());
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        if self.reject_push {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "failed to push to remote '{}'",
                remote
            ))));
        }
        let mut state = self.state()?;
        if !state.tags.contains_key(name) {
            return Err(ReleaseError::Git(git2::Error::from_str(&format!(
                "src refspec {} does not match any",
                name
            ))));
        }
        state.pushed.push((remote.to_string(), name.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_commit_moves_head() {
        let repo = MockRepository::default();
        let identity = Identity::new("RuffleBuild", "ruffle@ruffle.rs");
        let id = repo.commit_all("Release 1.0.0", &identity).unwrap();

        assert_eq!(repo.head_commit().unwrap(), id);
        assert_eq!(repo.commits()[0].message, "Release 1.0.0");
    }

    #[test]
    fn test_mock_repository_tags() {
        let repo = MockRepository::new("abc");
        repo.create_tag("v1.0.0", "abc").unwrap();

        assert_eq!(repo.tags().get("v1.0.0"), Some(&"abc".to_string()));
        assert!(repo.create_tag("v1.0.0", "def").is_err());
    }

    #[test]
    fn test_mock_push_requires_tag() {
        let repo = MockRepository::default();
        assert!(repo.push_tag("origin", "v9.9.9").is_err());

        repo.add_tag("v9.9.9", "abc");
        repo.push_tag("origin", "v9.9.9").unwrap();
        assert_eq!(
            repo.pushed(),
            vec![("origin".to_string(), "v9.9.9".to_string())]
        );
    }

    #[test]
    fn test_mock_rejecting_pushes() {
        let repo = MockRepository::default().rejecting_pushes();
        repo.add_tag("v1.0.0", "abc");
        assert!(repo.push_tag("origin", "v1.0.0").is_err());
        assert!(repo.pushed().is_empty());
    }
}
