use crate::error::{ReleaseError, Result};
use crate::git::{Identity, SourceControl};
use git2::{Cred, CredentialType, Oid, PushOptions, RemoteCallbacks, Repository, Signature};
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around git2::Repository implementing [`SourceControl`]
pub struct Git2Repository {
    repo: Repository,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Repository) -> Self {
        Git2Repository { repo }
    }
}

/// Credential callbacks for pushing.
///
/// Tries, in order: a `GITHUB_TOKEN` for HTTPS remotes, SSH keys from
/// `~/.ssh/`, the SSH agent, configured credential helpers, then defaults.
fn remote_callbacks<'a>(config: git2::Config) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                return Cred::userpass_plaintext("x-access-token", &token);
            }
            if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                return Ok(cred);
            }
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let user = username_from_url.unwrap_or("git");
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(user, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    callbacks.push_update_reference(|refname, status| match status {
        Some(status) => {
            warn!(refname, status, "remote rejected reference");
            Err(git2::Error::from_str(&format!(
                "Push rejected for {}: {}",
                refname, status
            )))
        }
        None => Ok(()),
    });

    callbacks
}

impl SourceControl for Git2Repository {
    fn head_commit(&self) -> Result<String> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    fn commit_all(&self, message: &str, identity: &Identity) -> Result<String> {
        let mut index = self.repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let parent = self.repo.head()?.peel_to_commit()?;
        if parent.tree_id() == tree_id {
            return Err(ReleaseError::Git(git2::Error::from_str(
                "nothing to commit, working tree clean",
            )));
        }

        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now(&identity.name, &identity.email)?;
        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        debug!(commit = %oid, message, "created commit");
        Ok(oid.to_string())
    }

    fn create_tag(&self, name: &str, target: &str) -> Result<()> {
        let oid = Oid::from_str(target)?;
        let object = self.repo.find_object(oid, None)?;

        self.repo.tag_lightweight(name, &object, false)?;
        debug!(tag = name, target, "created tag");
        Ok(())
    }

    fn push_tag(&self, remote: &str, name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote)?;

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(remote_callbacks(self.repo.config()?));

        let refspec = format!("refs/tags/{}:refs/tags/{}", name, name);
        remote.push(&[refspec.as_str()], Some(&mut push_options))?;
        debug!(tag = name, "pushed tag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo() -> (TempDir, Git2Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        fs::write(dir.path().join("Cargo.toml"), "version = \"1.2.0\"\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("Cargo.toml")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        {
            let tree = repo.find_tree(tree_id).unwrap();
            let sig = Signature::now("Test", "test@example.com").unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap();
        }

        (dir, Git2Repository::from_git2(repo))
    }

    #[test]
    fn test_commit_all_records_identity() {
        let (dir, scm) = init_repo();
        fs::write(dir.path().join("Cargo.toml"), "version = \"1.2.1\"\n").unwrap();

        let identity = Identity::new("RuffleBuild", "ruffle@ruffle.rs");
        let id = scm.commit_all("Release 1.2.1", &identity).unwrap();

        assert_eq!(scm.head_commit().unwrap(), id);
        let commit = scm.repo.find_commit(Oid::from_str(&id).unwrap()).unwrap();
        assert_eq!(commit.message(), Some("Release 1.2.1"));
        assert_eq!(commit.author().name(), Some("RuffleBuild"));
        assert_eq!(commit.committer().email(), Some("ruffle@ruffle.rs"));
    }

    #[test]
    fn test_commit_all_with_clean_tree_fails() {
        let (_dir, scm) = init_repo();
        let identity = Identity::new("RuffleBuild", "ruffle@ruffle.rs");
        assert!(scm.commit_all("Release 1.2.1", &identity).is_err());
    }

    #[test]
    fn test_create_tag_at_head() {
        let (_dir, scm) = init_repo();
        let head = scm.head_commit().unwrap();
        scm.create_tag("v1.2.0", &head).unwrap();

        let tagged = scm
            .repo
            .find_reference("refs/tags/v1.2.0")
            .unwrap()
            .peel_to_commit()
            .unwrap();
        assert_eq!(tagged.id().to_string(), head);
    }

    #[test]
    fn test_existing_tag_is_not_moved() {
        let (_dir, scm) = init_repo();
        let head = scm.head_commit().unwrap();
        scm.create_tag("v1.2.0", &head).unwrap();
        assert!(scm.create_tag("v1.2.0", &head).is_err());
    }

    #[test]
    fn test_push_to_unknown_remote_fails() {
        let (_dir, scm) = init_repo();
        assert!(scm.push_tag("origin", "v1.2.0").is_err());
    }
}
