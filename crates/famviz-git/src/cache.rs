//! Local clones of remote repositories.

use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{ErrorClass, ErrorCode, Repository as Git2Repo, ResetType};
use tracing::{debug, info, warn};

use crate::{GitError, GitResult};

/// A directory of clones, one per repository name.
///
/// Not safe to share between concurrent runs: two processes pulling the same
/// clone race on its index and refs.
pub struct RepoCache {
    root: PathBuf,
    base_url: String,
    mailmap: Option<PathBuf>,
}

impl RepoCache {
    /// Creates a cache rooted at `root`, cloning from `base_url/<name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be created.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> GitResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            base_url: base_url.into(),
            mailmap: None,
        })
    }

    /// Sets the shared mailmap copied into every clone.
    #[must_use]
    pub fn with_mailmap(mut self, mailmap: impl Into<PathBuf>) -> Self {
        self.mailmap = Some(mailmap.into());
        self
    }

    /// Returns the local path of a repository (which may not exist yet).
    #[must_use]
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Returns the remote URL of a repository.
    #[must_use]
    pub fn remote_url(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.trim_end_matches('/'))
    }

    /// Clones the repository if absent, otherwise pulls it, then installs
    /// the shared mailmap. Returns the local path.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RepoNotFound`] if the remote does not exist and
    /// [`GitError::Network`] if it could not be transferred.
    pub fn ensure(&self, name: &str) -> GitResult<PathBuf> {
        let dir = self.path_of(name);

        if dir.join(".git").exists() {
            debug!(repo = name, "pulling");
            self.pull(name, &dir)?;
        } else {
            info!("Cloning {name}...");
            self.clone_repo(name, &dir)?;
        }

        if !dir.exists() {
            return Err(self.not_found(name));
        }

        self.install_mailmap(&dir)?;
        Ok(dir)
    }

    fn clone_repo(&self, name: &str, dir: &Path) -> GitResult<()> {
        let url = self.remote_url(name);
        RepoBuilder::new()
            .clone(&url, dir)
            .map(|_| ())
            .map_err(|e| {
                // A failed clone may leave an empty directory behind.
                let _ = std::fs::remove_dir_all(dir);
                self.classify(name, e)
            })
    }

    fn pull(&self, name: &str, dir: &Path) -> GitResult<()> {
        let repo = Git2Repo::open(dir).map_err(|_| GitError::NotARepo(dir.to_path_buf()))?;

        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                return self.pull_unborn(name, &repo);
            }
            Err(e) => return Err(e.into()),
        };
        let refname = head
            .name()
            .ok_or_else(|| GitError::NotARepo(dir.to_path_buf()))?
            .to_string();
        let branch = head.shorthand().unwrap_or("HEAD").to_string();

        let mut remote = repo.find_remote("origin")?;
        remote
            .fetch(&[format!("refs/heads/{branch}")], None, None)
            .map_err(|e| self.classify(name, e))?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetched = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetched])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetched.id(), "famviz: fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        } else {
            warn!(repo = name, "local copy diverged from remote, resetting");
            let target = repo.find_object(fetched.id(), None)?;
            repo.reset(&target, ResetType::Hard, None)?;
        }

        Ok(())
    }

    /// Pulls a clone of a remote that had no commits when it was cloned.
    fn pull_unborn(&self, name: &str, repo: &Git2Repo) -> GitResult<()> {
        let mut remote = repo.find_remote("origin")?;
        remote
            .fetch(&[] as &[&str], None, None)
            .map_err(|e| self.classify(name, e))?;

        // The unborn HEAD names the branch the first commits should land on
        let wanted = repo
            .find_reference("HEAD")?
            .symbolic_target()
            .unwrap_or("refs/heads/master")
            .trim_start_matches("refs/heads/")
            .to_string();

        let mut fetched = repo.find_reference(&format!("refs/remotes/origin/{wanted}")).ok();
        if fetched.is_none() {
            fetched = repo.references_glob("refs/remotes/origin/*")?.find_map(Result::ok);
        }
        let Some(tracking) = fetched else {
            debug!(repo = name, "remote has no commits yet");
            return Ok(());
        };
        let (Some(target), Some(tracking_name)) = (tracking.target(), tracking.name()) else {
            return Ok(());
        };
        let branch = tracking_name.trim_start_matches("refs/remotes/origin/");
        let refname = format!("refs/heads/{branch}");

        repo.reference(&refname, target, true, "famviz: first commits")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
        Ok(())
    }

    fn install_mailmap(&self, dir: &Path) -> GitResult<()> {
        let Some(mailmap) = &self.mailmap else {
            return Ok(());
        };
        if !mailmap.exists() {
            warn!(path = %mailmap.display(), "shared mailmap not found, author names are not normalized");
            return Ok(());
        }
        std::fs::copy(mailmap, dir.join(".mailmap"))?;
        Ok(())
    }

    fn classify(&self, name: &str, err: git2::Error) -> GitError {
        if is_missing_remote(&err) {
            self.not_found(name)
        } else {
            GitError::Network {
                name: name.to_string(),
                source: err,
            }
        }
    }

    fn not_found(&self, name: &str) -> GitError {
        GitError::RepoNotFound {
            name: name.to_string(),
            code: name.strip_prefix("apertium-").unwrap_or(name).to_string(),
            url: self.remote_url(name),
        }
    }
}

/// GitHub answers a clone of a missing repository with an authentication
/// challenge rather than a 404.
fn is_missing_remote(err: &git2::Error) -> bool {
    matches!(err.code(), ErrorCode::NotFound | ErrorCode::Auth)
        || (err.class() == ErrorClass::Http && err.message().contains("404"))
}
