//! Provider that reads history through the `git` command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use jcr_types::CommitPair;

use crate::error::{SourceError, SourceResult};
use crate::provider::{is_json_file, FileBlobs, RepositoryProvider};

/// Reads the last two commits of a repository via `git`.
///
/// Repositories cloned with [`GitCliProvider::clone_url`] live in a
/// temporary directory that is removed when the provider is dropped.
#[derive(Debug)]
pub struct GitCliProvider {
    repo: PathBuf,
    _workdir: Option<TempDir>,
}

impl GitCliProvider {
    /// Shallow-clone `url` (depth 2) into a fresh temporary directory.
    pub fn clone_url(url: &str) -> SourceResult<Self> {
        let workdir = tempfile::Builder::new().prefix("repo-").tempdir()?;
        let repo = workdir.path().join("repo");
        info!(url, path = %repo.display(), "cloning repository");

        let repo_arg = repo.to_string_lossy().into_owned();
        run_git(None, &["clone", "--depth", "2", "--", url, &repo_arg])?;

        Ok(Self {
            repo,
            _workdir: Some(workdir),
        })
    }

    /// Use an existing local checkout.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            repo: path.into(),
            _workdir: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.repo
    }

    fn git(&self, args: &[&str]) -> SourceResult<String> {
        run_git(Some(&self.repo), args)
    }

    /// Contents of `path` at `rev`, or `None` if the file does not exist there.
    fn blob(&self, rev: &str, path: &str) -> SourceResult<Option<String>> {
        let object = format!("{rev}:{path}");
        let exists = git_command(Some(&self.repo), &["cat-file", "-e", &object])
            .output()?
            .status
            .success();
        if !exists {
            debug!(rev, path, "blob absent");
            return Ok(None);
        }
        self.git(&["show", &object]).map(Some)
    }
}

impl RepositoryProvider for GitCliProvider {
    fn commit_pair(&self) -> SourceResult<CommitPair> {
        let count = self.git(&["rev-list", "--count", "HEAD"])?;
        let found: u64 = count
            .trim()
            .parse()
            .map_err(|_| SourceError::InvalidOutput(format!("commit count {count:?}")))?;
        if found < 2 {
            return Err(SourceError::NotEnoughCommits { found });
        }

        let before = self.git(&["rev-parse", "HEAD~1"])?;
        let after = self.git(&["rev-parse", "HEAD"])?;
        Ok(CommitPair::new(before.trim(), after.trim()))
    }

    fn changed_json_files(&self, pair: &CommitPair) -> SourceResult<Vec<FileBlobs>> {
        let names = self.git(&["diff", "--name-only", &pair.before, &pair.after])?;
        let mut files = Vec::new();
        for name in names.lines().map(str::trim).filter(|n| !n.is_empty()) {
            if !is_json_file(name) {
                continue;
            }
            files.push(FileBlobs {
                file: name.to_string(),
                before: self.blob(&pair.before, name)?,
                after: self.blob(&pair.after, name)?,
            });
        }
        debug!(count = files.len(), "changed JSON files");
        Ok(files)
    }
}

fn git_command(repo: Option<&Path>, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    if let Some(repo) = repo {
        cmd.arg("-C").arg(repo);
    }
    cmd.args(args);
    cmd
}

fn run_git(repo: Option<&Path>, args: &[&str]) -> SourceResult<String> {
    let output = git_command(repo, args).output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = if stderr.trim().is_empty() { stdout } else { stderr };
        return Err(SourceError::Git {
            command: args.first().copied().unwrap_or_default().to_string(),
            message: message.trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
