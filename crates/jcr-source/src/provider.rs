use serde::{Deserialize, Serialize};

use jcr_types::CommitPair;

use crate::error::{SourceError, SourceResult};

/// Raw text of one changed file on each side of a commit pair.
///
/// `before` is `None` for files added in the newer commit and `after` is
/// `None` for files deleted by it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlobs {
    pub file: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Supplies the history a report is built from.
pub trait RepositoryProvider {
    /// The two most recent commits, older first.
    fn commit_pair(&self) -> SourceResult<CommitPair>;

    /// Every `.json` file that differs between the two commits.
    fn changed_json_files(&self, pair: &CommitPair) -> SourceResult<Vec<FileBlobs>>;
}

/// Returns `true` for names ending in `.json`, ignoring ASCII case.
pub fn is_json_file(name: &str) -> bool {
    name.len() >= 5
        && name
            .get(name.len() - 5..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(".json"))
}

/// A provider backed by fixed data.
#[derive(Clone, Debug, Default)]
pub struct InMemoryProvider {
    commits: Vec<String>,
    files: Vec<FileBlobs>,
}

impl InMemoryProvider {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            commits: vec![before.into(), after.into()],
            files: Vec::new(),
        }
    }

    /// A provider whose history is too short to compare.
    pub fn single_commit(commit: impl Into<String>) -> Self {
        Self {
            commits: vec![commit.into()],
            files: Vec::new(),
        }
    }

    pub fn with_file(
        mut self,
        file: impl Into<String>,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Self {
        self.files.push(FileBlobs {
            file: file.into(),
            before: before.map(str::to_string),
            after: after.map(str::to_string),
        });
        self
    }
}

impl RepositoryProvider for InMemoryProvider {
    fn commit_pair(&self) -> SourceResult<CommitPair> {
        match self.commits.as_slice() {
            [.., before, after] => Ok(CommitPair::new(before.clone(), after.clone())),
            _ => Err(SourceError::NotEnoughCommits {
                found: self.commits.len() as u64,
            }),
        }
    }

    fn changed_json_files(&self, _pair: &CommitPair) -> SourceResult<Vec<FileBlobs>> {
        Ok(self
            .files
            .iter()
            .filter(|f| is_json_file(&f.file))
            .filter(|f| f.before != f.after)
            .cloned()
            .collect())
    }
}
