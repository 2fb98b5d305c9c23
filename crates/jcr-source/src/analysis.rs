//! Turn a provider's raw blobs into per-file structural deltas.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use jcr_diff::{diff_documents, diff_text};
use jcr_types::{CommitPair, FileDelta};

use crate::error::{SourceError, SourceResult};
use crate::provider::RepositoryProvider;

/// Everything computed from one commit pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub commits: CommitPair,
    /// One delta per changed JSON file, in provider order.
    pub files: Vec<FileDelta>,
    /// Unified line diff of the same files.
    pub text_diff: String,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Fetch the last commit pair from `provider` and diff every changed JSON file.
///
/// Files whose parsed contents are equal (formatting-only changes) are left
/// out. A blob that is not valid JSON fails the whole analysis.
pub fn analyze(provider: &dyn RepositoryProvider) -> SourceResult<Analysis> {
    let commits = provider.commit_pair()?;
    let blobs = provider.changed_json_files(&commits)?;
    info!(commits = %commits.short(), files = blobs.len(), "analyzing changes");

    let mut files = Vec::new();
    let mut text_diff = String::new();
    for blob in &blobs {
        let before = parse_blob(&blob.file, blob.before.as_deref())?;
        let after = parse_blob(&blob.file, blob.after.as_deref())?;

        text_diff.push_str(
            &diff_text(
                blob.before.as_deref().unwrap_or_default(),
                blob.after.as_deref().unwrap_or_default(),
            )
            .to_unified(&blob.file, &blob.file),
        );

        match diff_documents(before.as_ref(), after.as_ref()) {
            Some(delta) => files.push(FileDelta::new(blob.file.clone(), delta)),
            None => debug!(file = %blob.file, "no structural change"),
        }
    }

    Ok(Analysis {
        commits,
        files,
        text_diff,
    })
}

fn parse_blob(file: &str, text: Option<&str>) -> SourceResult<Option<Value>> {
    match text {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text)
            .map(Some)
            .map_err(|source| SourceError::InvalidJson {
                file: file.to_string(),
                source,
            }),
        _ => Ok(None),
    }
}
