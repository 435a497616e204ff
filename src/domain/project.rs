//! Project domain entities
//!
//! [`ProjectRecord`] is the only persisted entity. Field names serialize in
//! camelCase because the on-disk collection and the HTTP surface share the
//! same JSON layout, and that layout has no schema versioning.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::onboarding::OnboardingState;

/// One entry of the commit snapshot taken at fetch time.
///
/// The snapshot is most-recent-first in upstream order and is never merged
/// or appended after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Dependency manifest detected in the repository root, first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DependencyManifest {
    /// `package.json` dependencies
    #[serde(rename_all = "camelCase")]
    Npm {
        dependencies: BTreeMap<String, String>,
        dev_dependencies: BTreeMap<String, String>,
    },
    /// `requirements.txt` lines
    Pip { requirements: Vec<String> },
}

/// Denormalized project record tracked by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Unique key, derived as lowercase `owner-repo`.
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub url: String,
    pub owner: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub language: Option<String>,
    pub default_branch: String,
    /// Language name to byte count, as reported by the source.
    pub languages: BTreeMap<String, u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyManifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    /// Fixed snapshot of recent commits, most-recent-first.
    pub commits: Vec<Commit>,
    pub total_commits: u64,
    /// Repository creation time (from the source, not local mutation).
    pub created_at: Option<DateTime<Utc>>,
    /// Repository update time (from the source, not local mutation).
    pub updated_at: Option<DateTime<Utc>>,
    pub onboarding_overview: Option<String>,
    pub is_generating: bool,
    pub generation_failed: bool,
}

impl ProjectRecord {
    /// Derive the project id from repository coordinates.
    pub fn derive_id(owner: &str, repo: &str) -> String {
        format!("{}-{}", owner, repo).to_lowercase()
    }

    /// Current onboarding sub-state, derived from the flag triple.
    ///
    /// The three flags are kept mutually consistent by only mutating them
    /// through [`ProjectPatch`] transitions, so the derivation is total.
    pub fn onboarding_state(&self) -> OnboardingState {
        if self.is_generating {
            OnboardingState::Generating
        } else if self.generation_failed {
            OnboardingState::Failed
        } else if self.onboarding_overview.is_some() {
            OnboardingState::Ready
        } else {
            OnboardingState::New
        }
    }
}

/// Shallow-merge patch over the mutable onboarding fields of a record.
///
/// `None` fields are left untouched. A previously stored overview is only
/// ever replaced by a fresh one, never cleared: a failed regenerate keeps
/// stale-but-present data.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub onboarding_overview: Option<String>,
    pub is_generating: Option<bool>,
    pub generation_failed: Option<bool>,
}

impl ProjectPatch {
    /// Patch for entering generation (creation step 1 and regenerate).
    pub fn generating() -> Self {
        Self {
            onboarding_overview: None,
            is_generating: Some(true),
            generation_failed: None,
        }
    }

    /// Patch for a successful generation result.
    pub fn ready(overview: impl Into<String>) -> Self {
        Self {
            onboarding_overview: Some(overview.into()),
            is_generating: Some(false),
            generation_failed: Some(false),
        }
    }

    /// Patch for a failed generation. Leaves any prior overview in place.
    pub fn failed() -> Self {
        Self {
            onboarding_overview: None,
            is_generating: Some(false),
            generation_failed: Some(true),
        }
    }

    /// Apply the patch to a record in place.
    pub fn apply(&self, record: &mut ProjectRecord) {
        if let Some(overview) = &self.onboarding_overview {
            record.onboarding_overview = Some(overview.clone());
        }
        if let Some(generating) = self.is_generating {
            record.is_generating = generating;
        }
        if let Some(failed) = self.generation_failed {
            record.generation_failed = failed;
        }
    }
}

/// Context bundle for the deep onboarding fetch: root file listing plus
/// recent commit messages, enough for the prompt without the full record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OnboardingContext {
    pub repo: String,
    pub files: Vec<String>,
    pub commits: Vec<ContextCommit>,
}

/// Commit reference embedded in an [`OnboardingContext`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContextCommit {
    pub message: String,
    pub author: String,
}

/// Fresh partial metadata for a tracked repository, merged over the stored
/// record by the meta endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub owner: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub language: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProjectRecord {
        ProjectRecord {
            id: "octocat-hello-world".into(),
            name: "Hello-World".into(),
            full_name: "octocat/Hello-World".into(),
            description: None,
            url: "https://github.com/octocat/Hello-World".into(),
            owner: "octocat".into(),
            stars: 0,
            forks: 0,
            watchers: 0,
            language: None,
            default_branch: "main".into(),
            languages: BTreeMap::new(),
            dependencies: None,
            readme: None,
            commits: Vec::new(),
            total_commits: 0,
            created_at: None,
            updated_at: None,
            onboarding_overview: None,
            is_generating: false,
            generation_failed: false,
        }
    }

    #[test]
    fn test_derive_id_lowercases() {
        assert_eq!(
            ProjectRecord::derive_id("OctoCat", "Hello-World"),
            "octocat-hello-world"
        );
    }

    #[test]
    fn test_state_derivation_covers_flag_triple() {
        let mut r = record();
        assert_eq!(r.onboarding_state(), OnboardingState::New);

        ProjectPatch::generating().apply(&mut r);
        assert_eq!(r.onboarding_state(), OnboardingState::Generating);

        ProjectPatch::ready("overview").apply(&mut r);
        assert_eq!(r.onboarding_state(), OnboardingState::Ready);

        ProjectPatch::generating().apply(&mut r);
        ProjectPatch::failed().apply(&mut r);
        assert_eq!(r.onboarding_state(), OnboardingState::Failed);
    }

    #[test]
    fn test_failed_patch_preserves_prior_overview() {
        let mut r = record();
        ProjectPatch::ready("first summary").apply(&mut r);
        ProjectPatch::generating().apply(&mut r);
        ProjectPatch::failed().apply(&mut r);

        assert_eq!(r.onboarding_overview.as_deref(), Some("first summary"));
        assert!(r.generation_failed);
        assert!(!r.is_generating);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json.get("fullName").is_some());
        assert!(json.get("isGenerating").is_some());
        assert!(json.get("onboardingOverview").is_some());
        assert!(json.get("totalCommits").is_some());
        assert!(json.get("full_name").is_none());
    }

    #[test]
    fn test_dependency_manifest_tagged_layout() {
        let npm = DependencyManifest::Npm {
            dependencies: BTreeMap::from([("express".into(), "4.17.1".into())]),
            dev_dependencies: BTreeMap::new(),
        };
        let json = serde_json::to_value(&npm).unwrap();
        assert_eq!(json["kind"], "npm");
        assert!(json.get("devDependencies").is_some());

        let pip: DependencyManifest =
            serde_json::from_value(serde_json::json!({
                "kind": "pip",
                "requirements": ["flask==2.0.1"]
            }))
            .unwrap();
        assert_eq!(
            pip,
            DependencyManifest::Pip {
                requirements: vec!["flask==2.0.1".into()]
            }
        );
    }
}
