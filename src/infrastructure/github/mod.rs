//! GitHub REST API client
//!
//! Translates repository coordinates into a [`ProjectRecord`] skeleton by
//! fanning out over the metadata endpoints. The repository document and the
//! commit snapshot are critical; languages, dependency manifest, and README
//! degrade to absent fields on any failure.

use std::collections::BTreeMap;

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::GitHubConfig;
use crate::domain::{
    Commit, ContextCommit, DependencyManifest, OnboardingContext, ProjectRecord,
    RepositoryMetadata,
};

/// Root directory entries sent to the prompt for deep onboarding context.
const CONTEXT_FILE_LIMIT: usize = 30;
/// Commits sent to the prompt for deep onboarding context.
const CONTEXT_COMMIT_LIMIT: usize = 10;
/// Page size for the deep context commit fetch.
const CONTEXT_COMMIT_PAGE: u32 = 20;

/// Metadata fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Invalid GitHub repository URL: {0}")]
    InvalidUrl(String),
    #[error("Repository not found or is private: {0}")]
    NotFound(String),
    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Upstream("request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Upstream(format!("connection failed: {}", err))
        } else {
            FetchError::Upstream(err.to_string())
        }
    }
}

/// Parse a repository URL of the form `https://github.com/<owner>/<repo>`.
///
/// A `.git` suffix and a trailing slash are tolerated; anything else fails
/// with [`FetchError::InvalidUrl`] before any network call is made.
pub fn parse_repo_url(input: &str) -> Result<(String, String), FetchError> {
    let invalid = || FetchError::InvalidUrl(input.to_string());

    let parsed = Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => return Err(invalid()),
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    let [owner, repo] = segments.as_slice() else {
        return Err(invalid());
    };

    let repo = repo.trim_end_matches(".git");
    if owner.is_empty() || repo.is_empty() {
        return Err(invalid());
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// Read-only view of the repository source, the seam the orchestrator and
/// controllers depend on.
#[async_trait]
pub trait RepositoryFetcher: Send + Sync {
    /// Assemble a full project skeleton (without an onboarding overview).
    async fn fetch_project(&self, owner: &str, repo: &str) -> Result<ProjectRecord, FetchError>;

    /// Assemble the deep context bundle for synchronous onboarding generation.
    async fn fetch_context(&self, owner: &str, repo: &str)
        -> Result<OnboardingContext, FetchError>;

    /// Fetch fresh partial metadata for an already-tracked repository.
    async fn fetch_metadata(&self, owner: &str, repo: &str)
        -> Result<RepositoryMetadata, FetchError>;
}

/// GitHub REST v3 client.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    commit_page_size: u32,
}

impl GitHubClient {
    pub fn new(config: &GitHubConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("traceback/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            commit_page_size: config.commit_page_size,
        }
    }

    /// Override the base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(header::ACCEPT, "application/vnd.github.v3+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn repository(&self, owner: &str, repo: &str) -> Result<RepoDocument, FetchError> {
        let response = self.get(&format!("/repos/{}/{}", owner, repo)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(format!("{}/{}", owner, repo))),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(FetchError::Upstream(format!(
                    "repository fetch returned {}: {}",
                    status, body
                )))
            }
            _ => Ok(response.json().await?),
        }
    }

    async fn commits(
        &self,
        owner: &str,
        repo: &str,
        per_page: u32,
    ) -> Result<Vec<CommitEntry>, FetchError> {
        let response = self
            .get(&format!("/repos/{}/{}/commits", owner, repo))
            .query(&[("per_page", per_page)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Upstream(format!(
                "commit fetch returned {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Total commit count via the `Link` header of a one-commit page.
    /// Degrades to `None`; the caller falls back to the snapshot length.
    async fn commit_count(&self, owner: &str, repo: &str, branch: &str) -> Option<u64> {
        let response = self
            .get(&format!("/repos/{}/{}/commits", owner, repo))
            .query(&[("sha", branch), ("per_page", "1")])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(owner, repo, status = %response.status(), "Commit count probe failed");
            return None;
        }

        if let Some(link) = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(last) = last_page_from_link(link) {
                return Some(last);
            }
        }

        // No Link header: zero or one commit in total.
        let page: Vec<serde_json::Value> = response.json().await.ok()?;
        Some(page.len() as u64)
    }

    async fn languages(&self, owner: &str, repo: &str) -> Option<BTreeMap<String, u64>> {
        let response = self
            .get(&format!("/repos/{}/{}/languages", owner, repo))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!(owner, repo, status = %response.status(), "Language fetch failed");
            return None;
        }

        response.json().await.ok()
    }

    /// Decoded file content from the contents API, `None` when absent.
    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<String>, FetchError> {
        let response = self
            .get(&format!("/repos/{}/{}/contents/{}", owner, repo, path))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(FetchError::Upstream(format!(
                "contents fetch for {} returned {}",
                path, status
            ))),
            _ => {
                let document: FileDocument = response.json().await?;
                let compact: String = document
                    .content
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(compact)
                    .map_err(|e| FetchError::Upstream(format!("invalid {} payload: {}", path, e)))?;
                let text = String::from_utf8(bytes)
                    .map_err(|e| FetchError::Upstream(format!("invalid {} payload: {}", path, e)))?;
                Ok(Some(text))
            }
        }
    }

    /// Dependency manifest, first match wins: `package.json` then
    /// `requirements.txt`. Degrades to `None` on any failure.
    async fn dependencies(&self, owner: &str, repo: &str) -> Option<DependencyManifest> {
        match self.file_content(owner, repo, "package.json").await {
            Ok(Some(text)) => return parse_npm_manifest(&text),
            Ok(None) => {}
            Err(e) => {
                warn!(owner, repo, error = %e, "Dependency manifest fetch failed");
                return None;
            }
        }

        match self.file_content(owner, repo, "requirements.txt").await {
            Ok(Some(text)) => Some(parse_pip_manifest(&text)),
            Ok(None) => None,
            Err(e) => {
                warn!(owner, repo, error = %e, "Dependency manifest fetch failed");
                None
            }
        }
    }

    async fn readme(&self, owner: &str, repo: &str) -> Option<String> {
        let response = self
            .get(&format!("/repos/{}/{}/readme", owner, repo))
            .header(header::ACCEPT, "application/vnd.github.v3.raw")
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        response.text().await.ok()
    }

    async fn contents_root(&self, owner: &str, repo: &str) -> Result<Vec<String>, FetchError> {
        let response = self
            .get(&format!("/repos/{}/{}/contents", owner, repo))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Upstream(format!(
                "contents listing returned {}",
                response.status()
            )));
        }

        let entries: Vec<ContentsEntry> = response.json().await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }
}

#[async_trait]
impl RepositoryFetcher for GitHubClient {
    async fn fetch_project(&self, owner: &str, repo: &str) -> Result<ProjectRecord, FetchError> {
        let repository = self.repository(owner, repo).await?;

        let (commits, total_commits, languages, dependencies, readme) = tokio::join!(
            self.commits(owner, repo, self.commit_page_size),
            self.commit_count(owner, repo, &repository.default_branch),
            self.languages(owner, repo),
            self.dependencies(owner, repo),
            self.readme(owner, repo),
        );

        let commits: Vec<Commit> = commits?.into_iter().map(CommitEntry::into_commit).collect();
        let total_commits = total_commits.unwrap_or(commits.len() as u64);

        debug!(
            owner,
            repo,
            commits = commits.len(),
            total_commits,
            "Repository data assembled"
        );

        Ok(ProjectRecord {
            id: ProjectRecord::derive_id(owner, repo),
            name: repository.name,
            full_name: repository.full_name,
            description: repository.description,
            url: repository.html_url,
            owner: repository.owner.login,
            stars: repository.stargazers_count,
            forks: repository.forks_count,
            watchers: repository.watchers_count,
            language: repository.language,
            default_branch: repository.default_branch,
            languages: languages.unwrap_or_default(),
            dependencies,
            readme,
            commits,
            total_commits,
            created_at: repository.created_at,
            updated_at: repository.updated_at,
            onboarding_overview: None,
            is_generating: false,
            generation_failed: false,
        })
    }

    async fn fetch_context(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<OnboardingContext, FetchError> {
        let (files, commits) = tokio::join!(
            self.contents_root(owner, repo),
            self.commits(owner, repo, CONTEXT_COMMIT_PAGE),
        );

        let files = files?.into_iter().take(CONTEXT_FILE_LIMIT).collect();
        let commits = commits?
            .into_iter()
            .take(CONTEXT_COMMIT_LIMIT)
            .map(|entry| {
                let commit = entry.into_commit();
                ContextCommit {
                    message: commit.message,
                    author: commit.author,
                }
            })
            .collect();

        Ok(OnboardingContext {
            repo: format!("{}/{}", owner, repo),
            files,
            commits,
        })
    }

    async fn fetch_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, FetchError> {
        let repository = self.repository(owner, repo).await?;

        Ok(RepositoryMetadata {
            name: repository.name,
            description: repository.description,
            url: repository.html_url,
            owner: repository.owner.login,
            stars: repository.stargazers_count,
            forks: repository.forks_count,
            watchers: repository.watchers_count,
            language: repository.language,
            created_at: repository.created_at,
            updated_at: repository.updated_at,
        })
    }
}

/// Extract the `rel="last"` page number from a `Link` header.
fn last_page_from_link(link: &str) -> Option<u64> {
    for part in link.split(',') {
        if !part.contains("rel=\"last\"") {
            continue;
        }
        let target = part.split('<').nth(1)?.split('>').next()?;
        let url = Url::parse(target).ok()?;
        return url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok());
    }
    None
}

fn parse_npm_manifest(text: &str) -> Option<DependencyManifest> {
    let manifest: PackageJson = match serde_json::from_str(text) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!(error = %e, "Unparsable package.json");
            return None;
        }
    };

    Some(DependencyManifest::Npm {
        dependencies: manifest.dependencies,
        dev_dependencies: manifest.dev_dependencies,
    })
}

fn parse_pip_manifest(text: &str) -> DependencyManifest {
    DependencyManifest::Pip {
        requirements: text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

// ── Upstream documents ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RepoDocument {
    name: String,
    full_name: String,
    description: Option<String>,
    html_url: String,
    owner: RepoOwner,
    stargazers_count: u64,
    forks_count: u64,
    watchers_count: u64,
    language: Option<String>,
    default_branch: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RepoOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
    commit: CommitDetail,
}

impl CommitEntry {
    fn into_commit(self) -> Commit {
        let author = self.commit.author.unwrap_or_default();
        Commit {
            sha: Some(self.sha),
            message: self.commit.message,
            author: author.name.unwrap_or_else(|| "unknown".to_string()),
            date: author.date,
            url: self.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Default, Deserialize)]
struct CommitAuthor {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageJson {
    dependencies: BTreeMap<String, String>,
    #[serde(rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FileDocument {
    content: String,
}
