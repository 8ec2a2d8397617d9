//! Change-set resolver: asks the hosting platform which files a pull
//! request touched, and narrows that list down to contributor submissions.
//!
//! This is the only authenticated call the pipeline makes. Without the
//! file list no further work is possible or safe, so every failure here is
//! fatal to the run.

use tracing::{debug, info, instrument};

use dexsync_shared::{ChangeKind, ChangedFile, DexsyncError, Result};

/// User-Agent string for platform requests; the platform rejects
/// anonymous clients.
const USER_AGENT: &str = concat!("dexsync/", env!("CARGO_PKG_VERSION"));

/// Accept header pinning the platform API version.
const ACCEPT: &str = "application/vnd.github.v3+json";

/// Submission pull requests touch a handful of files; one page is plenty.
const PER_PAGE: u32 = 100;

/// Authenticated client for the hosting platform's pull-request API.
pub struct ChangeSetClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl ChangeSetClient {
    /// Create a client for the given API base URL (no trailing slash).
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DexsyncError::platform(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// List the submission files added or modified by a pull request.
    ///
    /// Paths are returned repo-relative, in the order the platform supplied
    /// them. Files outside `dir_prefix`, without the `ext` suffix, or with
    /// any other change kind are dropped.
    #[instrument(skip(self))]
    pub async fn list_changed_submissions(
        &self,
        repository: &str,
        pr_number: u64,
        dir_prefix: &str,
        ext: &str,
    ) -> Result<Vec<String>> {
        let url = format!(
            "{}/repos/{repository}/pulls/{pr_number}/files",
            self.api_base
        );

        let response = self
            .client
            .get(&url)
            .query(&[("per_page", PER_PAGE)])
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", ACCEPT)
            .send()
            .await
            .map_err(|e| DexsyncError::platform(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DexsyncError::platform(format!(
                "listing PR #{pr_number} files: HTTP {status}"
            )));
        }

        let files: Vec<ChangedFile> = response
            .json()
            .await
            .map_err(|e| DexsyncError::platform(format!("{url}: invalid JSON body: {e}")))?;

        let total = files.len();
        let submissions: Vec<String> = files
            .into_iter()
            .filter(|f| matches!(f.status, ChangeKind::Added | ChangeKind::Modified))
            .map(|f| f.filename)
            .filter(|name| name.starts_with(dir_prefix) && name.ends_with(ext))
            .collect();

        debug!(total, kept = submissions.len(), "filtered change set");
        info!(
            pr_number,
            submissions = submissions.len(),
            "resolved change set"
        );

        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pr_files_body() -> serde_json::Value {
        json!([
            {"filename": "submissions/pikachu.yaml", "status": "added"},
            {"filename": "submissions/old-eevee.yaml", "status": "modified"},
            {"filename": "submissions/retired.yaml", "status": "removed"},
            {"filename": "README.md", "status": "modified"},
            {"filename": "submissions/notes.txt", "status": "added"},
            {"filename": "public/data/pokedex_data.json", "status": "modified"}
        ])
    }

    #[tokio::test]
    async fn filters_to_added_or_modified_submissions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ash/pokedex/pulls/7/files"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pr_files_body()))
            .mount(&server)
            .await;

        let client = ChangeSetClient::new(&server.uri(), "tok").unwrap();
        let paths = client
            .list_changed_submissions("ash/pokedex", 7, "submissions/", ".yaml")
            .await
            .unwrap();

        // Order preserved from the API; removed files, non-submission
        // paths, and non-yaml files are all dropped.
        assert_eq!(
            paths,
            vec![
                "submissions/pikachu.yaml".to_string(),
                "submissions/old-eevee.yaml".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn sends_credential_and_accept_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ash/pokedex/pulls/7/files"))
            .and(header("Authorization", "token s3cret"))
            .and(header("Accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChangeSetClient::new(&server.uri(), "s3cret").unwrap();
        let paths = client
            .list_changed_submissions("ash/pokedex", 7, "submissions/", ".yaml")
            .await
            .unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_fatal_with_status_in_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ash/pokedex/pulls/7/files"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = ChangeSetClient::new(&server.uri(), "tok").unwrap();
        let err = client
            .list_changed_submissions("ash/pokedex", 7, "submissions/", ".yaml")
            .await
            .unwrap_err();

        match err {
            DexsyncError::Platform { message } => assert!(message.contains("403")),
            other => panic!("expected Platform error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/ash/pokedex/pulls/7/files"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ChangeSetClient::new(&server.uri(), "tok").unwrap();
        let err = client
            .list_changed_submissions("ash/pokedex", 7, "submissions/", ".yaml")
            .await
            .unwrap_err();
        assert!(matches!(err, DexsyncError::Platform { .. }));
    }
}
