//! GitHub-backed reading store
//!
//! Persists the collection as a JSON file in a repository via the contents
//! API. Every write is a full-file rewrite guarded by the file's `sha`
//! revision token: the sha observed on read must accompany the PUT, and a
//! stale sha comes back as 409. Mutating operations retry the whole
//! read-modify-write cycle a bounded number of times on conflict before
//! giving up.

use super::{merge_readings, ReadingStore};
use crate::config::GitHubConfig;
use crate::error::{Error, Result};
use crate::models::{Reading, ReadingPatch};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const API_TIMEOUT: Duration = Duration::from_secs(30);
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// Encode file content for the contents API.
pub fn encode_content(content: &str) -> String {
    BASE64.encode(content.as_bytes())
}

/// Decode file content returned by the contents API.
///
/// The API wraps base64 across lines, so whitespace is stripped first. The
/// decoded bytes must be UTF-8; going through bytes (rather than a
/// char-per-byte pairing) is what keeps non-ASCII content intact across a
/// round trip.
pub fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| Error::ContentDecode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::ContentDecode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ContentsFile {
    #[serde(default)]
    content: Option<String>,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Contents-API-backed reading store
pub struct GitHubStore {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    branch: String,
    file_path: String,
    token: String,
    conflict_retries: u32,
}

impl GitHubStore {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let token = config.token().ok_or_else(|| {
            Error::Config(format!(
                "No GitHub token cached in the config or set in ${}",
                config.token_env
            ))
        })?;

        let client = Client::builder()
            .user_agent(format!("pagemark/{}", env!("CARGO_PKG_VERSION")))
            .timeout(API_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            file_path: config.file_path.clone(),
            token,
            conflict_retries: config.conflict_retries,
        })
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, self.file_path
        )
    }

    async fn get_file(&self) -> Result<ContentsFile> {
        let url = self.contents_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Revision token of the current file, if it exists. Any failure here
    /// means "no token": the subsequent PUT will create the file.
    async fn current_sha(&self) -> Option<String> {
        self.get_file().await.ok().map(|file| file.sha)
    }

    /// Ensure the readings file exists, creating it empty when the GET
    /// reports not-found. Any other failure propagates.
    pub async fn init(&self) -> Result<()> {
        match self.list_readings().await {
            Ok(_) => Ok(()),
            Err(e) if e.is_remote_not_found() => {
                debug!("Readings file missing, creating it");
                self.save_readings(&[], "Create readings file").await
            }
            Err(e) => Err(e),
        }
    }

    /// Run a read-modify-write cycle, retrying on a stale revision token.
    /// `mutate` returns the commit message for the resulting write.
    async fn with_conflict_retry<F>(&self, mutate: F) -> Result<Vec<Reading>>
    where
        F: Fn(&mut Vec<Reading>) -> Result<String> + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let mut readings = self.list_readings().await?;
            let message = mutate(&mut readings)?;
            match self.save_readings(&readings, &message).await {
                Ok(()) => return Ok(readings),
                Err(e) if e.is_remote_conflict() && attempt < self.conflict_retries => {
                    attempt += 1;
                    warn!(
                        "Stale revision token, retrying write ({}/{})",
                        attempt, self.conflict_retries
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl ReadingStore for GitHubStore {
    async fn list_readings(&self) -> Result<Vec<Reading>> {
        let file = self.get_file().await?;
        let decoded = decode_content(file.content.as_deref().unwrap_or_default())?;
        if decoded.trim().is_empty() {
            return Ok(Vec::new());
        }
        let readings: Vec<Reading> = serde_json::from_str(&decoded)?;
        debug!("Fetched {} readings from GitHub", readings.len());
        Ok(readings)
    }

    async fn save_readings(&self, readings: &[Reading], message: &str) -> Result<()> {
        let sha = self.current_sha().await;
        let content = encode_content(&serde_json::to_string_pretty(readings)?);

        let url = self.contents_url();
        debug!("PUT {} ({})", url, message);

        let body = PutBody {
            message,
            content,
            branch: &self.branch,
            sha,
        };

        let response = self
            .client
            .put(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn add_reading(&self, reading: Reading) -> Result<Vec<Reading>> {
        self.with_conflict_retry(|readings| {
            readings.insert(0, reading.clone());
            Ok(format!("Add reading: {}", reading.title))
        })
        .await
    }

    async fn delete_reading(&self, id: &str) -> Result<Vec<Reading>> {
        self.with_conflict_retry(|readings| {
            let before = readings.len();
            readings.retain(|r| r.id != id);
            if readings.len() == before {
                return Err(Error::ReadingNotFound(id.to_string()));
            }
            Ok(format!("Delete reading: {}", id))
        })
        .await
    }

    async fn update_reading(&self, id: &str, patch: &ReadingPatch) -> Result<Vec<Reading>> {
        self.with_conflict_retry(|readings| {
            let Some(reading) = readings.iter_mut().find(|r| r.id == id) else {
                return Err(Error::ReadingNotFound(id.to_string()));
            };
            patch.apply(reading);
            Ok(format!("Update reading: {}", reading.title))
        })
        .await
    }

    async fn sync(&self, local: &[Reading]) -> Result<Vec<Reading>> {
        let remote = self.list_readings().await?;
        let remote_count = remote.len();
        let merged = merge_readings(remote, local);
        if merged.len() != remote_count {
            self.save_readings(&merged, "Sync local readings with GitHub")
                .await?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CONTENTS_PATH: &str = "/repos/jkevinxu/github-blog/contents/_data/readings.json";

    fn store_config(api_base: &str, conflict_retries: u32) -> GitHubConfig {
        GitHubConfig {
            owner: "jkevinxu".to_string(),
            repo: "github-blog".to_string(),
            api_base: api_base.to_string(),
            token: Some("test-token".to_string()),
            conflict_retries,
            ..Default::default()
        }
    }

    fn reading(id: &str, title: &str, url: &str, day: u32) -> Reading {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        let (date, date_added) = Reading::format_dates(timestamp);
        Reading {
            id: id.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            summary: String::new(),
            highlights: Vec::new(),
            notes: String::new(),
            tags: Vec::new(),
            timestamp,
            date,
            date_added,
            domain: String::new(),
            favicon: String::new(),
        }
    }

    fn contents_response(readings: &[Reading], sha: &str) -> serde_json::Value {
        let json = serde_json::to_string_pretty(readings).unwrap();
        serde_json::json!({
            "content": encode_content(&json),
            "sha": sha,
        })
    }

    #[test]
    fn test_content_round_trips_non_ascii() {
        let original = "café ☕ — 日本語のタイトル, piñata";
        assert_eq!(decode_content(&encode_content(original)).unwrap(), original);
    }

    #[test]
    fn test_decode_strips_embedded_newlines() {
        // The API wraps base64 at 60 columns
        let encoded = encode_content("{\"hello\": \"world and some padding text\"}");
        let wrapped = format!("{}\n{}\n", &encoded[..20], &encoded[20..]);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "{\"hello\": \"world and some padding text\"}"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_content("!!not base64!!").is_err());
    }

    #[tokio::test]
    async fn test_list_readings_decodes_collection() {
        let mock_server = MockServer::start().await;
        let readings = vec![reading("1", "Árvíztűrő tükörfúrógép", "https://a.com", 1)];

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&readings, "abc123")),
            )
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let listed = store.list_readings().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Árvíztűrő tükörfúrógép");
    }

    #[tokio::test]
    async fn test_list_readings_propagates_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let err = store.list_readings().await.unwrap_err();
        match err {
            Error::Remote { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_init_creates_missing_file_once() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        store.init().await.unwrap();

        // The single PUT creates the empty collection without a revision
        // token (there is no file to supersede).
        let requests = mock_server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.to_string() == "PUT")
            .expect("no PUT recorded");
        let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
        assert!(body.get("sha").is_none());
        let content = decode_content(body["content"].as_str().unwrap()).unwrap();
        let created: Vec<Reading> = serde_json::from_str(&content).unwrap();
        assert!(created.is_empty());
    }

    #[tokio::test]
    async fn test_init_noop_when_file_exists() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&[], "abc123")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        store.init().await.unwrap();
    }

    #[tokio::test]
    async fn test_init_propagates_other_failures() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let err = store.init().await.unwrap_err();
        assert!(matches!(err, Error::Remote { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_save_attaches_current_sha() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&[], "shasha1")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        store
            .save_readings(&[reading("1", "A", "https://a.com", 1)], "Update readings")
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.to_string() == "PUT")
            .expect("no PUT recorded");
        let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
        assert_eq!(body["sha"], "shasha1");
        assert_eq!(body["message"], "Update readings");
        assert_eq!(body["branch"], "main");
    }

    #[tokio::test]
    async fn test_add_retries_conflict_then_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&[], "stale")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_string("sha mismatch"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 1)).unwrap();
        let err = store
            .add_reading(reading("1", "A", "https://a.com", 1))
            .await
            .unwrap_err();
        assert!(err.is_remote_conflict());
    }

    #[tokio::test]
    async fn test_add_inserts_at_head_and_sets_commit_message() {
        let mock_server = MockServer::start().await;
        let existing = vec![reading("1", "A", "https://a.com", 1)];

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&existing, "abc")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let readings = store
            .add_reading(reading("2", "B", "https://b.com", 2))
            .await
            .unwrap();
        assert_eq!(readings[0].id, "2");
        assert_eq!(readings[1].id, "1");

        let requests = mock_server.received_requests().await.unwrap();
        let put = requests
            .iter()
            .find(|r| r.method.to_string() == "PUT")
            .expect("no PUT recorded");
        let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
        assert_eq!(body["message"], "Add reading: B");
    }

    #[tokio::test]
    async fn test_sync_writes_back_when_count_changed() {
        let mock_server = MockServer::start().await;
        let remote = vec![reading("1", "A", "https://a.com", 1)];

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&remote, "abc")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let local = vec![
            reading("1", "A", "https://a.com", 1),
            reading("2", "B", "https://b.com", 2),
        ];
        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let merged = store.sync(&local).await.unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "2");
        assert_eq!(merged[1].id, "1");
    }

    #[tokio::test]
    async fn test_sync_skips_write_when_unchanged() {
        let mock_server = MockServer::start().await;
        let remote = vec![
            reading("1", "A", "https://a.com", 1),
            reading("2", "B", "https://b.com", 2),
        ];

        Mock::given(method("GET"))
            .and(path(CONTENTS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(contents_response(&remote, "abc")),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path(CONTENTS_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let local = vec![reading("1", "A", "https://a.com", 1)];
        let store = GitHubStore::new(&store_config(&mock_server.uri(), 2)).unwrap();
        let merged = store.sync(&local).await.unwrap();
        assert_eq!(merged.len(), 2);
    }
}
