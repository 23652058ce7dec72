//! reqwest-backed implementation of the collaborator traits.

use crate::wire::{
    ComparisonListRes, ComparisonRes, CreateComparisonReq, PhotoListRes, RedFlagListRes,
    SaveSectionReq,
};
use blueprint_core::constants::{
    BLUEPRINT_PATH, BLUEPRINT_SECTIONS_PATH, MONITOR_RED_FLAGS_PATH, VAULT_COMPARISONS_PATH,
    VAULT_PHOTOS_PATH,
};
use blueprint_core::monitor::RedFlag;
use blueprint_core::vault::{Comparison, Photo};
use blueprint_core::{
    BlueprintDocument, BlueprintError, BlueprintResult, BlueprintStore, ClientConfig,
    MonitorStore, SectionKey, SectionRecord, VaultStore,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// HTTP+JSON data collaborator.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpCollaborator {
    client: reqwest::Client,
    cfg: ClientConfig,
}

impl HttpCollaborator {
    /// Build a collaborator for the API at `cfg.base_url()`.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Transport`] if the HTTP client cannot be constructed (for
    /// example, when no TLS backend is available).
    pub fn new(cfg: ClientConfig) -> BlueprintResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(transport)?;
        Ok(Self { client, cfg })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.cfg.endpoint(path))
    }

    /// Send `req`, mapping non-2xx statuses to errors, and return the raw body.
    async fn send(&self, req: RequestBuilder, what: &str) -> BlueprintResult<Vec<u8>> {
        let response = req.send().await.map_err(transport)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlueprintError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            tracing::debug!("{} responded with {}", what, status);
            return Err(BlueprintError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BlueprintResult<T> {
        let body = self.send(self.request(Method::GET, path), path).await?;
        decode(&body, path)
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> BlueprintResult<Vec<u8>> {
        let payload = serde_json::to_vec(body).map_err(BlueprintError::Serialization)?;
        let req = self
            .request(method, path)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);
        self.send(req, path).await
    }
}

fn transport(err: reqwest::Error) -> BlueprintError {
    BlueprintError::Transport(err.to_string())
}

/// Decode a JSON body, reporting the failing path on a shape mismatch.
///
/// Anything after the first JSON value other than whitespace is rejected.
fn decode<T: DeserializeOwned>(body: &[u8], what: &str) -> BlueprintResult<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        if source.is_syntax() || source.is_eof() {
            return BlueprintError::Deserialization(source);
        }
        BlueprintError::Schema(format!("{what} response mismatch at {path}: {source}"))
    })?;
    deserializer.end().map_err(BlueprintError::Deserialization)?;
    Ok(value)
}

impl BlueprintStore for HttpCollaborator {
    async fn fetch_blueprint(&self) -> BlueprintResult<BlueprintDocument> {
        let raw: Value = self.get_json(BLUEPRINT_PATH).await?;
        Ok(BlueprintDocument::new(raw))
    }

    async fn save_section(&self, key: SectionKey, record: &SectionRecord) -> BlueprintResult<()> {
        let path = format!("{BLUEPRINT_SECTIONS_PATH}/{}", key.to_wire());
        let body = SaveSectionReq {
            data: record.to_wire(),
        };
        self.send_json(Method::PUT, &path, &body).await?;
        Ok(())
    }
}

impl VaultStore for HttpCollaborator {
    async fn list_photos(&self) -> BlueprintResult<Vec<Photo>> {
        let res: PhotoListRes = self.get_json(VAULT_PHOTOS_PATH).await?;
        Ok(res.photos)
    }

    async fn list_comparisons(&self) -> BlueprintResult<Vec<Comparison>> {
        let res: ComparisonListRes = self.get_json(VAULT_COMPARISONS_PATH).await?;
        Ok(res.comparisons)
    }

    async fn create_comparison(
        &self,
        before_photo_id: &str,
        after_photo_id: &str,
    ) -> BlueprintResult<Comparison> {
        let body = CreateComparisonReq {
            before_photo_id,
            after_photo_id,
        };
        let raw = self
            .send_json(Method::POST, VAULT_COMPARISONS_PATH, &body)
            .await?;
        let res: ComparisonRes = decode(&raw, VAULT_COMPARISONS_PATH)?;
        Ok(res.comparison)
    }

    async fn delete_comparison(&self, id: &str) -> BlueprintResult<()> {
        let path = format!("{VAULT_COMPARISONS_PATH}/{id}");
        self.send(self.request(Method::DELETE, &path), &path).await?;
        Ok(())
    }
}

impl MonitorStore for HttpCollaborator {
    async fn list_red_flags(&self) -> BlueprintResult<Vec<RedFlag>> {
        let res: RedFlagListRes = self.get_json(MONITOR_RED_FLAGS_PATH).await?;
        Ok(res.red_flags)
    }
}
