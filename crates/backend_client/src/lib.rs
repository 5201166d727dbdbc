//! HTTP client for the corpus/model-training backend API.
//!
//! Every call is a single-shot request/response against the endpoints the
//! console consumes. Failures are mapped onto [`BackendError`] so screens can
//! present them without caring about transport details: the preprocess
//! endpoint rejects with a structured JSON payload, the train endpoint with a
//! plain-text body, and both shapes are preserved.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use shared::{
    domain::{CorpusId, ModelId},
    error::ApiError,
    protocol::{CorpusDetail, CorpusSummary, ModelSummary},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    Rejected(ApiError),
    #[error("backend returned {status}: {body}")]
    Message { status: StatusCode, body: String },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Operations the console performs against the backend. Implemented by
/// [`HttpBackend`] for production and by scripted fakes in worker tests.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn list_corpora(&self) -> Result<Vec<CorpusSummary>, BackendError>;
    async fn list_models(&self) -> Result<Vec<ModelSummary>, BackendError>;
    async fn get_corpus(&self, corpus_id: CorpusId) -> Result<CorpusDetail, BackendError>;
    async fn preprocess_corpus(&self, corpus_id: CorpusId) -> Result<(), BackendError>;
    async fn train_model(&self, model_id: ModelId) -> Result<(), BackendError>;
}

#[derive(Debug, Serialize)]
struct PreprocessRequest {
    corpus_id: CorpusId,
}

#[derive(Debug, Serialize)]
struct TrainRequest {
    model_id: ModelId,
}

pub struct HttpBackend {
    http: Client,
    server_url: String,
}

impl HttpBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            http: Client::new(),
            server_url,
        }
    }
}

/// Converts a non-success response into the matching error shape: 404 maps to
/// `NotFound`, a decodable `ApiError` body to `Rejected`, anything else to
/// `Message` carrying the raw text.
async fn reject(response: reqwest::Response) -> BackendError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return BackendError::NotFound;
    }
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(payload) => BackendError::Rejected(payload),
        Err(_) => BackendError::Message { status, body },
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn list_corpora(&self) -> Result<Vec<CorpusSummary>, BackendError> {
        let response = self
            .http
            .get(format!("{}/corpus", self.server_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(response.json().await?)
    }

    async fn list_models(&self) -> Result<Vec<ModelSummary>, BackendError> {
        let response = self
            .http
            .get(format!("{}/model", self.server_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(response.json().await?)
    }

    async fn get_corpus(&self, corpus_id: CorpusId) -> Result<CorpusDetail, BackendError> {
        let response = self
            .http
            .get(format!("{}/corpus/{}", self.server_url, corpus_id.0))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(response.json().await?)
    }

    async fn preprocess_corpus(&self, corpus_id: CorpusId) -> Result<(), BackendError> {
        debug!(corpus_id = corpus_id.0, "requesting corpus preprocess");
        let response = self
            .http
            .post(format!("{}/corpus/preprocess", self.server_url))
            .json(&PreprocessRequest { corpus_id })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(())
    }

    async fn train_model(&self, model_id: ModelId) -> Result<(), BackendError> {
        debug!(model_id = model_id.0, "requesting model training");
        let response = self
            .http
            .post(format!("{}/model/train", self.server_url))
            .json(&TrainRequest { model_id })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
