//! Gemini image API client
//!
//! `ImageService` is the seam between the views and the remote API; the
//! worker only sees the trait, so tests run against an in-memory service.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::protocol::{
    AspectRatio, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, PredictRequest,
    PredictResponse,
};
use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::render::ImageArtifact;

/// Remote image generation and editing
pub trait ImageService: Send + Sync + 'static {
    /// Generate an image from a text prompt
    fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> impl Future<Output = AppResult<ImageArtifact>> + Send;

    /// Edit a base64-encoded image following `instruction`
    fn edit_image(
        &self,
        base64: &str,
        mime_type: &str,
        instruction: &str,
    ) -> impl Future<Output = AppResult<ImageArtifact>> + Send;
}

/// REST client for the Gemini / Imagen endpoints
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    generate_model: String,
    edit_model: String,
}

impl GeminiClient {
    /// Create a client from configuration and a resolved API key
    pub fn new(config: &AppConfig, api_key: Option<String>) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        if api_key.is_none() {
            warn!("No API key configured; requests will fail until one is provided");
        }

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            generate_model: config.generate_model.clone(),
            edit_model: config.edit_model.clone(),
        })
    }

    /// Endpoint URL for `model:method`
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// POST a JSON body and return the raw success body
    async fn post_json<B: Serialize>(&self, model: &str, method: &str, body: &B) -> AppResult<Vec<u8>> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Remote("API key is not configured. Set GEMINI_API_KEY or pass --api-key.".to_string())
        })?;
        let payload = serde_json::to_vec(body)
            .map_err(|e| AppError::Remote(format!("Failed to encode request: {}", e)))?;

        let url = self.endpoint(model, method);
        debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = ErrorEnvelope::message_from(&bytes)
                .unwrap_or_else(|| format!("Request failed with status {}", status));
            warn!("{} returned {}: {}", url, status, message);
            return Err(AppError::Remote(message));
        }

        Ok(bytes.to_vec())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Remote("The request timed out. Please try again.".to_string())
    } else if e.is_connect() {
        AppError::Remote(format!("Could not reach the image service: {}", e))
    } else {
        AppError::Remote(e.to_string())
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::Remote(format!("Unexpected response: {}", e)))
}

/// Extract the image from a `:predict` response body
fn artifact_from_predict(body: &[u8]) -> AppResult<ImageArtifact> {
    let response: PredictResponse = parse_body(body)?;
    let prediction = response
        .predictions
        .into_iter()
        .find(|p| p.bytes_base64_encoded.is_some())
        .ok_or_else(|| AppError::Remote("Image generation failed: no image was returned.".to_string()))?;

    let data = prediction.bytes_base64_encoded.unwrap_or_default();
    let mime = prediction.mime_type.unwrap_or_else(|| "image/jpeg".to_string());
    non_empty(ImageArtifact::from_base64(&data, &mime)?)
}

fn non_empty(artifact: ImageArtifact) -> AppResult<ImageArtifact> {
    if artifact.is_empty() {
        return Err(AppError::Remote("The service returned an empty image.".to_string()));
    }
    Ok(artifact)
}

/// Extract the image from a `:generateContent` response body
fn artifact_from_generate_content(body: &[u8]) -> AppResult<ImageArtifact> {
    let response: GenerateContentResponse = parse_body(body)?;
    match response.first_image() {
        Some(image) => non_empty(ImageArtifact::from_base64(&image.data, &image.mime_type)?),
        None => Err(AppError::Remote(match response.text() {
            Some(text) => format!("Image editing failed: {}", text),
            None => "Image editing failed: no image was returned.".to_string(),
        })),
    }
}

impl ImageService for GeminiClient {
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> AppResult<ImageArtifact> {
        info!("Generating image ({}): {}", aspect_ratio.as_str(), prompt);
        let request = PredictRequest::new(prompt, aspect_ratio);
        let body = self.post_json(&self.generate_model, "predict", &request).await?;
        let artifact = artifact_from_predict(&body)?;
        info!("Generated {} ({} bytes)", artifact.mime_type(), artifact.len());
        Ok(artifact)
    }

    async fn edit_image(&self, base64: &str, mime_type: &str, instruction: &str) -> AppResult<ImageArtifact> {
        info!("Editing {} image: {}", mime_type, instruction);
        let request = GenerateContentRequest::edit(base64, mime_type, instruction);
        let body = self.post_json(&self.edit_model, "generateContent", &request).await?;
        let artifact = artifact_from_generate_content(&body)?;
        info!("Edited image: {} ({} bytes)", artifact.mime_type(), artifact.len());
        Ok(artifact)
    }
}
