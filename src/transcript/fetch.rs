//! Transcript fetching via a hosted captions API.

use super::{TranscriptCleaner, TranscriptSegment, TranscriptSource};
use crate::config::TranscriptSettings;
use crate::error::{AskTubeError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Transcript source backed by a RapidAPI captions endpoint.
///
/// Using a hosted API avoids the IP blocking that hits direct caption
/// scraping from cloud environments.
pub struct RapidApiTranscriptSource {
    client: reqwest::Client,
    api_url: String,
    api_host: String,
    api_key: String,
    cleaner: TranscriptCleaner,
}

/// Wire format of the captions API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    transcript: Vec<ApiSegment>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSegment {
    #[serde(default)]
    text: String,
    /// This API reports segment start time as "offset".
    #[serde(default)]
    offset: f64,
}

impl RapidApiTranscriptSource {
    /// Create a new source from settings.
    ///
    /// The API key comes from settings or the `RAPIDAPI_KEY` environment
    /// variable; missing key is a configuration error.
    pub fn new(settings: &TranscriptSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .or_else(|| std::env::var("RAPIDAPI_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AskTubeError::Config(
                    "Transcript API key not set. Set it with: export RAPIDAPI_KEY='...'"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            api_host: settings.api_host.clone(),
            api_key,
            cleaner: TranscriptCleaner::new(),
        })
    }
}

#[async_trait]
impl TranscriptSource for RapidApiTranscriptSource {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        debug!("Fetching transcript for {}", video_id);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("videoId", video_id)])
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(AskTubeError::TranscriptUnavailable(format!(
                    "No transcript available for {}",
                    video_id
                )));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(AskTubeError::TranscriptFetch(
                    "Transcript API quota exceeded".to_string(),
                ));
            }
            status if !status.is_success() => {
                return Err(AskTubeError::TranscriptFetch(format!(
                    "Transcript API returned {}",
                    status
                )));
            }
            _ => {}
        }

        let body: ApiResponse = response.json().await?;

        if body.transcript.is_empty() {
            let detail = body
                .error
                .or(body.message)
                .unwrap_or_else(|| "empty response".to_string());
            warn!("No transcript segments for {}: {}", video_id, detail);
            return Err(AskTubeError::TranscriptUnavailable(format!(
                "No transcript found for {}",
                video_id
            )));
        }

        let segments: Vec<TranscriptSegment> = body
            .transcript
            .into_iter()
            .filter_map(|seg| {
                let text = self.cleaner.clean(&seg.text);
                if text.is_empty() {
                    None
                } else {
                    Some(TranscriptSegment::new(text, seg.offset))
                }
            })
            .collect();

        if segments.is_empty() {
            return Err(AskTubeError::TranscriptUnavailable(
                "Transcript segments were empty after cleaning".to_string(),
            ));
        }

        info!("Fetched {} transcript segments for {}", segments.len(), video_id);
        Ok(segments)
    }
}
