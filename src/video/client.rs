//! Sora video generation client: submission, polling and media resolution.

use crate::config::ClientConfig;
use crate::credential::Credential;
use crate::error::{Result, SoraChatError};
use crate::http::HttpTransport;
use crate::video::error_detail::failure_detail;
use crate::video::media::find_media_url;
use crate::video::types::{
    LocalVideo, MediaSource, PollStep, RemoteStatus, SoraRequest, VideoJob, VideoJobState,
    VideoRequest,
};
use crate::video::waiter::{PollWaiter, TokioWaiter};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const VIDEOS_PATH: &str = "videos";

/// Default wait between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of status checks before giving up (15 minutes at 5s).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 180;

/// Builder for VideoClient.
#[derive(Clone)]
pub struct VideoClientBuilder {
    config: ClientConfig,
    poll_interval: Duration,
    max_attempts: u32,
    waiter: Arc<dyn PollWaiter>,
}

impl Default for VideoClientBuilder {
    fn default() -> Self {
        Self {
            config: ClientConfig::from_env(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            waiter: Arc::new(TokioWaiter),
        }
    }
}

impl VideoClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the connection settings.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    /// Sets the polling interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the maximum number of status checks.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Replaces how the loop waits between attempts.
    pub fn waiter(mut self, waiter: Arc<dyn PollWaiter>) -> Self {
        self.waiter = waiter;
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<VideoClient> {
        Ok(VideoClient {
            transport: HttpTransport::new(&self.config)?,
            poll_interval: self.poll_interval,
            max_attempts: self.max_attempts,
            waiter: self.waiter,
        })
    }
}

/// Submits video jobs and drives them to completion.
#[derive(Clone)]
pub struct VideoClient {
    transport: HttpTransport,
    poll_interval: Duration,
    max_attempts: u32,
    waiter: Arc<dyn PollWaiter>,
}

impl VideoClient {
    /// Creates a new `VideoClientBuilder`.
    pub fn builder() -> VideoClientBuilder {
        VideoClientBuilder::new()
    }

    /// Wait between status checks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Maximum number of status checks per `poll` call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Submits a generation request.
    ///
    /// The returned job is `Completed` if the provider answered synchronously,
    /// `Queued`/`InProgress` if it must be polled, or `Submitted` when the
    /// response had no recognizable status (inspect [`VideoJob::payload`]).
    /// A synchronous completion whose content download fails comes back
    /// `Failed`, with the cause in [`VideoJob::error_detail`].
    pub async fn submit(&self, request: &VideoRequest, credential: &Credential) -> Result<VideoJob> {
        if request.prompt.trim().is_empty() {
            return Err(SoraChatError::InvalidRequest("prompt is empty".into()));
        }

        let body = SoraRequest::from_request(request);
        let payload: Value = self
            .transport
            .post_json(VIDEOS_PATH, &body, credential, "API request failed")
            .await?;

        let mut job = VideoJob::new(request);
        job.absorb(&payload);
        let status = RemoteStatus::from_payload(&payload);

        if status == RemoteStatus::Completed || find_media_url(&payload).is_some() {
            return match self.settle_completed(&mut job, &payload, credential).await {
                Ok(()) => {
                    tracing::debug!(video_id = ?job.id(), "video completed on submission");
                    Ok(job)
                }
                // The job is Failed and keeps its id and error detail.
                Err(SoraChatError::ContentFetch(_)) => Ok(job),
                Err(e) => Err(e),
            };
        }

        match status {
            RemoteStatus::Queued | RemoteStatus::InProgress => {
                if job.id().is_none() {
                    return Err(SoraChatError::Protocol(
                        "video ID not provided in response".into(),
                    ));
                }
                job.transition(pending_state(&status));
                tracing::debug!(
                    video_id = ?job.id(),
                    status = %job.state(),
                    "submitted Sora video generation request"
                );
            }
            _ => {
                tracing::debug!(video_id = ?job.id(), "video submission accepted without a known status");
            }
        }

        Ok(job)
    }

    /// Performs one status check and applies the resulting transition.
    ///
    /// A terminal job is left unchanged. A reported failure marks the job
    /// `Failed` and returns [`SoraChatError::Remote`].
    pub async fn poll_once(&self, job: &mut VideoJob, credential: &Credential) -> Result<PollStep> {
        if job.is_terminal() {
            return Ok(PollStep::Finished);
        }
        let id = job
            .id()
            .ok_or_else(|| SoraChatError::Protocol("cannot poll a video job without an id".into()))?
            .to_string();

        job.record_attempt();
        let payload: Value = self
            .transport
            .get_json(
                &format!("{VIDEOS_PATH}/{id}"),
                credential,
                "Failed to check video status",
            )
            .await?;
        job.absorb(&payload);

        let status = RemoteStatus::from_payload(&payload);
        tracing::debug!(
            video_id = %id,
            status = ?status,
            progress = job.progress(),
            attempt = job.attempts(),
            "polling Sora video generation"
        );

        match status {
            RemoteStatus::Completed => {
                self.settle_completed(job, &payload, credential).await?;
                Ok(PollStep::Finished)
            }
            RemoteStatus::Failed => {
                let detail = failure_detail(&payload);
                tracing::warn!(video_id = %id, detail = %detail, "video generation failed");
                job.fail(detail.clone());
                Err(SoraChatError::Remote(detail))
            }
            RemoteStatus::Queued | RemoteStatus::InProgress => {
                job.transition(pending_state(&status));
                Ok(PollStep::Pending)
            }
            RemoteStatus::Unknown(other) => Err(SoraChatError::Protocol(format!(
                "unknown video status: {other}"
            ))),
        }
    }

    /// Polls until the job is terminal, waiting between attempts.
    ///
    /// Dropping the returned future between attempts abandons the job.
    pub async fn poll(&self, job: &mut VideoJob, credential: &Credential) -> Result<()> {
        if job.is_terminal() {
            return Ok(());
        }

        for attempt in 1..=self.max_attempts {
            if self.poll_once(job, credential).await? == PollStep::Finished {
                return Ok(());
            }
            if attempt < self.max_attempts {
                self.waiter.wait(self.poll_interval).await;
            }
        }

        job.transition(VideoJobState::TimedOut);
        tracing::warn!(
            video_id = ?job.id(),
            attempts = self.max_attempts,
            "video generation timed out"
        );
        Err(SoraChatError::Timeout {
            attempts: self.max_attempts,
        })
    }

    /// Submits and polls to completion.
    ///
    /// Like [`VideoClient::submit`], a synchronous completion whose download
    /// fails is returned as a `Failed` job rather than an error.
    pub async fn generate(&self, request: &VideoRequest, credential: &Credential) -> Result<VideoJob> {
        let mut job = self.submit(request, credential).await?;
        if matches!(job.state(), VideoJobState::Queued | VideoJobState::InProgress) {
            self.poll(&mut job, credential).await?;
        }
        Ok(job)
    }

    /// Resolves a playable media source from a job payload.
    ///
    /// Falls back to downloading `/videos/{id}/content` when a completed
    /// payload carries no direct URL.
    pub async fn resolve_media(&self, payload: &Value, credential: &Credential) -> Result<MediaSource> {
        self.resolve_with_id(payload, None, credential).await
    }

    /// Resolves media for a remotely completed job, then completes it.
    /// If the media cannot be resolved the job is marked `Failed`.
    async fn settle_completed(
        &self,
        job: &mut VideoJob,
        payload: &Value,
        credential: &Credential,
    ) -> Result<()> {
        let id = job.id().map(str::to_owned);
        match self.resolve_with_id(payload, id.as_deref(), credential).await {
            Ok(media) => {
                job.complete(media);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(video_id = ?id, "video completed but media is unavailable: {e}");
                job.fail(e.to_string());
                Err(e)
            }
        }
    }

    async fn resolve_with_id(
        &self,
        payload: &Value,
        known_id: Option<&str>,
        credential: &Credential,
    ) -> Result<MediaSource> {
        if let Some(url) = find_media_url(payload) {
            return Ok(MediaSource::Remote(url));
        }

        let completed = RemoteStatus::from_payload(payload) == RemoteStatus::Completed;
        let id = payload.get("id").and_then(Value::as_str).or(known_id);
        match (completed, id) {
            (true, Some(id)) => self.download(id, credential).await.map(MediaSource::Downloaded),
            _ => Err(SoraChatError::Protocol(
                "no media URL in response and no completed video to download".into(),
            )),
        }
    }

    /// Download the video via the content endpoint.
    async fn download(&self, video_id: &str, credential: &Credential) -> Result<LocalVideo> {
        tracing::debug!(video_id = %video_id, "retrieving completed video content");
        let body = self
            .transport
            .get_bytes(
                &format!("{VIDEOS_PATH}/{video_id}/content"),
                credential,
                "Failed to retrieve video content",
            )
            .await
            .map_err(|e| SoraChatError::ContentFetch(e.to_string()))?;

        let mime_type = body
            .content_type
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .unwrap_or_else(|| "video/mp4".to_string());
        Ok(LocalVideo::new(body.data, mime_type))
    }
}

fn pending_state(status: &RemoteStatus) -> VideoJobState {
    match status {
        RemoteStatus::InProgress => VideoJobState::InProgress,
        _ => VideoJobState::Queued,
    }
}
