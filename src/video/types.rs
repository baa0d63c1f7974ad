//! Core types for video generation jobs.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Default video model.
pub const DEFAULT_VIDEO_MODEL: &str = "sora-2";

/// A request to generate a video.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    /// Model identifier.
    pub model: String,
    /// The text prompt describing the desired video.
    pub prompt: String,
    /// Desired duration in seconds (snapped to 4, 8 or 12 on the wire).
    pub duration_secs: Option<u32>,
    /// Resolution as `WIDTHxHEIGHT` (e.g. "1280x720").
    pub resolution: Option<String>,
}

impl VideoRequest {
    /// Creates a new request with the given prompt and the default model.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_VIDEO_MODEL.to_string(),
            prompt: prompt.into(),
            duration_secs: None,
            resolution: None,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the desired video duration in seconds.
    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Sets the resolution.
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }
}

/// Lifecycle state of a video job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoJobState {
    /// Accepted, but the response carried no recognizable status.
    Submitted,
    /// Waiting for the provider to start.
    Queued,
    /// Being generated.
    InProgress,
    /// Media resolved and playable.
    Completed,
    /// The provider reported failure, or the content could not be retrieved.
    Failed,
    /// Gave up after the polling ceiling.
    TimedOut,
}

impl VideoJobState {
    /// Returns true for `Completed`, `Failed` and `TimedOut`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::TimedOut)
    }
}

impl std::fmt::Display for VideoJobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        };
        f.write_str(s)
    }
}

/// Status string reported by the remote, folded onto the states we act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RemoteStatus {
    Queued,
    InProgress,
    Completed,
    Failed,
    Unknown(String),
}

impl RemoteStatus {
    pub(crate) fn from_payload(payload: &Value) -> Self {
        match payload.get("status").and_then(Value::as_str) {
            Some("queued") => Self::Queued,
            Some("in_progress") => Self::InProgress,
            Some("completed") | Some("succeeded") => Self::Completed,
            Some("failed") | Some("error") => Self::Failed,
            Some(other) => Self::Unknown(other.to_string()),
            None => Self::Unknown("<missing>".to_string()),
        }
    }
}

/// Video bytes fetched from the content endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVideo {
    /// Raw video bytes.
    pub data: Vec<u8>,
    /// MIME type (e.g., "video/mp4").
    pub mime_type: String,
}

impl LocalVideo {
    /// Creates a new local video.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Returns the size of the video data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the video to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Encodes the video data as base64.
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    /// Returns the video as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Where a completed video can be played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// URL returned directly by the provider.
    Remote(String),
    /// Content downloaded because the provider returned no URL.
    Downloaded(LocalVideo),
}

impl MediaSource {
    /// Returns a playable URL: the remote URL, or a data URL for downloads.
    pub fn url(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Downloaded(video) => video.to_data_url(),
        }
    }
}

/// Outcome of a single status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Still queued or in progress.
    Pending,
    /// The job reached a terminal state.
    Finished,
}

/// A video generation job, advanced only by [`VideoClient`](crate::video::VideoClient).
#[derive(Debug, Clone)]
pub struct VideoJob {
    id: Option<String>,
    state: VideoJobState,
    progress: Option<u8>,
    media: Option<MediaSource>,
    error_detail: Option<String>,
    model: String,
    prompt: String,
    revised_prompt: Option<String>,
    attempts: u32,
    payload: Value,
}

impl VideoJob {
    pub(crate) fn new(request: &VideoRequest) -> Self {
        Self {
            id: None,
            state: VideoJobState::Submitted,
            progress: None,
            media: None,
            error_detail: None,
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            revised_prompt: None,
            attempts: 0,
            payload: Value::Null,
        }
    }

    /// Rebuilds a handle for a job submitted earlier, so it can be polled.
    pub fn resume(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            state: VideoJobState::Submitted,
            progress: None,
            media: None,
            error_detail: None,
            model: String::new(),
            prompt: String::new(),
            revised_prompt: None,
            attempts: 0,
            payload: Value::Null,
        }
    }

    /// Job id assigned by the provider.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current state.
    pub fn state(&self) -> VideoJobState {
        self.state
    }

    /// Whether the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Last reported progress (0-100).
    pub fn progress(&self) -> Option<u8> {
        self.progress
    }

    /// Resolved media, present once `Completed`.
    pub fn media(&self) -> Option<&MediaSource> {
        self.media.as_ref()
    }

    /// Playable URL, present once `Completed`.
    pub fn media_url(&self) -> Option<String> {
        self.media.as_ref().map(MediaSource::url)
    }

    /// Normalized failure detail, present only when `Failed`.
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// Model the job was submitted with (reported model when resumed).
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Prompt the job was submitted with.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Prompt as rewritten by the provider, if reported.
    pub fn revised_prompt(&self) -> Option<&str> {
        self.revised_prompt.as_deref()
    }

    /// Number of status checks performed so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Last raw payload received for this job.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Records the fields of a submission or status payload.
    pub(crate) fn absorb(&mut self, payload: &Value) {
        if let Some(id) = payload.get("id").and_then(Value::as_str) {
            match &self.id {
                None => self.id = Some(id.to_string()),
                Some(existing) if existing != id => {
                    tracing::warn!(job_id = %existing, reported = %id, "ignoring changed video id");
                }
                Some(_) => {}
            }
        }
        if let Some(progress) = payload.get("progress").and_then(Value::as_f64) {
            self.progress = Some(progress.clamp(0.0, 100.0).round() as u8);
        }
        if self.model.is_empty() {
            if let Some(model) = payload.get("model").and_then(Value::as_str) {
                self.model = model.to_string();
            }
        }
        if self.prompt.is_empty() {
            if let Some(prompt) = payload.get("prompt").and_then(Value::as_str) {
                self.prompt = prompt.to_string();
            }
        }
        if let Some(revised) = payload.get("revised_prompt").and_then(Value::as_str) {
            self.revised_prompt = Some(revised.to_string());
        }
        self.payload = payload.clone();
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Moves to `next` unless already terminal. Returns whether it moved.
    pub(crate) fn transition(&mut self, next: VideoJobState) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.state = next;
        true
    }

    pub(crate) fn complete(&mut self, media: MediaSource) {
        if self.transition(VideoJobState::Completed) {
            self.progress = Some(100);
            self.media = Some(media);
        }
    }

    pub(crate) fn fail(&mut self, detail: impl Into<String>) {
        if self.transition(VideoJobState::Failed) {
            self.error_detail = Some(detail.into());
        }
    }
}

// Wire types

#[derive(Debug, Serialize)]
pub(crate) struct SoraRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    /// Video duration: "4", "8", or "12" seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    seconds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
}

impl<'a> SoraRequest<'a> {
    /// Valid Sora duration values in seconds.
    const VALID_DURATIONS: [u32; 3] = [4, 8, 12];

    pub(crate) fn from_request(req: &'a VideoRequest) -> Self {
        // Map duration_secs to nearest valid Sora value ("4", "8", "12")
        let seconds = req.duration_secs.map(|d| {
            let nearest = Self::VALID_DURATIONS
                .iter()
                .min_by_key(|&&v| (v as i64 - d as i64).unsigned_abs())
                .copied()
                .unwrap_or(4);
            nearest.to_string()
        });

        Self {
            model: &req.model,
            prompt: &req.prompt,
            seconds,
            size: req.resolution.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_status_parsing() {
        assert_eq!(
            RemoteStatus::from_payload(&json!({"status": "queued"})),
            RemoteStatus::Queued
        );
        assert_eq!(
            RemoteStatus::from_payload(&json!({"status": "in_progress"})),
            RemoteStatus::InProgress
        );
        assert_eq!(
            RemoteStatus::from_payload(&json!({"status": "succeeded"})),
            RemoteStatus::Completed
        );
        assert_eq!(
            RemoteStatus::from_payload(&json!({"status": "error"})),
            RemoteStatus::Failed
        );
        assert_eq!(
            RemoteStatus::from_payload(&json!({"status": "paused"})),
            RemoteStatus::Unknown("paused".into())
        );
        assert!(matches!(
            RemoteStatus::from_payload(&json!({})),
            RemoteStatus::Unknown(_)
        ));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let mut job = VideoJob::new(&VideoRequest::new("sunset"));
        assert!(job.transition(VideoJobState::Queued));
        job.fail("quota exceeded");
        assert_eq!(job.state(), VideoJobState::Failed);

        assert!(!job.transition(VideoJobState::InProgress));
        job.complete(MediaSource::Remote("https://example.com/v.mp4".into()));
        assert_eq!(job.state(), VideoJobState::Failed);
        assert!(job.media().is_none());
        assert_eq!(job.error_detail(), Some("quota exceeded"));
    }

    #[test]
    fn test_id_is_immutable_once_assigned() {
        let mut job = VideoJob::new(&VideoRequest::new("sunset"));
        job.absorb(&json!({"id": "v1", "status": "queued"}));
        job.absorb(&json!({"id": "v2", "status": "in_progress", "progress": 42}));
        assert_eq!(job.id(), Some("v1"));
        assert_eq!(job.progress(), Some(42));
    }

    #[test]
    fn test_progress_clamped() {
        let mut job = VideoJob::new(&VideoRequest::new("sunset"));
        job.absorb(&json!({"progress": 250}));
        assert_eq!(job.progress(), Some(100));
        job.absorb(&json!({"progress": 12.6}));
        assert_eq!(job.progress(), Some(13));
    }

    #[test]
    fn test_resume_takes_reported_model() {
        let mut job = VideoJob::resume("video_123");
        assert_eq!(job.id(), Some("video_123"));
        assert_eq!(job.state(), VideoJobState::Submitted);
        job.absorb(&json!({"model": "sora-2-pro"}));
        assert_eq!(job.model(), "sora-2-pro");
    }

    #[test]
    fn test_media_source_url() {
        let remote = MediaSource::Remote("https://example.com/v.mp4".into());
        assert_eq!(remote.url(), "https://example.com/v.mp4");

        let local = MediaSource::Downloaded(LocalVideo::new(b"abc".to_vec(), "video/mp4"));
        assert_eq!(local.url(), "data:video/mp4;base64,YWJj");
    }

    #[test]
    fn test_request_serialization_skips_none_fields() {
        let req = VideoRequest::new("test");
        let json = serde_json::to_value(SoraRequest::from_request(&req)).unwrap();

        assert_eq!(json["model"], DEFAULT_VIDEO_MODEL);
        assert_eq!(json["prompt"], "test");
        assert!(json.get("size").is_none());
        assert!(json.get("seconds").is_none());
    }

    #[test]
    fn test_request_duration_rounds_to_nearest() {
        let seconds = |d| {
            let req = VideoRequest::new("test").with_duration(d);
            SoraRequest::from_request(&req).seconds
        };
        assert_eq!(seconds(5).as_deref(), Some("4"));
        assert_eq!(seconds(7).as_deref(), Some("8"));
        // 10 is equidistant from 8 and 12; min_by_key picks first (8)
        assert_eq!(seconds(10).as_deref(), Some("8"));
        assert_eq!(seconds(15).as_deref(), Some("12"));
    }

    #[test]
    fn test_request_serialization_with_size() {
        let req = VideoRequest::new("test")
            .with_duration(12)
            .with_resolution("1280x720");
        let json = serde_json::to_value(SoraRequest::from_request(&req)).unwrap();

        assert_eq!(json["seconds"], "12");
        assert_eq!(json["size"], "1280x720");
        assert!(json.get("duration").is_none());
    }
}
