//! Video generation jobs.

mod client;
mod error_detail;
mod media;
mod types;
mod waiter;

pub use client::{
    VideoClient, VideoClientBuilder, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL,
};
pub use error_detail::{resolve_error, ErrorPayload, GENERIC_FAILURE};
pub use media::find_media_url;
pub use types::{
    LocalVideo, MediaSource, PollStep, VideoJob, VideoJobState, VideoRequest, DEFAULT_VIDEO_MODEL,
};
pub use waiter::{PollWaiter, TokioWaiter};
