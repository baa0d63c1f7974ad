#![warn(missing_docs)]
//! sorachat - chat completions and Sora video generation over the OpenAI API.
//!
//! The credential is passed explicitly into every call; nothing is stored.
//!
//! # Quick Start - Chat
//!
//! ```no_run
//! use sorachat::{ChatClient, ChatRequest, Credential};
//!
//! #[tokio::main]
//! async fn main() -> sorachat::Result<()> {
//!     let credential = Credential::from_env()?;
//!     let client = ChatClient::builder().build()?;
//!     let reply = client.send(&ChatRequest::new("Explain tides"), &credential).await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Video
//!
//! ```no_run
//! use sorachat::{Credential, VideoClient, VideoJobState, VideoRequest};
//!
//! #[tokio::main]
//! async fn main() -> sorachat::Result<()> {
//!     let credential = Credential::from_env()?;
//!     let client = VideoClient::builder().build()?;
//!     let mut job = client
//!         .submit(&VideoRequest::new("A sunset over the sea").with_duration(8), &credential)
//!         .await?;
//!     if !job.is_terminal() && job.state() != VideoJobState::Submitted {
//!         client.poll(&mut job, &credential).await?;
//!     }
//!     println!("{:?}", job.media_url());
//!     Ok(())
//! }
//! ```

pub mod chat;
mod config;
mod credential;
mod error;
mod http;
pub mod video;

pub use chat::{ChatClient, ChatClientBuilder, ChatRequest, ChatResult, InlineImage};
pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use credential::{Credential, API_KEY_ENV};
pub use error::{Result, SoraChatError};
pub use video::{
    LocalVideo, MediaSource, PollStep, PollWaiter, VideoClient, VideoClientBuilder, VideoJob,
    VideoJobState, VideoRequest,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::chat::{ChatClient, ChatRequest, ChatResult, InlineImage};
    pub use crate::credential::Credential;
    pub use crate::error::{Result, SoraChatError};
    pub use crate::video::{MediaSource, VideoClient, VideoJob, VideoJobState, VideoRequest};
}
