//! CLI for sorachat - chat with GPT5 PRO and generate videos with Sora.

use clap::{Args, Parser, Subcommand};
use sorachat::{
    ChatClient, ChatRequest, ClientConfig, Credential, InlineImage, MediaSource, VideoClient,
    VideoJob, VideoJobState, VideoRequest,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sorachat")]
#[command(about = "Chat with GPT5 PRO and generate videos with Sora via the OpenAI API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// OpenAI API key
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Log every request and status check to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt to the chat model
    Chat(ChatArgs),

    /// Generate a video from a text prompt
    Video(VideoArgs),

    /// Check (or wait for) a previously submitted video
    Status(StatusArgs),
}

#[derive(Args)]
struct ChatArgs {
    /// The prompt to send
    prompt: String,

    /// Image to attach (png, jpg, gif, webp)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Chat model
    #[arg(short, long, default_value = sorachat::chat::DEFAULT_CHAT_MODEL)]
    model: String,

    /// System instruction
    #[arg(long)]
    system: Option<String>,

    /// Completion token limit
    #[arg(long, default_value_t = 2000)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.7)]
    temperature: f32,
}

#[derive(Args)]
struct VideoArgs {
    /// The text prompt describing the video
    prompt: String,

    /// Video model
    #[arg(short, long, default_value = sorachat::video::DEFAULT_VIDEO_MODEL)]
    model: String,

    /// Video duration in seconds (4, 8 or 12)
    #[arg(short = 'd', long)]
    seconds: Option<u32>,

    /// Resolution, e.g. 1280x720 or 720x1280
    #[arg(long)]
    size: Option<String>,

    /// Where to write downloaded video content
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Return right after submission instead of waiting
    #[arg(long)]
    no_wait: bool,
}

#[derive(Args)]
struct StatusArgs {
    /// Video id returned at submission
    id: String,

    /// Keep polling until the video is finished
    #[arg(short, long)]
    wait: bool,

    /// Where to write downloaded video content
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let credential = Credential::new(cli.api_key.clone().unwrap_or_default())?;
    let config = match &cli.base_url {
        Some(url) => ClientConfig::default().with_base_url(url),
        None => ClientConfig::default(),
    };

    match cli.command {
        Commands::Chat(args) => chat(args, config, &credential, cli.json).await?,
        Commands::Video(args) => generate_video(args, config, &credential, cli.json).await?,
        Commands::Status(args) => video_status(args, config, &credential, cli.json).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sorachat=debug" } else { "sorachat=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn chat(
    args: ChatArgs,
    config: ClientConfig,
    credential: &Credential,
    json_output: bool,
) -> anyhow::Result<()> {
    let client = ChatClient::builder()
        .config(config)
        .max_tokens(args.max_tokens)
        .temperature(args.temperature)
        .build()?;

    let mut request = ChatRequest::new(&args.prompt).with_model(&args.model);
    if let Some(system) = args.system {
        request = request.with_system_prompt(system);
    }
    if let Some(ref path) = args.image {
        request = request.with_image(InlineImage::from_path(path)?);
    }

    let reply = client.send(&request, credential).await?;

    if json_output {
        let result = serde_json::json!({
            "type": "chat",
            "success": true,
            "model": reply.model.unwrap_or(args.model),
            "text": reply.text,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", reply.text);
    }

    Ok(())
}

async fn generate_video(
    args: VideoArgs,
    config: ClientConfig,
    credential: &Credential,
    json_output: bool,
) -> anyhow::Result<()> {
    let client = VideoClient::builder().config(config).build()?;

    let mut request = VideoRequest::new(&args.prompt).with_model(&args.model);
    if let Some(s) = args.seconds {
        request = request.with_duration(s);
    }
    if let Some(size) = args.size {
        request = request.with_resolution(size);
    }

    let mut job = client.submit(&request, credential).await?;

    let pending = matches!(job.state(), VideoJobState::Queued | VideoJobState::InProgress);
    let polled = if pending && !args.no_wait {
        if !json_output {
            eprintln!(
                "Generating video with {} (id {}), this may take several minutes...",
                job.model(),
                job.id().unwrap_or("?")
            );
        }
        client.poll(&mut job, credential).await
    } else {
        Ok(())
    };

    report_job(&job, args.output.as_deref(), json_output)?;
    Ok(polled?)
}

async fn video_status(
    args: StatusArgs,
    config: ClientConfig,
    credential: &Credential,
    json_output: bool,
) -> anyhow::Result<()> {
    let client = VideoClient::builder().config(config).build()?;
    let mut job = VideoJob::resume(&args.id);

    let polled = if args.wait {
        client.poll(&mut job, credential).await
    } else {
        client.poll_once(&mut job, credential).await.map(|_| ())
    };

    // A failed or timed-out job is still reported before the error surfaces.
    report_job(&job, args.output.as_deref(), json_output)?;
    Ok(polled?)
}

fn report_job(job: &VideoJob, output: Option<&Path>, json_output: bool) -> anyhow::Result<()> {
    let (url, saved) = match job.media() {
        Some(MediaSource::Remote(url)) => (Some(url.clone()), None),
        Some(MediaSource::Downloaded(video)) => {
            let path = output.map(Path::to_path_buf).unwrap_or_else(|| {
                PathBuf::from(format!("{}.mp4", job.id().unwrap_or("video")))
            });
            video.save(&path)?;
            (None, Some((path, video.size())))
        }
        None => (None, None),
    };

    if json_output {
        let result = job_report(job, url.as_deref(), saved.as_ref());
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match job.state() {
        VideoJobState::Completed => {
            if let Some(url) = url {
                println!("Video ready: {url}");
            }
            if let Some((path, size)) = saved {
                println!("Saved video: {} ({} bytes)", path.display(), size);
            }
            if let Some(revised) = job.revised_prompt() {
                println!("Revised prompt: {revised}");
            }
        }
        VideoJobState::Queued | VideoJobState::InProgress => {
            let progress = job
                .progress()
                .map(|p| format!(" ({p}%)"))
                .unwrap_or_default();
            println!(
                "Video {} is {}{}",
                job.id().unwrap_or("?"),
                job.state(),
                progress
            );
        }
        VideoJobState::Submitted => {
            println!("Video request submitted; the response had no recognizable status:");
            println!("{}", serde_json::to_string_pretty(job.payload())?);
        }
        VideoJobState::Failed | VideoJobState::TimedOut => {
            anyhow::bail!(
                "video {} ended {}: {}",
                job.id().unwrap_or("?"),
                job.state(),
                job.error_detail().unwrap_or("no detail")
            );
        }
    }

    Ok(())
}

fn job_report(job: &VideoJob, url: Option<&str>, saved: Option<&(PathBuf, usize)>) -> serde_json::Value {
    let response = if job.state() == VideoJobState::Submitted {
        job.payload().clone()
    } else {
        serde_json::Value::Null
    };
    serde_json::json!({
        "type": "video",
        "success": !matches!(job.state(), VideoJobState::Failed | VideoJobState::TimedOut),
        "id": job.id(),
        "state": job.state(),
        "progress": job.progress(),
        "model": job.model(),
        "revised_prompt": job.revised_prompt(),
        "url": url,
        "output": saved.map(|(p, _)| p.display().to_string()),
        "size_bytes": saved.map(|(_, size)| *size),
        "error": job.error_detail(),
        "response": response,
    })
}
