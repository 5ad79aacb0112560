use anyhow::Context;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vg_inference::prelude::*;
use vg_inference::DEFAULT_OPENAI_BASE_URL;
use vg_scrapers::logging::init_logging;
use vg_scrapers::{build_http_client, ContentExtractor, HttpFetcher, Pipeline};
use vg_web::AppState;

/// Parses `30`, `45s`, `2m` or `1h30m` into a request timeout.
fn parse_timeout(raw: &str) -> std::result::Result<Duration, String> {
    let mut seconds = 0u64;
    let mut digits = String::new();

    for c in raw.trim().chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let scale = match c {
            's' => 1,
            'm' => 60,
            'h' => 3600,
            _ => return Err(format!("unknown timeout unit '{}'", c)),
        };
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("'{}' is missing a number", c))?;
        seconds = value
            .checked_mul(scale)
            .and_then(|v| seconds.checked_add(v))
            .ok_or_else(|| "timeout is too large".to_string())?;
        digits.clear();
    }

    if !digits.is_empty() {
        let value = digits.parse::<u64>().map_err(|e| e.to_string())?;
        seconds = seconds
            .checked_add(value)
            .ok_or_else(|| "timeout is too large".to_string())?;
    }
    if seconds == 0 {
        return Err("timeout must be a positive duration".to_string());
    }
    Ok(Duration::from_secs(seconds))
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turn an article URL into generated images and a summary",
    long_about = None
)]
pub struct Cli {
    #[arg(long, default_value = "sqlite", help = "Storage backend: memory or sqlite")]
    storage: String,
    #[arg(long, env = "VG_DATABASE", default_value = "vignette.db")]
    database: PathBuf,
    #[arg(long, value_enum, default_value_t = TextModelKind::OpenAi)]
    text_model: TextModelKind,
    #[arg(long, value_enum, default_value_t = ImageBackendKind::Local)]
    image_backend: ImageBackendKind,
    #[arg(long, value_enum, default_value_t = PromptStageKind::Identity)]
    prompt_stage: PromptStageKind,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_OPENAI_BASE_URL)]
    openai_base_url: String,
    #[arg(long, env = "SD_HOST", default_value = "127.0.0.1")]
    sd_host: String,
    #[arg(long, env = "SD_PORT", default_value_t = 7860)]
    sd_port: u16,
    #[arg(long, env = "HUGGINGFACE_API", hide_env_values = true)]
    huggingface_token: Option<String>,
    /// Timeout for every outbound request (e.g. 30s, 2m). No timeout when unset.
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve POST /api/generateImages
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
    /// Run the pipeline once and print the result as JSON
    Run {
        url: String,
    },
}

impl Cli {
    fn inference_config(&self) -> Config {
        Config {
            api_key: self.openai_api_key.clone(),
            openai_base_url: self.openai_base_url.clone(),
            text_model: self.text_model,
            image_backend: self.image_backend,
            sd_url: format!("http://{}:{}", self.sd_host, self.sd_port),
            huggingface_token: self.huggingface_token.clone(),
            prompt_stage: self.prompt_stage,
            ..Config::default()
        }
    }
}

async fn build_pipeline(cli: &Cli) -> anyhow::Result<Pipeline> {
    let client = build_http_client(cli.timeout)?;

    let storage = vg_storage::create_storage(&cli.storage, Some(cli.database.as_path()))
        .await
        .context("failed to initialize storage")?;
    info!("💾 Storage initialized successfully (using {})", cli.storage);

    let config = cli.inference_config();
    let text_model = create_text_model(&config, client.clone())?;
    info!("🧠 Text model initialized successfully (using {})", text_model.name());
    let backend = create_image_backend(&config, client.clone())?;
    info!("🎨 Image backend initialized successfully (using {})", backend.name());
    let prompts = create_prompt_stage(&config, client.clone())?;

    let extractor = ContentExtractor::new(Arc::new(HttpFetcher::new(client)), storage.clone());
    Ok(Pipeline::new(
        extractor,
        SummaryGenerator::new(text_model, storage.clone()),
        ImageGenerator::new(backend, storage),
    )
    .with_prompt_stage(prompts))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pipeline = build_pipeline(&cli).await?;

    match cli.command {
        Commands::Serve { host, port } => {
            let state = AppState::new(Arc::new(pipeline));
            vg_web::serve(state, SocketAddr::new(host, port)).await?;
        }
        Commands::Run { url } => {
            info!("Running pipeline for {}", url);
            let items = pipeline.run(&url).await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
    }

    Ok(())
}
