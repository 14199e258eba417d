use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use overmark::{
    Config, WatermarkConfig, create_app, startup_checks,
    watermark::{AlignX, AlignY, Dimension, Offset, OutputFormat, Watermark},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Global options that apply to all commands
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watermark an image and write the result to disk
    Apply {
        /// Image to watermark
        image: PathBuf,

        #[command(flatten)]
        watermark: WatermarkArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Watermark an image and write the encoded bytes to stdout
    Show {
        /// Image to watermark
        image: PathBuf,

        #[command(flatten)]
        watermark: WatermarkArgs,
    },

    /// Run the HTTP server that watermarks images on request
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,

        /// Automatically quit after specified number of seconds (useful for testing)
        #[arg(long)]
        quit_after: Option<u64>,
    },
}

/// Overrides for the `[watermark]` table of the config file
#[derive(Args, Debug)]
struct WatermarkArgs {
    /// Watermark image
    #[arg(short, long)]
    watermark: Option<PathBuf>,

    /// Watermark opacity between 0 and 1
    #[arg(long)]
    opacity: Option<f64>,

    /// Watermark width in pixels (300) or percent of the image ("33%")
    #[arg(long)]
    width: Option<Dimension>,

    /// Watermark height in pixels (300) or percent of the image ("33%")
    #[arg(long)]
    height: Option<Dimension>,

    /// left, center or right
    #[arg(long)]
    align_x: Option<AlignX>,

    /// top, middle or bottom
    #[arg(long)]
    align_y: Option<AlignY>,

    /// Horizontal offset in pixels or percent, may be negative
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<Offset>,

    /// Vertical offset in pixels or percent, may be negative
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<Offset>,

    /// jpg, png or gif
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Encoder quality between 0 and 100 (JPEG only)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Report configuration errors loudly
    #[arg(long)]
    debug: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Directory for the watermarked image (default: next to the original)
    #[arg(long)]
    destination_path: Option<PathBuf>,

    /// File name of the watermarked image without extension
    #[arg(long)]
    destination_filename: Option<String>,

    /// Directory that receives a copy of the original before it is watermarked
    #[arg(long)]
    backup_path: Option<PathBuf>,
}

impl WatermarkArgs {
    fn merge_into(self, settings: &mut WatermarkConfig) {
        if let Some(watermark) = self.watermark {
            settings.image = Some(watermark);
        }
        if let Some(opacity) = self.opacity {
            settings.opacity = opacity;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(align_x) = self.align_x {
            settings.align_x = align_x;
        }
        if let Some(align_y) = self.align_y {
            settings.align_y = align_y;
        }
        if let Some(offset_x) = self.offset_x {
            settings.offset_x = offset_x;
        }
        if let Some(offset_y) = self.offset_y {
            settings.offset_y = offset_y;
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        settings.debug |= self.debug;
    }
}

impl OutputArgs {
    fn merge_into(self, settings: &mut WatermarkConfig) {
        if self.destination_path.is_some() {
            settings.destination_path = self.destination_path;
        }
        if self.destination_filename.is_some() {
            settings.destination_filename = self.destination_filename;
        }
        if self.backup_path.is_some() {
            settings.backup_path = self.backup_path;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout is reserved for image bytes in `show`
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Apply {
            image,
            watermark,
            output,
        } => {
            let mut settings = config.watermark;
            watermark.merge_into(&mut settings);
            output.merge_into(&mut settings);

            let written = tokio::task::spawn_blocking(move || {
                settings.apply(Watermark::new().original(&image)).save()
            })
            .await??;
            println!("{}", written.display());
        }
        Commands::Show { image, watermark } => {
            let mut settings = config.watermark;
            watermark.merge_into(&mut settings);

            let rendered = tokio::task::spawn_blocking(move || {
                settings
                    .apply_appearance(Watermark::new().original(&image))
                    .show()
            })
            .await??;
            info!(
                "Writing {} bytes of {} to stdout",
                rendered.bytes.len(),
                rendered.mime_type()
            );

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&rendered.bytes)?;
            stdout.flush()?;
        }
        Commands::Serve {
            port,
            host,
            quit_after,
        } => run_server(config, port, host, quit_after).await?,
    }

    Ok(())
}

fn load_config(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if config_path.exists() {
        let config_content = std::fs::read_to_string(config_path)?;
        let config = toml_edit::de::from_str::<Config>(&config_content)?;
        info!("Configuration loaded from: {:?}", config_path);
        Ok(config)
    } else {
        info!("Config file not found at {:?}, using defaults", config_path);
        Ok(Config::default())
    }
}

async fn run_server(
    config: Config,
    port: Option<u16>,
    host: Option<String>,
    quit_after: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let host = host.unwrap_or(config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info!("Starting {} server", config.app.name);
    info!("Watermark image: {:?}", config.watermark.image);
    info!("Source directory: {:?}", config.serve.source_directory);

    // Perform startup checks
    match startup_checks::perform_startup_checks(&config).await {
        Ok(()) => info!("All startup checks passed"),
        Err(errors) => {
            for error in &errors {
                tracing::error!("Startup check failed: {}", error);
            }
            return Err("Startup checks failed".into());
        }
    }

    let app = create_app(config).await;

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Set up graceful shutdown
    let server = axum::serve(listener, app);
    let graceful = server.with_graceful_shutdown(shutdown_signal(quit_after));

    if let Err(e) = graceful.await {
        tracing::error!("Server error: {}", e);
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(quit_after: Option<u64>) {
    use tokio::signal;
    use tokio::time::{Duration, sleep};

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let timer = async {
        match quit_after {
            Some(seconds) => {
                sleep(Duration::from_secs(seconds)).await;
                info!("Quit timer of {} seconds elapsed", seconds);
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = timer => {},
    }
}
