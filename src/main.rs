use clap::Parser;
use pixgen::logger::{self, LogLevel, LoggerConfig};
use pixgen::{AspectCategory, Config, GenerationSession, StyleCategory};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixgen", version, about = "Generate AI images in one click")]
struct Cli {
    /// Image prompt, e.g. "A serene forest landscape at sunset"
    #[arg(required_unless_present = "list")]
    prompt: Vec<String>,

    /// Image type: square, portrait, landscape, ultrawide
    #[arg(short, long, default_value = "square")]
    aspect: AspectCategory,

    /// Style: realistic, cartoon, abstract, fantasy, anime, cyberpunk
    #[arg(short, long, default_value = "realistic")]
    style: StyleCategory,

    /// Directory the cropped PNG is written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Generate and crop, but don't write the file
    #[arg(long)]
    no_download: bool,

    /// Seconds to wait for the image before giving up (0 waits forever)
    #[arg(long)]
    timeout: Option<u64>,

    /// Override the image endpoint base URL
    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    log_level: Option<LogLevel>,

    /// Emit log lines as JSON
    #[arg(long)]
    json_logs: bool,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Print the available image types and styles
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    let level = match (cli.log_level, config.log_level.as_deref()) {
        (Some(level), _) => level,
        (None, Some(raw)) => raw.parse()?,
        (None, None) => LogLevel::Info,
    };
    let mut logger_config = LoggerConfig::default()
        .with_level(level)
        .with_json_output(cli.json_logs);
    if let Some(path) = cli.log_file.as_deref() {
        logger_config = logger_config.with_file_output(path);
    }
    logger::init_with_config(logger_config)?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using process environment");
    }

    if cli.list {
        print_categories();
        return Ok(());
    }

    if let Some(dir) = cli.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(endpoint) = cli.endpoint {
        config.pollinations = config.pollinations.with_endpoint(endpoint);
    }
    if let Some(secs) = cli.timeout {
        let limit = if secs == 0 { None } else { Some(secs) };
        config.pollinations = config.pollinations.with_load_timeout(limit);
    }
    logger::log_config_info(&config);

    let mut session = GenerationSession::from_config(&config);
    {
        let form = session.form_mut();
        form.set_prompt(cli.prompt.join(" "))?;
        form.set_aspect(cli.aspect)?;
        form.set_style(cli.style)?;
    }

    let mut progress = session.subscribe_progress();
    let renderer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = *progress.borrow_and_update();
            print!("\rGenerating your image... {:>3}%", snapshot.rounded());
            let _ = io::stdout().flush();
        }
    });

    let outcome = session.submit().await.map(|image| (image.width, image.height));
    renderer.abort();
    println!("\rGenerating your image... {:>3}%", session.progress().rounded());
    log::debug!("Session {}", session.state());

    let (width, height) = outcome?;
    log::info!("✅ Cropped image ready ({}x{})", width, height);

    if cli.no_download {
        return Ok(());
    }

    match session.download()? {
        Some(path) => println!("{}", path.display()),
        None => log::warn!("Nothing to download"),
    }

    Ok(())
}

fn print_categories() {
    println!("Image types:");
    for aspect in AspectCategory::ALL {
        let (width, height) = aspect.dimensions();
        println!("  {:<10} {:<10} {}x{}", aspect.as_str(), aspect.label(), width, height);
    }
    println!("Styles:");
    for style in StyleCategory::ALL {
        println!("  {}", style);
    }
}
