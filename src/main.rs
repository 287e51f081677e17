use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use waqr::render::{to_svg_string, to_terminal_string};
use waqr::{logger, Config, Session, Theme, COUNTRIES};

/// Generate a WhatsApp chat QR code for a phone number and save it as PNG.
#[derive(Parser, Debug)]
#[command(name = "waqr", version, about)]
struct Cli {
    /// Local phone number; spaces, dashes and brackets are ignored
    #[arg(required_unless_present = "list_countries")]
    phone: Option<String>,

    /// Country calling code, without the plus sign
    #[arg(short, long, default_value = waqr::payload::DEFAULT_COUNTRY_CODE)]
    country: String,

    /// Output width and height in pixels
    #[arg(short, long)]
    size: Option<u32>,

    /// Blank margin around the code, in modules
    #[arg(long)]
    quiet_zone: Option<u32>,

    /// Light modules on a dark background
    #[arg(long)]
    dark: bool,

    /// Directory to write the image into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML file with default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write an SVG next to the PNG
    #[arg(long)]
    svg: bool,

    /// Print the code to the terminal
    #[arg(long)]
    print: bool,

    /// List the supported country codes and exit
    #[arg(long)]
    list_countries: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI args: {:?}", cli);

    if cli.list_countries {
        for country in &COUNTRIES {
            println!("{:>4}  {}  {}", country.code, country.flag, country.name);
        }
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(path) => {
            println!("✅ Saved {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> waqr::Result<PathBuf> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(size) = cli.size {
        config.pixel_size = size;
    }
    if let Some(quiet_zone) = cli.quiet_zone {
        config.quiet_zone = quiet_zone;
    }
    if cli.dark {
        config.theme = Theme::Dark;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    config.validate()?;

    let output_dir = config.output_dir.clone();
    let quiet_zone = config.quiet_zone;
    let mut session = Session::new(config);
    let phone = cli.phone.unwrap_or_default();
    let generated = session.generate(&cli.country, &phone)?;

    if cli.print {
        print!("{}", to_terminal_string(&generated.matrix, quiet_zone)?);
    }
    if cli.svg {
        let svg = to_svg_string(&generated.matrix, quiet_zone, generated.image.palette())?;
        let svg_path = output_dir.join(&generated.file_name).with_extension("svg");
        std::fs::create_dir_all(&output_dir)?;
        std::fs::write(&svg_path, svg)?;
        tracing::info!("📁 SVG saved to: {}", svg_path.display());
    }

    session.export()?.save_to(&output_dir)
}
