// Titan IME CLI
// Replays key-event scripts through the input-method core and prints each decision

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use titan_ime::{parse_script, Replay};
use titan_ime_core::settings::{default_settings_content, Settings};

/// Hardware-keyboard input method: modifier locks and symbol layers
#[derive(Parser, Debug)]
#[command(name = "titan-ime")]
#[command(version)]
#[command(about = "Replay key events through the titan-ime state machine", long_about = None)]
struct Args {
    /// Settings TOML file (default: ~/.config/titan-ime/settings.toml)
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Validate settings and exit
    #[arg(long)]
    check_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a commented default settings file and exit
    #[arg(long)]
    print_default_settings: bool,

    /// Event script to replay ("-" or omitted reads stdin)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Settings::load_default().context("failed to load default settings"),
    }
}

fn read_script(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display())),
        _ => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
    }
}

fn run(args: Args) -> Result<()> {
    if args.print_default_settings {
        print!("{}", default_settings_content());
        return Ok(());
    }

    let settings = load_settings(args.settings.as_ref())?;
    if let Some(path) = settings.source_path() {
        log::info!("loaded settings from {}", path.display());
    }

    if args.check_config {
        println!("Settings are valid");
        return Ok(());
    }

    let source = read_script(args.script.as_ref())?;
    let script = parse_script(&source)?;
    if script.is_empty() {
        bail!("script has no commands");
    }

    let mut replay = Replay::new(settings.to_processor_config());
    for entry in replay.run(&script)? {
        println!("{}", entry);
    }
    println!("committed: {:?}", replay.host().text());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(args)
}
