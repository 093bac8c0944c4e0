use alien_invasion::{
    App, InputManager, Settings, SpriteSheet,
    tui::{self, TerminalGuard},
};
use clap::Parser;
use color_eyre::{Result, eyre::WrapErr};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::File,
    io::stdout,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// How long a held key survives without a repeat on terminals that never
/// report releases. Longer than the usual auto-repeat delay.
const RELEASE_TIMEOUT_MS: u64 = 600;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shoot down the alien fleet before it lands")]
struct Cli {
    /// TOML file overriding any of the built-in settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding ship.png and alien.png
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Where log output goes while the terminal is in use
    #[arg(long, default_value = "alien-invasion.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(&cli.log_file)?;

    // Everything that can fail on bad input happens before the terminal is taken over
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(assets) = cli.assets {
        settings.assets_dir = assets;
    }
    let sprites = SpriteSheet::load(&settings)?;
    info!(?settings, "settings loaded");

    let supports_keyboard_enhancement = matches!(
        crossterm::terminal::supports_keyboard_enhancement(),
        Ok(true)
    );
    info!(supports_keyboard_enhancement, "terminal capabilities");

    let input_manager = if supports_keyboard_enhancement {
        InputManager::new()
    } else {
        let ticks = settings.ticks_for(RELEASE_TIMEOUT_MS);
        InputManager::with_release_timeout(u16::try_from(ticks).unwrap_or(u16::MAX))
    };

    tui::install_panic_hook(supports_keyboard_enhancement);

    // Setup terminal manually for full control; the guard undoes it on every exit
    let mut guard =
        TerminalGuard::enter(supports_keyboard_enhancement).wrap_err("failed to set up terminal")?;

    let result = run(settings, sprites, input_manager);

    // Cleanup
    let restored = guard.restore().wrap_err("failed to restore terminal");

    result.and(restored)
}

fn run(settings: Settings, sprites: SpriteSheet, input_manager: InputManager) -> Result<()> {
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    App::new(settings, sprites)
        .with_input(input_manager)
        .run(&mut terminal)
}
