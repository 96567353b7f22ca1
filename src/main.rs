// ============================================================================
// Coinmarkets - Coins & Markets
// ============================================================================
// Page TUI qui affiche les données de marché CoinGecko : filtres devise et
// tri, tableau paginé, visualiseur de code.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : render -> résultats du worker -> input
// 3. Worker thread : les appels HTTP tournent dans un runtime tokio à part
// 4. Cleanup : le terminal est restauré même si la boucle échoue
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use coinmarkets::api::CoinGeckoClient;
use coinmarkets::app::App;
use coinmarkets::config::{Config, DEFAULT_LOG_FILTER, LOG_FILE_NAME};
use coinmarkets::controller::{FetchCommand, FetchOutcome, MarketController};
use coinmarkets::handler::handle_event;
use coinmarkets::ui::{render, EventHandler};
use coinmarkets::worker::spawn_fetch_worker;

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/coinmarkets/logs/coinmarkets.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=coinmarkets=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(&config.log_dir)
        .context("Échec de la création du répertoire de logs")?;

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, config.log_dir.clone(), LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(log_dir = ?config.log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::load();

    // Logging avant tout le reste ; un échec n'empêche pas de lancer la page
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api = %config.api_base_url, "Coinmarkets starting up");

    // Channels entre l'UI et le worker
    // - command_tx/rx : commandes de fetch émises par le contrôleur
    // - result_tx/rx : résultats renvoyés à l'event loop
    let (command_tx, command_rx) = mpsc::channel::<FetchCommand>();
    let (result_tx, result_rx) = mpsc::channel::<FetchOutcome>();

    let source = Arc::new(CoinGeckoClient::new(&config)?);
    info!("Spawning background fetch worker");
    let worker = spawn_fetch_worker(command_rx, result_tx, source)?;

    let mut app = App::new(MarketController::new(command_tx));

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Chargement initial : le tableau affiche l'indicateur dès la 1re frame
    app.start();

    let events = EventHandler::new();
    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Fermer le contrôleur ferme le channel de commandes : le worker s'arrête
    drop(app);
    if worker.join().is_err() {
        error!("Fetch worker panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Intègre les résultats du worker (sans bloquer)
//   2. Dessine l'interface
//   3. Attend un input (au plus un tick)
//
// Toutes les mutations d'état ont lieu ici, sur le thread UI.
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    result_rx: &mpsc::Receiver<FetchOutcome>,
) -> Result<()> {
    while app.is_running() {
        // CONCEPT : try_iter() vide le channel sans bloquer
        for outcome in result_rx.try_iter() {
            app.apply_outcome(outcome);
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event);
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + écran alternatif)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
