use dlreview::async_preview::SyncPreviewManager;
use dlreview::cli::{AppConfig, Args};
use dlreview::config::UserConfig;
use dlreview::domain::scan;
use dlreview::logging::init_logging;
use dlreview::open_file;
use dlreview::preview::PreviewProvider;
use dlreview::session::{ReviewSession, SessionEvent};
use dlreview::tui::{clamp_viewport, map_key, render};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs, io, time::Duration};

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse_args();

    // Load user configuration; a broken file must not stop the review
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::resolve(args, &user_config);

    // stderr would draw over the review screen, so logs always go to a file
    if let Some(parent) = config.log_file.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = init_logging(config.verbose, config.quiet, Some(&config.log_file)) {
        eprintln!(
            "Warning: logging disabled, cannot open {}: {}",
            config.log_file.display(),
            e
        );
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let records = match scan(&config.directory, &config.scan_options()) {
        Ok(records) => records,
        Err(e) => {
            log::error!("Scan failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Found {} files from the last {} hours in {}",
        records.len(),
        config.hours,
        config.directory.display()
    );

    run_app_with_config(&config, records, &mut user_config)
}

/// Runs the TUI application with configuration
pub fn run_app_with_config(
    config: &AppConfig,
    records: Vec<dlreview::FileRecord>,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    let mut session = ReviewSession::new(records, config.session_options());
    let mut preview_manager =
        SyncPreviewManager::new(PreviewProvider::new(config.ffmpeg.clone()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("Download Reviewer"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(
        &mut terminal,
        &mut session,
        &mut preview_manager,
        config,
        user_config,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print summary after exit
    let stats = session.statistics();
    if config.dry_run {
        println!("\n[DRY RUN] Complete");
        println!("   Would have kept: {} files", stats.kept);
        println!("   Would have moved: {} files", stats.moved);
        println!("   Would have trashed: {} files", stats.deleted);
    } else if stats.decided() > 0 {
        log::info!(
            "Session finished: {} kept, {} moved, {} trashed",
            stats.kept,
            stats.moved,
            stats.deleted
        );
    }

    result
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
    session: &mut ReviewSession,
    preview_manager: &mut SyncPreviewManager,
    config: &AppConfig,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    let max_cells = config.window.cells();

    loop {
        let preview = session
            .current()
            .map(|record| preview_manager.request_preview(record).clone());

        terminal.draw(|frame| {
            let area = clamp_viewport(frame.area(), max_cells);
            render(frame, area, &*session, preview.as_ref());
        })?;

        // Short poll so the loading spinner and finished previews show up
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let action = map_key(session.view(), key);

        match session.handle(action) {
            SessionEvent::None => {}
            SessionEvent::CurrentChanged => preview_manager.reset(),
            SessionEvent::Removed(path) => preview_manager.forget(&path),
            SessionEvent::Moved { from, destination } => {
                preview_manager.forget(&from);
                user_config.last_destination = Some(destination);
                save_user_config(user_config);
            }
            SessionEvent::Open(path) => {
                if let Err(e) = open_file(&path) {
                    log::debug!("Open failed for {}: {}", path.display(), e);
                    session.report_error(format!("Cannot open file: {}", e));
                }
            }
            SessionEvent::WelcomeDismissed => {
                user_config.welcome_shown = true;
                save_user_config(user_config);
            }
            SessionEvent::Quit => break,
        }
    }

    Ok(())
}

fn save_user_config(user_config: &UserConfig) {
    if let Err(e) = user_config.save() {
        log::warn!("Failed to save user config: {}", e);
    }
}
