use anyhow::Result;
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, Write},
    sync::Arc,
    time::Instant,
};
use tokio::sync::Mutex;

use party_finder::{
    models::FinderError,
    session::{Clipboard, CommandClipboard, DetailView, Notice, PartyFinder},
    tui::{app::InputMode, App, Event as TuiEvent, EventHandler, ui},
};

const COPIED_MESSAGE: &str = "Name copied to clipboard!";
const COPY_FAILED_MESSAGE: &str = "Could not copy name";

pub async fn run_tui(finder: Arc<PartyFinder>) -> Result<()> {
    // Disable logging to prevent screen corruption
    disable_logging_output();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    enter_screen(&mut stdout)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = Arc::new(Mutex::new(App::new()));
    let events = EventHandler::new(250);

    if let Err(e) = finder.restore_selection().await {
        app.lock().await.set_error(&format_user_friendly_error(&e));
    }

    terminal.clear()?;

    let res = run_app(&mut terminal, app, events, finder).await;

    // Always restore terminal state, even if there was an error
    disable_raw_mode()?;
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Application error: {}", err);
        Err(err)
    } else {
        Ok(())
    }
}

// Mouse reporting stays off so the terminal keeps its own text selection.
fn enter_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, EnterAlternateScreen)
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen)
}

fn disable_logging_output() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

    let null_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::sink)
        .with_filter(tracing_subscriber::filter::LevelFilter::OFF);

    let _ = tracing_subscriber::registry().with(null_layer).try_init();
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: Arc<Mutex<App>>,
    events: EventHandler,
    finder: Arc<PartyFinder>,
) -> Result<()> {
    let clipboard: Arc<dyn Clipboard> = Arc::new(CommandClipboard::new());

    loop {
        let snapshot = finder.snapshot().await;
        {
            let mut app_guard = app.lock().await;
            if app_guard.should_quit {
                return Ok(());
            }
            app_guard.sync(snapshot);
            terminal.draw(|f| ui::draw(f, &app_guard))?;
        }

        let event = match events.next() {
            Ok(event) => event,
            // The reader thread is gone; nothing more will arrive.
            Err(_) => return Ok(()),
        };

        match event {
            TuiEvent::Key(key) => handle_key(key, &app, &finder, &clipboard).await,
            TuiEvent::Tick => app.lock().await.expire_notice(Instant::now()),
            TuiEvent::Resize(_, _) => {}
        }
    }
}

async fn handle_key(
    key: KeyEvent,
    app: &Arc<Mutex<App>>,
    finder: &Arc<PartyFinder>,
    clipboard: &Arc<dyn Clipboard>,
) {
    let mut app_guard = app.lock().await;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app_guard.should_quit = true;
        return;
    }

    let mode = app_guard.input_mode.clone();
    match mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => {
                app_guard.should_quit = true;
            }
            KeyCode::Char('w') => {
                app_guard.input_mode = InputMode::PickingWorld;
            }
            KeyCode::Char('l') => {
                app_guard.input_mode = InputMode::EditingLevel;
            }
            KeyCode::Enter => {
                app_guard.clear_error();
                drop(app_guard);

                let finder = Arc::clone(finder);
                let app = Arc::clone(app);
                tokio::spawn(async move {
                    if let Err(FinderError::ValidationError(message)) = finder.update_results().await {
                        app.lock().await.set_error(&message);
                    }
                });
            }
            KeyCode::Char('r') => {
                drop(app_guard);

                let finder = Arc::clone(finder);
                let app = Arc::clone(app);
                tokio::spawn(async move {
                    if let Some(notice) = finder.refresh_world().await {
                        app.lock().await.set_notice(notice);
                    }
                });
            }
            KeyCode::Char('c') => {
                app_guard.reset_inputs();
                if let Err(e) = finder.clear_filters().await {
                    app_guard.set_error(&format_user_friendly_error(&e));
                }
            }
            KeyCode::Char('i') => {
                let Some(name) = app_guard.selected_player().map(|p| p.name.clone()) else {
                    return;
                };
                drop(app_guard);

                let finder = Arc::clone(finder);
                tokio::spawn(async move {
                    finder.lookup_character(&name).await;
                });
            }
            KeyCode::Char('y') => {
                let Some(name) = app_guard.selected_player().map(|p| p.name.clone()) else {
                    return;
                };
                drop(app_guard);

                let clipboard = Arc::clone(clipboard);
                let app = Arc::clone(app);
                tokio::spawn(async move {
                    let notice = if clipboard.copy(&name).await {
                        Notice::success(COPIED_MESSAGE)
                    } else {
                        Notice::error(COPY_FAILED_MESSAGE)
                    };
                    app.lock().await.set_notice(notice);
                });
            }
            KeyCode::Esc => {
                if !matches!(app_guard.session.detail, DetailView::Hidden) {
                    finder.close_detail().await;
                } else {
                    app_guard.clear_error();
                }
            }
            KeyCode::Left => app_guard.move_column_left(),
            KeyCode::Right => app_guard.move_column_right(),
            KeyCode::Up => app_guard.move_selection_up(),
            KeyCode::Down => app_guard.move_selection_down(),
            _ => {}
        },
        InputMode::PickingWorld => match key.code {
            KeyCode::Esc => {
                app_guard.input_mode = InputMode::Normal;
            }
            KeyCode::Up => app_guard.previous_world(),
            KeyCode::Down => app_guard.next_world(),
            KeyCode::Enter => {
                app_guard.input_mode = InputMode::Normal;
                app_guard.clear_error();
                let world = app_guard.highlighted_world().to_lowercase();
                drop(app_guard);

                let finder = Arc::clone(finder);
                tokio::spawn(async move {
                    // Failures land in the session phase and are drawn from there.
                    let _ = finder.load_world(&world).await;
                });
            }
            _ => {}
        },
        InputMode::EditingLevel => match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                app_guard.input_mode = InputMode::Normal;
            }
            KeyCode::Char(c) => {
                if app_guard.push_level_char(c) {
                    finder.set_reference_level(app_guard.reference_level()).await;
                }
            }
            KeyCode::Backspace => {
                if app_guard.pop_level_char() {
                    finder.set_reference_level(app_guard.reference_level()).await;
                }
            }
            _ => {}
        },
    }
}

fn format_user_friendly_error(error: &FinderError) -> String {
    let message = match error {
        FinderError::NetworkFailure(_) => {
            "🌐 Network connection issue. Please check your internet and try again.".to_string()
        }
        FinderError::StorageError(_) => "⚠️  Saved world is unavailable this session.".to_string(),
        other => format!("❌ {}", other),
    };

    if message.chars().count() > 100 {
        let truncated: String = message.chars().take(97).collect();
        truncated.trim_end().to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_screen_setup_leaves_mouse_alone() {
        let mut out = Vec::new();
        enter_screen(&mut out).unwrap();
        leave_screen(&mut out).unwrap();

        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("\x1b[?1049h"));
        assert!(written.contains("\x1b[?1049l"));
        assert!(!written.contains("\x1b[?1000h"));
        assert!(!written.contains("\x1b[?1000l"));
    }
}
