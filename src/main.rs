use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use sqlitui::config::ThemeConfig;
use sqlitui::{hints::Hints, App, AppEvent, ConfigManager, Theme, APP_NAME};
use std::path::PathBuf;
use std::sync::mpsc::channel;

#[derive(Parser, Debug)]
#[command(version, about = "sqlitui")]
struct Args {
    /// SQLite database file to open on startup
    path: Option<PathBuf>,

    /// Read example SQL queries from this file instead of the default
    #[arg(long = "hints")]
    hints: Option<PathBuf>,
}

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn hints_path(args: &Args, config_file: Option<PathBuf>) -> PathBuf {
    args.hints
        .clone()
        .or(config_file)
        .unwrap_or_else(Hints::default_path)
}

/// A config file naming an unknown color should not abort startup.
fn resolve_theme(config: &ThemeConfig) -> Theme {
    Theme::from_config(config).unwrap_or_else(|e| {
        eprintln!("Warning: invalid theme color in config: {}. Using defaults.", e);
        Theme::default()
    })
}

fn run(mut terminal: DefaultTerminal, args: &Args) -> Result<()> {
    let config = match ConfigManager::new(APP_NAME) {
        Ok(manager) => manager.load_config(),
        Err(_) => Default::default(),
    };
    let theme = resolve_theme(&config.theme);

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, hints_path(args, config.hints.file));
    match &args.path {
        Some(path) => tx.send(AppEvent::Open(path.clone()))?,
        None => app.prompt_for_database(),
    }
    render(&mut terminal, &mut app)?;

    loop {
        if crossterm::event::poll(std::time::Duration::from_millis(25))? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(std::time::Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = run(terminal, &args);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_flag_overrides_config() {
        let args = Args {
            path: None,
            hints: Some(PathBuf::from("/from/flag.txt")),
        };
        let resolved = hints_path(&args, Some(PathBuf::from("/from/config.txt")));
        assert_eq!(resolved, PathBuf::from("/from/flag.txt"));

        let args = Args {
            path: None,
            hints: None,
        };
        let resolved = hints_path(&args, Some(PathBuf::from("/from/config.txt")));
        assert_eq!(resolved, PathBuf::from("/from/config.txt"));
    }

    #[test]
    fn invalid_theme_color_falls_back_to_defaults() {
        let mut config = ThemeConfig::default();
        config
            .colors
            .insert("border".to_string(), "ultraviolet".to_string());
        let theme = resolve_theme(&config);
        assert_eq!(theme.get("border"), ratatui::style::Color::DarkGray);
    }
}
