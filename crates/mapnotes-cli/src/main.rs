use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use mapnotes_config::Config;
use mapnotes_engine::{Document, OutlineSnapshot, io};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    ops::Range,
    path::PathBuf,
    process,
};

mod render;

struct App {
    path: PathBuf,
    config: Config,
    config_path: PathBuf,
    document: Document,
    snapshot: OutlineSnapshot,
    lines: Vec<Range<usize>>,
    line_state: ListState,
    status: Option<String>,
}

impl App {
    fn new(path: PathBuf, config: Config, config_path: PathBuf) -> Result<Self> {
        let document = io::open_document(&path)?;
        let snapshot = document.snapshot_with_prefix(&config.display.result_prefix);

        let mut app = Self {
            path,
            config,
            config_path,
            document,
            snapshot,
            lines: Vec::new(),
            line_state: ListState::default(),
            status: None,
        };
        app.refresh();
        app.select_line(0);
        Ok(app)
    }

    fn refresh(&mut self) {
        self.snapshot = self
            .document
            .snapshot_with_prefix(&self.config.display.result_prefix);
        self.lines = render::line_ranges(&self.snapshot.text);
    }

    fn select_line(&mut self, index: usize) {
        let Some(line) = self.lines.get(index).cloned() else {
            return;
        };
        self.line_state.select(Some(index));
        self.status = None;
        self.document.set_selection(line.start..line.start);
        self.refresh();
    }

    fn next_line(&mut self) {
        let i = match self.line_state.selected() {
            Some(i) => (i + 1) % self.lines.len(),
            None => 0,
        };
        self.select_line(i);
    }

    fn previous_line(&mut self) {
        let i = match self.line_state.selected() {
            Some(0) | None => self.lines.len().saturating_sub(1),
            Some(i) => i - 1,
        };
        self.select_line(i);
    }

    /// Flip result widgets on or off and remember the choice in the config file.
    fn toggle_results(&mut self) {
        self.config.display.show_results = !self.config.display.show_results;
        match self.config.save_to_path(&self.config_path) {
            Ok(()) => log::debug!("saved config to {}", self.config_path.display()),
            Err(e) => {
                log::warn!("saving {} failed: {e}", self.config_path.display());
                self.status = Some(format!("Error saving config: {e}"));
            }
        }
    }

    fn reload(&mut self) {
        match io::open_document(&self.path) {
            Ok(document) => {
                self.document = document;
                let index = self.line_state.selected().unwrap_or(0);
                self.refresh();
                self.select_line(index.min(self.lines.len().saturating_sub(1)));
                self.status = Some(format!("Reloaded {}", self.path.display()));
            }
            Err(e) => {
                log::warn!("reload of {} failed: {e}", self.path.display());
                self.status = Some(format!("Error reloading: {e}"));
            }
        }
    }

    fn annotated_lines(&self) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .map(|line| {
                render::annotate_line(
                    &self.snapshot,
                    line.clone(),
                    self.config.display.show_results,
                )
            })
            .collect()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let print_only = args.iter().skip(1).any(|arg| arg == "--print");
    let explicit: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| arg.as_str() != "--print")
        .collect();
    if explicit.len() > 1 {
        eprintln!("Usage: {} [--print] [document.md]", args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let explicit = explicit.first().map(|arg| PathBuf::from(arg.as_str()));
    let Some(path) = config.resolve_document_path(explicit) else {
        eprintln!("Error: No document provided and none configured");
        eprintln!("Usage: {} [--print] [document.md]", args[0]);
        eprintln!(
            "Or set document_path in a config file at {}",
            config_path.display()
        );
        process::exit(1);
    };

    log::info!("Opening {}", path.display());

    if print_only {
        return print_document(path, config);
    }

    let mut app = App::new(path.clone(), config, config_path)
        .with_context(|| format!("opening {}", path.display()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Write every annotated line to stdout without entering the TUI.
fn print_document(path: PathBuf, config: Config) -> Result<()> {
    let document =
        io::open_document(&path).with_context(|| format!("opening {}", path.display()))?;
    let snapshot = document.snapshot_with_prefix(&config.display.result_prefix);
    for line in render::line_ranges(&snapshot.text) {
        let annotated = render::annotate_line(&snapshot, line, config.display.show_results);
        println!("{}", render::plain(&annotated));
    }
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_line(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_line(),
                KeyCode::Char('r') => app.reload(),
                KeyCode::Char('t') => app.toggle_results(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(rows[0]);

    // Document panel
    let items: Vec<ListItem> = app.annotated_lines().into_iter().map(ListItem::new).collect();
    let title = format!("{} (v{})", app.path.display(), app.snapshot.version);
    let document = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));
    f.render_stateful_widget(document, chunks[0], &mut app.line_state);

    // Node panel
    let details = match app.snapshot.active_node {
        Some(id) => render::node_details(&app.snapshot.outline, id),
        None => vec![Line::from("Cursor is outside every list")],
    };
    let node = Paragraph::new(details)
        .block(Block::default().borders(Borders::ALL).title("Node"))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(node, chunks[1]);

    // Instructions
    let help_text = match &app.status {
        Some(status) => Line::from(Span::raw(status.clone())),
        None => Line::from(vec![
            Span::raw("q: Quit | "),
            Span::raw("↑/k: Previous | "),
            Span::raw("↓/j: Next | "),
            Span::raw("t: Toggle results | r: Reload"),
        ]),
    };
    f.render_widget(Paragraph::new(vec![help_text]), rows[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir, text: &str) -> App {
        let path = dir.path().join("notes.md");
        std::fs::write(&path, text).unwrap();
        App::new(path, Config::default(), dir.path().join("config.toml")).unwrap()
    }

    #[test]
    fn toggling_results_persists_the_setting() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, "- {1 + 1}\n");

        app.toggle_results();

        let saved = Config::load_from_path(&app.config_path).unwrap().unwrap();
        assert!(!saved.display.show_results);
        assert_eq!(saved.display.result_prefix, "= ");
        assert_eq!(app.status, None);

        app.toggle_results();
        let saved = Config::load_from_path(&app.config_path).unwrap().unwrap();
        assert!(saved.display.show_results);
    }

    #[test]
    fn line_navigation_wraps() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir, "- a\n- b\n");
        assert_eq!(app.line_state.selected(), Some(0));

        app.previous_line();
        assert_eq!(app.line_state.selected(), Some(1));
        app.next_line();
        assert_eq!(app.line_state.selected(), Some(0));
    }
}
