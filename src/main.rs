mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use quizr::config::Config;
use quizr::corpus::{CategoryCatalog, Corpus};
use quizr::engine::MAX_QUESTION_COUNT;
use quizr::engine::selector::{CountSpec, DifficultyFilter};
use quizr::logging::{self, LogConfig};
use quizr::store::{FlagStore, JsonStore};

use app::{App, AppScreen, SetupRow};
use event::{AppEvent, EventHandler};
use ui::components::progress_bar::ProgressBar;
use ui::components::question_card::QuestionCard;
use ui::components::results_panel::ResultsPanel;
use ui::components::session_sidebar::SessionSidebar;
use ui::components::setup_panel::SetupPanel;
use ui::layout::{ScreenLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "quizr", version, about = "Terminal knowledge quiz")]
struct Cli {
    #[arg(short, long, value_delimiter = ',', help = "Categories to preselect, comma separated")]
    categories: Vec<String>,

    #[arg(short = 'n', long, help = "Question count: 1-50, all, or flagged")]
    count: Option<String>,

    #[arg(short, long, help = "Difficulty: all, easy, medium, hard, easy-medium, medium-hard")]
    difficulty: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Load questions from a JSON file instead of the bundled set")]
    corpus: Option<PathBuf>,

    #[arg(long, help = "Print the available categories and exit")]
    list_categories: bool,

    #[arg(long, help = "Print the bundled theme names and exit")]
    list_themes: bool,

    #[arg(short, long, help = "Skip the setup screen and start right away")]
    start: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        eprintln!("quizr: ignoring unreadable config: {err:#}");
        Config::default()
    });

    let log_config = LogConfig::new(config.log_level.clone(), config.log_path());
    if let Err(err) = logging::init_logging(&log_config) {
        eprintln!("quizr: logging disabled: {err:#}");
    }

    let corpus = match &cli.corpus {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading corpus {}", path.display()))?;
            Corpus::from_json(&json).with_context(|| format!("loading corpus {}", path.display()))?
        }
        None => Corpus::bundled().context("loading bundled corpus")?,
    };
    let catalog = CategoryCatalog::bundled().context("loading category catalog")?;
    info!(questions = corpus.len(), "corpus loaded");

    if cli.list_categories {
        for tag in corpus.categories() {
            println!(
                "{tag:<14} {:<24} {:>3} questions",
                catalog.display_name(tag),
                corpus.count_in_category(tag)
            );
        }
        return Ok(());
    }

    apply_cli_overrides(&mut config, &cli);
    config.normalize(&corpus.categories());

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let flags = match JsonStore::with_base_dir(config.data_path()) {
        Ok(store) => {
            if store.clean_interrupted_writes() {
                warn!(dir = %store.base_dir().display(), "removed leftover temp files");
            }
            FlagStore::new(store)
        }
        Err(err) => {
            warn!(error = %err, "data directory unavailable, flags will not persist");
            FlagStore::in_memory()
        }
    };

    let mut app = App::new(corpus, catalog, flags, config, theme);
    if cli.start {
        app.start_quiz();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Command-line settings win over the saved defaults for this launch.
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if !cli.categories.is_empty() {
        config.default_categories = cli
            .categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }
    if let Some(count) = &cli.count {
        match count.parse::<CountSpec>() {
            Ok(CountSpec::Limit(n)) if !(1..=MAX_QUESTION_COUNT).contains(&n) => {
                eprintln!("quizr: ignoring --count {count}, expected 1-{MAX_QUESTION_COUNT}");
            }
            Ok(spec) => config.default_count = spec.to_string(),
            _ => eprintln!("quizr: ignoring --count {count}"),
        }
    }
    if let Some(difficulty) = &cli.difficulty {
        config.default_difficulty = DifficultyFilter::parse(difficulty).to_string();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            // Redraw keeps the elapsed-time readout current.
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen() {
        AppScreen::Setup => handle_setup_key(app, key),
        AppScreen::Question => handle_question_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.setup.prev_row(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.setup.next_row(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => app.setup.activate(true),
        KeyCode::Left | KeyCode::Char('h') => app.setup.activate(false),
        KeyCode::Char('a') => app.setup.toggle_all(),
        KeyCode::Char('s') => app.start_quiz(),
        KeyCode::Enter => match app.setup.current_row() {
            SetupRow::Start => app.start_quiz(),
            _ => app.setup.activate(true),
        },
        _ => {}
    }
}

fn handle_question_key(app: &mut App, key: KeyEvent) {
    let answered = app.feedback().is_some();
    match key.code {
        KeyCode::Esc | KeyCode::Char('r') => app.restart(),
        KeyCode::Char('f') => app.toggle_flag(),
        KeyCode::Char(ch @ '1'..='9') if !answered => {
            app.answer(ch as usize - '1' as usize);
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_option(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_option(true),
        KeyCode::Enter if !answered => app.answer_selected(),
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Right if answered => app.next_question(),
        KeyCode::Char('s') if !answered => app.next_question(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('r') | KeyCode::Esc | KeyCode::Enter => app.restart(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results(false),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results(true),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen() {
        AppScreen::Setup => render_setup(frame, app),
        AppScreen::Question => render_question(frame, app),
        AppScreen::Results => render_results(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info.to_string(),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &[&str]) -> ScreenLayout {
    let area = frame.area();
    let lines = pack_hint_lines(hints, area.width as usize);
    let layout = ScreenLayout::new(area, lines.len() as u16);
    let footer = Paragraph::new(
        lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(app.theme.colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
    layout
}

fn render_setup(frame: &mut ratatui::Frame, app: &App) {
    let layout = render_footer(
        frame,
        app,
        &[
            "[\u{2191}\u{2193}] Move",
            "[Space] Toggle",
            "[\u{2190}\u{2192}] Change",
            "[a] All",
            "[s] Start",
            "[q] Quit",
        ],
    );
    let info = format!(
        " | {} questions | {} flagged",
        app.engine.corpus().len(),
        app.setup.flagged_available
    );
    render_header(frame, app, layout.header, &info);

    let panel_area = centered_rect(50, 90, layout.main);
    frame.render_widget(SetupPanel::new(&app.setup, app.theme), panel_area);
}

fn render_question(frame: &mut ratatui::Frame, app: &App) {
    let (Some(session), Some(view)) = (app.engine.session(), &app.view) else {
        return;
    };
    let hints: &[&str] = if view.answer.is_some() {
        &["[n/Enter] Next", "[f] Flag", "[r/Esc] Restart"]
    } else {
        &["[1-9] Answer", "[\u{2191}\u{2193}] Choose", "[Enter] Submit", "[s] Skip", "[f] Flag", "[r/Esc] Restart"]
    };
    let layout = render_footer(frame, app, hints);

    let info = format!(
        " | Question {}/{} | {} correct",
        view.number,
        view.total,
        session.correct_count()
    );
    render_header(frame, app, layout.header, &info);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(layout.main);

    let bar = ProgressBar::new("Progress", session.progress(), app.theme)
        .fill_text(format!("{}/{}", view.number, view.total));
    frame.render_widget(bar, main[0]);
    frame.render_widget(QuestionCard::new(view, app.option_cursor, app.theme), main[1]);

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(SessionSidebar::new(session, app.theme), sidebar);
    }
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let Some(result) = app.engine.result() else {
        return;
    };
    let layout = render_footer(frame, app, &["[r] New quiz", "[\u{2191}\u{2193}] Scroll flagged", "[q] Quit"]);
    let info = format!(" | Finished | {:.0}% | {}", result.percentage, result.grade);
    render_header(frame, app, layout.header, &info);

    let area = match layout.sidebar {
        Some(sidebar) => layout.main.union(sidebar),
        None => layout.main,
    };
    frame.render_widget(ResultsPanel::new(result, app.results_scroll, app.theme), area);
}
