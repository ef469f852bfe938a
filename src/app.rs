use tracing::{debug, warn};

use quizr::config::Config;
use quizr::corpus::{CategoryCatalog, Corpus};
use quizr::engine::selector::{CountSpec, DifficultyFilter};
use quizr::session::{Advance, AnswerFeedback, QuestionView, QuizEngine, QuizState, SessionConfig};
use quizr::store::FlagStore;

use crate::ui::theme::Theme;

pub const COUNT_CHOICES: [CountSpec; 8] = [
    CountSpec::Limit(5),
    CountSpec::Limit(10),
    CountSpec::Limit(15),
    CountSpec::Limit(20),
    CountSpec::Limit(25),
    CountSpec::Limit(50),
    CountSpec::All,
    CountSpec::Flagged,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Setup,
    Question,
    Results,
}

pub struct CategoryChoice {
    pub tag: String,
    pub name: String,
    pub icon: String,
    pub available: usize,
    pub selected: bool,
}

/// The preset counts, plus `saved` in numeric order when it is a limit
/// outside the presets.
fn count_choices(saved: CountSpec) -> Vec<CountSpec> {
    let mut choices = COUNT_CHOICES.to_vec();
    if let CountSpec::Limit(m) = saved
        && !choices.contains(&saved)
    {
        let at = choices
            .iter()
            .position(|c| !matches!(c, CountSpec::Limit(n) if *n < m))
            .unwrap_or(choices.len());
        choices.insert(at, saved);
    }
    choices
}

/// Setup screen rows: one per category, then count, difficulty, and start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupRow {
    Category(usize),
    Count,
    Difficulty,
    Start,
}

pub struct SetupState {
    pub categories: Vec<CategoryChoice>,
    pub cursor: usize,
    pub count_choices: Vec<CountSpec>,
    pub count_index: usize,
    pub difficulty: DifficultyFilter,
    pub flagged_available: usize,
    pub message: Option<String>,
}

impl SetupState {
    pub fn new(corpus: &Corpus, catalog: &CategoryCatalog, config: &Config) -> Self {
        let categories = corpus
            .categories()
            .into_iter()
            .map(|tag| CategoryChoice {
                tag: tag.to_string(),
                name: catalog.display_name(tag).to_string(),
                icon: catalog.icon(tag).to_string(),
                available: corpus.count_in_category(tag),
                selected: config.default_categories.iter().any(|c| c == tag),
            })
            .collect();
        let count = config.count_spec();
        let count_choices = count_choices(count);
        Self {
            categories,
            cursor: 0,
            count_index: count_choices.iter().position(|&c| c == count).unwrap_or(1),
            count_choices,
            difficulty: config.difficulty_filter(),
            flagged_available: 0,
            message: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.categories.len() + 3
    }

    pub fn row(&self, index: usize) -> SetupRow {
        let n = self.categories.len();
        match index {
            i if i < n => SetupRow::Category(i),
            i if i == n => SetupRow::Count,
            i if i == n + 1 => SetupRow::Difficulty,
            _ => SetupRow::Start,
        }
    }

    pub fn current_row(&self) -> SetupRow {
        self.row(self.cursor)
    }

    pub fn count(&self) -> CountSpec {
        self.count_choices[self.count_index]
    }

    pub fn selected_tags(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.tag.clone())
            .collect()
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.selected_tags(), self.count(), self.difficulty)
    }

    pub fn next_row(&mut self) {
        self.cursor = (self.cursor + 1) % self.rows();
    }

    pub fn prev_row(&mut self) {
        self.cursor = (self.cursor + self.rows() - 1) % self.rows();
    }

    pub fn toggle_all(&mut self) {
        let select = !self.categories.iter().all(|c| c.selected);
        for c in &mut self.categories {
            c.selected = select;
        }
    }

    /// Space/Right on the focused row.
    pub fn activate(&mut self, forward: bool) {
        match self.current_row() {
            SetupRow::Category(i) => self.categories[i].selected = !self.categories[i].selected,
            SetupRow::Count => {
                let n = self.count_choices.len();
                self.count_index = if forward {
                    (self.count_index + 1) % n
                } else {
                    (self.count_index + n - 1) % n
                };
            }
            SetupRow::Difficulty => {
                self.difficulty = if forward {
                    self.difficulty.next()
                } else {
                    self.difficulty.prev()
                };
            }
            SetupRow::Start => {}
        }
        self.message = None;
    }
}

pub struct App {
    pub engine: QuizEngine,
    pub setup: SetupState,
    pub view: Option<QuestionView>,
    pub option_cursor: usize,
    pub results_scroll: usize,
    pub theme: &'static Theme,
    pub config: Config,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        corpus: Corpus,
        catalog: CategoryCatalog,
        flags: FlagStore,
        config: Config,
        theme: &'static Theme,
    ) -> Self {
        let setup = SetupState::new(&corpus, &catalog, &config);
        let mut app = Self {
            engine: QuizEngine::new(corpus, catalog, flags),
            setup,
            view: None,
            option_cursor: 0,
            results_scroll: 0,
            theme,
            config,
            should_quit: false,
        };
        app.refresh();
        app
    }

    pub fn screen(&self) -> AppScreen {
        match self.engine.state() {
            QuizState::Idle => AppScreen::Setup,
            QuizState::Active => AppScreen::Question,
            QuizState::Finished => AppScreen::Results,
        }
    }

    fn refresh(&mut self) {
        self.view = self.engine.current_question();
        if self.screen() == AppScreen::Setup {
            self.setup.flagged_available = self.engine.flags().len();
        }
    }

    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.view.as_ref().and_then(|v| v.answer.as_ref())
    }

    pub fn start_quiz(&mut self) {
        let config = self.setup.session_config();
        match self.engine.start(&config) {
            Ok(_) => {
                self.setup.message = None;
                self.option_cursor = 0;
                self.remember_setup(&config);
            }
            Err(err) => self.setup.message = Some(err.to_string()),
        }
        self.refresh();
    }

    pub fn answer(&mut self, index: usize) {
        match self.engine.submit_answer(index) {
            Ok(_) => self.option_cursor = index,
            Err(err) => debug!(%err, "answer ignored"),
        }
        self.refresh();
    }

    pub fn answer_selected(&mut self) {
        self.answer(self.option_cursor);
    }

    /// Advance to the next question; also used to skip an unanswered one.
    pub fn next_question(&mut self) {
        match self.engine.advance() {
            Ok(Advance::Next { .. }) => self.option_cursor = 0,
            Ok(Advance::Finished) => self.results_scroll = 0,
            Err(err) => debug!(%err, "advance ignored"),
        }
        self.refresh();
    }

    pub fn toggle_flag(&mut self) {
        if let Err(err) = self.engine.toggle_flag() {
            debug!(%err, "flag toggle ignored");
        }
        self.refresh();
    }

    pub fn restart(&mut self) {
        self.engine.restart();
        self.option_cursor = 0;
        self.results_scroll = 0;
        self.refresh();
    }

    pub fn move_option(&mut self, down: bool) {
        let Some(view) = &self.view else {
            return;
        };
        if view.answer.is_some() || view.options.is_empty() {
            return;
        }
        let n = view.options.len();
        self.option_cursor = if down {
            (self.option_cursor + 1) % n
        } else {
            (self.option_cursor + n - 1) % n
        };
    }

    pub fn scroll_results(&mut self, down: bool) {
        let flagged = self.engine.result().map(|r| r.flagged.len()).unwrap_or(0);
        self.results_scroll = if down {
            (self.results_scroll + 1).min(flagged.saturating_sub(1))
        } else {
            self.results_scroll.saturating_sub(1)
        };
    }

    /// Keep the last setup as the next launch's default.
    fn remember_setup(&mut self, config: &SessionConfig) {
        self.config.default_categories = config.categories.clone();
        self.config.default_count = config.count.to_string();
        self.config.default_difficulty = config.difficulty.to_string();
        if let Err(err) = self.config.save() {
            warn!(error = %err, "could not save config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let corpus = Corpus::bundled().unwrap();
        let catalog = CategoryCatalog::bundled().unwrap();
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        App::new(corpus, catalog, FlagStore::in_memory(), Config::default(), theme)
    }

    #[test]
    fn setup_rows_cover_categories_then_controls() {
        let app = app();
        let n = app.setup.categories.len();
        assert_eq!(app.setup.row(0), SetupRow::Category(0));
        assert_eq!(app.setup.row(n), SetupRow::Count);
        assert_eq!(app.setup.row(n + 1), SetupRow::Difficulty);
        assert_eq!(app.setup.row(n + 2), SetupRow::Start);
    }

    #[test]
    fn count_cycles_through_choices() {
        let mut app = app();
        app.setup.cursor = app.setup.categories.len();
        assert_eq!(app.setup.count(), CountSpec::Limit(10));
        app.setup.activate(false);
        assert_eq!(app.setup.count(), CountSpec::Limit(5));
        app.setup.activate(false);
        assert_eq!(app.setup.count(), CountSpec::Flagged);
    }

    #[test]
    fn saved_count_outside_presets_becomes_a_choice() {
        let corpus = Corpus::bundled().unwrap();
        let catalog = CategoryCatalog::bundled().unwrap();
        let mut config = Config::default();
        config.default_count = "7".to_string();
        let mut setup = SetupState::new(&corpus, &catalog, &config);
        assert_eq!(setup.count(), CountSpec::Limit(7));
        assert_eq!(setup.count_choices.len(), COUNT_CHOICES.len() + 1);

        setup.cursor = setup.categories.len();
        setup.activate(true);
        assert_eq!(setup.count(), CountSpec::Limit(10));
        setup.activate(false);
        setup.activate(false);
        assert_eq!(setup.count(), CountSpec::Limit(5));
    }

    #[test]
    fn preset_counts_are_not_duplicated() {
        assert_eq!(count_choices(CountSpec::Limit(25)), COUNT_CHOICES.to_vec());
        assert_eq!(count_choices(CountSpec::Flagged), COUNT_CHOICES.to_vec());
        assert_eq!(count_choices(CountSpec::Limit(30))[5], CountSpec::Limit(30));
    }

    #[test]
    fn start_without_categories_shows_reason() {
        let mut app = app();
        app.start_quiz();
        assert_eq!(app.screen(), AppScreen::Setup);
        assert_eq!(app.setup.message.as_deref(), Some("select at least one category"));
    }

    #[test]
    fn answer_then_double_submit_keeps_first_feedback() {
        let mut app = app();
        app.setup.categories[0].selected = true;
        app.setup.count_index = 0;
        let config = app.setup.session_config();
        app.engine.start(&config).unwrap();
        app.refresh();
        assert_eq!(app.screen(), AppScreen::Question);

        app.answer(0);
        let first = app.feedback().cloned().unwrap();
        app.answer(1);
        assert_eq!(app.feedback(), Some(&first));
        assert_eq!(app.option_cursor, 0);
    }
}
