use std::collections::BTreeSet;
use std::time::Instant;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use crate::corpus::{CategoryCatalog, Corpus, Difficulty, QuestionRecord};
use crate::engine::selector::{self, CountSpec, DifficultyFilter};
use crate::engine::validator;
use crate::error::{StartError, StateError};
use crate::session::answer::{AnswerFeedback, AnswerRecord};
use crate::session::result::QuizResult;
use crate::session::setup::SessionConfig;
use crate::store::flags::FlagStore;

/// One run of the quiz, from `start` until restart.
#[derive(Clone, Debug)]
pub struct Session {
    questions: Vec<QuestionRecord>,
    position: usize,
    categories: Vec<String>,
    difficulty: DifficultyFilter,
    count: CountSpec,
    /// Ordered by position; at most one record per position.
    answers: Vec<AnswerRecord>,
    flagged_positions: BTreeSet<usize>,
    started_instant: Instant,
    started_at: DateTime<Utc>,
}

impl Session {
    fn new(questions: Vec<QuestionRecord>, config: &SessionConfig, now: Instant) -> Self {
        Self {
            questions,
            position: 0,
            categories: config.categories.clone(),
            difficulty: config.difficulty,
            count: config.count,
            answers: Vec::new(),
            flagged_positions: BTreeSet::new(),
            started_instant: now,
            started_at: Utc::now(),
        }
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.position)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn difficulty(&self) -> DifficultyFilter {
        self.difficulty
    }

    pub fn count(&self) -> CountSpec {
        self.count
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn answer_at(&self, position: usize) -> Option<&AnswerRecord> {
        self.answers
            .binary_search_by_key(&position, |a| a.position)
            .ok()
            .map(|i| &self.answers[i])
    }

    pub fn is_answered(&self, position: usize) -> bool {
        self.answer_at(position).is_some()
    }

    pub fn flagged_positions(&self) -> &BTreeSet<usize> {
        &self.flagged_positions
    }

    pub fn is_position_flagged(&self, position: usize) -> bool {
        self.flagged_positions.contains(&position)
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn started_instant(&self) -> Instant {
        self.started_instant
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_instant.elapsed().as_secs_f64()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.position as f64 / self.questions.len() as f64
    }

    /// Category shown for a question: its first tag in the active set,
    /// otherwise its first tag.
    fn display_tag<'a>(&self, question: &'a QuestionRecord) -> &'a str {
        question
            .categories
            .iter()
            .find(|t| self.categories.contains(*t))
            .or_else(|| question.categories.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Clone, Debug)]
pub enum Phase {
    Idle,
    Active(Session),
    Finished { session: Session, result: QuizResult },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    Idle,
    Active,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Next { position: usize },
    Finished,
}

/// Everything the presentation layer needs to draw the current question.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub question_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub flagged: bool,
    pub category: String,
    pub category_icon: String,
    pub answer: Option<AnswerFeedback>,
}

/// The quiz state machine: Idle -> Active -> Finished, back to Idle on restart.
///
/// Operations invoked in the wrong state return a [`StateError`] and change nothing.
pub struct QuizEngine {
    corpus: Corpus,
    catalog: CategoryCatalog,
    flags: FlagStore,
    rng: SmallRng,
    phase: Phase,
}

impl QuizEngine {
    pub fn new(corpus: Corpus, catalog: CategoryCatalog, flags: FlagStore) -> Self {
        Self::with_rng(corpus, catalog, flags, SmallRng::from_entropy())
    }

    pub fn with_rng(
        corpus: Corpus,
        catalog: CategoryCatalog,
        flags: FlagStore,
        rng: SmallRng,
    ) -> Self {
        Self {
            corpus,
            catalog,
            flags,
            rng,
            phase: Phase::Idle,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn flags(&self) -> &FlagStore {
        &self.flags
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> QuizState {
        match self.phase {
            Phase::Idle => QuizState::Idle,
            Phase::Active(_) => QuizState::Active,
            Phase::Finished { .. } => QuizState::Finished,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Active(session) | Phase::Finished { session, .. } => Some(session),
        }
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.phase {
            Phase::Finished { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Validate, select, and begin a session. Returns the number of questions.
    pub fn start(&mut self, config: &SessionConfig) -> Result<usize, StartError> {
        self.start_at(config, Instant::now())
    }

    pub fn start_at(&mut self, config: &SessionConfig, now: Instant) -> Result<usize, StartError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(StateError::NotIdle.into());
        }

        let flagged = self.flags.list();
        validator::validate(config, flagged.len())?;

        let questions = selector::select(
            &self.corpus,
            &config.categories,
            config.difficulty,
            config.count,
            &flagged,
            &mut self.rng,
        );
        if questions.is_empty() {
            debug!(
                categories = ?config.categories,
                difficulty = %config.difficulty,
                count = %config.count,
                "selection matched no questions"
            );
            return Err(StartError::EmptySelection);
        }

        let total = questions.len();
        info!(
            questions = total,
            categories = ?config.categories,
            difficulty = %config.difficulty,
            count = %config.count,
            "quiz started"
        );
        self.phase = Phase::Active(Session::new(questions, config, now));
        Ok(total)
    }

    pub fn submit_answer(&mut self, selected: usize) -> Result<AnswerFeedback, StateError> {
        self.submit_answer_at(selected, Instant::now())
    }

    pub fn submit_answer_at(
        &mut self,
        selected: usize,
        now: Instant,
    ) -> Result<AnswerFeedback, StateError> {
        let Phase::Active(session) = &mut self.phase else {
            return Err(StateError::NotActive);
        };
        let position = session.position;
        if session.is_answered(position) {
            return Err(StateError::AlreadyAnswered { position });
        }
        let question = &session.questions[position];
        if selected >= question.options.len() {
            return Err(StateError::OptionOutOfRange {
                index: selected,
                count: question.options.len(),
            });
        }

        let correct = selected == question.correct_index;
        let feedback = AnswerFeedback {
            correct,
            selected_index: selected,
            correct_index: question.correct_index,
            explanation: question.explanation.clone(),
        };
        session.answers.push(AnswerRecord {
            position,
            selected_index: selected,
            correct_index: question.correct_index,
            correct,
            elapsed: now.saturating_duration_since(session.started_instant),
        });
        debug!(position, question = %question.id, correct, "answer recorded");
        Ok(feedback)
    }

    /// Move to the next question, finishing the session after the last one.
    /// Unanswered questions may be skipped.
    pub fn advance(&mut self) -> Result<Advance, StateError> {
        self.advance_at(Instant::now())
    }

    pub fn advance_at(&mut self, now: Instant) -> Result<Advance, StateError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Active(mut session) => {
                session.position += 1;
                if session.position < session.questions.len() {
                    let position = session.position;
                    self.phase = Phase::Active(session);
                    return Ok(Advance::Next { position });
                }
                let result = QuizResult::from_session(&session, now, &self.catalog);
                info!(
                    correct = result.correct,
                    total = result.total,
                    percentage = result.percentage,
                    grade = %result.grade,
                    "quiz finished"
                );
                self.phase = Phase::Finished { session, result };
                Ok(Advance::Finished)
            }
            other => {
                self.phase = other;
                Err(StateError::NotActive)
            }
        }
    }

    /// Flag or unflag the current question, both in the persistent store and
    /// in this session. Returns whether the question is flagged afterwards.
    pub fn toggle_flag(&mut self) -> Result<bool, StateError> {
        let Phase::Active(session) = &mut self.phase else {
            return Err(StateError::NotActive);
        };
        let position = session.position;
        let id = &session.questions[position].id;

        let flagged = self.flags.toggle(id);
        if flagged {
            session.flagged_positions.insert(position);
        } else {
            session.flagged_positions.remove(&position);
        }
        debug!(position, question = %id, flagged, "flag toggled");
        Ok(flagged)
    }

    /// Drop any session and return to Idle. Flags stay in the store.
    pub fn restart(&mut self) {
        if !matches!(self.phase, Phase::Idle) {
            debug!("session discarded");
        }
        self.phase = Phase::Idle;
    }

    pub fn current_question(&self) -> Option<QuestionView> {
        let Phase::Active(session) = &self.phase else {
            return None;
        };
        let question = session.current()?;
        let tag = session.display_tag(question);
        let answer = session.answer_at(session.position).map(|a| AnswerFeedback {
            correct: a.correct,
            selected_index: a.selected_index,
            correct_index: a.correct_index,
            explanation: question.explanation.clone(),
        });

        Some(QuestionView {
            number: session.position + 1,
            total: session.len(),
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            difficulty: question.difficulty,
            flagged: session.is_position_flagged(session.position)
                || self.flags.contains(&question.id),
            category: self.catalog.display_name(tag).to_string(),
            category_icon: self.catalog.icon(tag).to_string(),
            answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::corpus::CategoryInfo;
    use crate::corpus::tests::question;
    use crate::error::ConfigError;

    fn corpus() -> Corpus {
        Corpus::new(vec![
            question("s1", &["sleep"], Difficulty::Easy),
            question("s2", &["sleep"], Difficulty::Easy),
            question("s3", &["sleep", "mind"], Difficulty::Hard),
            question("d1", &["diet"], Difficulty::Medium),
        ])
        .unwrap()
    }

    fn catalog() -> CategoryCatalog {
        CategoryCatalog::new(vec![CategoryInfo {
            tag: "sleep".into(),
            name: "Sleep".into(),
            icon: "z".into(),
        }])
    }

    fn engine() -> QuizEngine {
        QuizEngine::with_rng(
            corpus(),
            catalog(),
            FlagStore::in_memory(),
            SmallRng::seed_from_u64(11),
        )
    }

    fn config(categories: &[&str], count: CountSpec) -> SessionConfig {
        SessionConfig::new(
            categories.iter().map(|s| s.to_string()).collect(),
            count,
            DifficultyFilter::All,
        )
    }

    fn correct_index_now(engine: &QuizEngine) -> usize {
        engine.session().unwrap().current().unwrap().correct_index
    }

    #[test]
    fn starts_idle() {
        let engine = engine();
        assert_eq!(engine.state(), QuizState::Idle);
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn start_with_fewer_matches_than_requested() {
        let mut engine = engine();
        assert_eq!(engine.start(&config(&["sleep"], CountSpec::Limit(5))), Ok(3));
        assert_eq!(engine.state(), QuizState::Active);
        let view = engine.current_question().unwrap();
        assert_eq!((view.number, view.total), (1, 3));
    }

    #[test]
    fn invalid_config_keeps_idle() {
        let mut engine = engine();
        assert_eq!(
            engine.start(&config(&[], CountSpec::Limit(10))),
            Err(StartError::Config(ConfigError::NoCategories))
        );
        assert_eq!(engine.state(), QuizState::Idle);
    }

    #[test]
    fn empty_selection_keeps_idle() {
        let mut engine = engine();
        let mut cfg = config(&["diet"], CountSpec::All);
        cfg.difficulty = DifficultyFilter::Hard;
        assert_eq!(engine.start(&cfg), Err(StartError::EmptySelection));
        assert_eq!(engine.state(), QuizState::Idle);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut engine = engine();
        engine.start(&config(&["sleep"], CountSpec::All)).unwrap();
        assert_eq!(
            engine.start(&config(&["diet"], CountSpec::All)),
            Err(StartError::State(StateError::NotIdle))
        );
        assert_eq!(engine.session().unwrap().len(), 3);
    }

    #[test]
    fn second_answer_does_not_overwrite_first() {
        let mut engine = engine();
        engine.start(&config(&["sleep"], CountSpec::All)).unwrap();
        let right = correct_index_now(&engine);
        let wrong = (right + 1) % 4;

        let feedback = engine.submit_answer(wrong).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_index, right);
        let first = engine.session().unwrap().answers()[0].clone();

        assert_eq!(
            engine.submit_answer(right),
            Err(StateError::AlreadyAnswered { position: 0 })
        );
        assert_eq!(engine.session().unwrap().answers(), &[first]);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut engine = engine();
        engine.start(&config(&["sleep"], CountSpec::All)).unwrap();
        assert_eq!(
            engine.submit_answer(9),
            Err(StateError::OptionOutOfRange { index: 9, count: 4 })
        );
        assert!(engine.session().unwrap().answers().is_empty());
    }

    #[test]
    fn answer_feedback_carries_explanation() {
        let mut engine = engine();
        engine.start(&config(&["diet"], CountSpec::All)).unwrap();
        let feedback = engine.submit_answer(1).unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.explanation.as_deref(), Some("Because d1."));
        assert_eq!(engine.session().unwrap().position(), 0);
    }

    #[test]
    fn operations_outside_active_are_noops() {
        let mut engine = engine();
        assert_eq!(engine.submit_answer(0), Err(StateError::NotActive));
        assert_eq!(engine.advance(), Err(StateError::NotActive));
        assert_eq!(engine.toggle_flag(), Err(StateError::NotActive));
        assert_eq!(engine.state(), QuizState::Idle);
        assert!(engine.flags().is_empty());
    }

    #[test]
    fn advancing_past_the_end_finishes_once() {
        let mut engine = engine();
        let t0 = Instant::now();
        engine.start_at(&config(&["sleep"], CountSpec::All), t0).unwrap();

        for i in 0..3 {
            let right = correct_index_now(&engine);
            let pick = if i == 0 { (right + 1) % 4 } else { right };
            engine
                .submit_answer_at(pick, t0 + Duration::from_secs(i + 1))
                .unwrap();
            let step = engine.advance_at(t0 + Duration::from_secs(6)).unwrap();
            if i < 2 {
                assert_eq!(step, Advance::Next { position: i as usize + 1 });
            } else {
                assert_eq!(step, Advance::Finished);
            }
        }

        assert_eq!(engine.state(), QuizState::Finished);
        let result = engine.result().unwrap().clone();
        assert_eq!((result.correct, result.incorrect, result.total), (2, 1, 3));
        assert!((result.elapsed_secs - 6.0).abs() < 1e-9);
        assert!((result.average_secs - 2.0).abs() < 1e-9);
        assert_eq!(result.grade, "C");

        // A stale advance after finishing changes nothing.
        assert_eq!(engine.advance(), Err(StateError::NotActive));
        assert_eq!(engine.result(), Some(&result));
        assert_eq!(engine.session().unwrap().answers()[1].elapsed, Duration::from_secs(2));
    }

    #[test]
    fn skipped_questions_count_as_not_answered() {
        let mut engine = engine();
        engine.start(&config(&["diet"], CountSpec::All)).unwrap();
        engine.toggle_flag().unwrap();
        assert_eq!(engine.advance(), Ok(Advance::Finished));

        let result = engine.result().unwrap();
        assert_eq!((result.answered, result.correct, result.incorrect), (0, 0, 1));
        assert_eq!(result.flagged.len(), 1);
        assert_eq!(result.flagged[0].answer_label(), "not answered");
        assert!(!result.flagged[0].correct);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn toggle_flag_updates_store_and_session() {
        let mut engine = engine();
        engine.start(&config(&["sleep"], CountSpec::All)).unwrap();
        let id = engine.current_question().unwrap().question_id;

        assert_eq!(engine.toggle_flag(), Ok(true));
        assert!(engine.flags().contains(&id));
        assert!(engine.session().unwrap().is_position_flagged(0));
        assert!(engine.current_question().unwrap().flagged);

        assert_eq!(engine.toggle_flag(), Ok(false));
        assert!(!engine.flags().contains(&id));
        assert!(!engine.session().unwrap().is_position_flagged(0));
        assert!(!engine.current_question().unwrap().flagged);
    }

    #[test]
    fn flag_already_in_store_is_removed_by_toggle() {
        let mut engine = engine();
        engine.flags().add("d1");
        engine.start(&config(&["diet"], CountSpec::All)).unwrap();
        assert!(engine.current_question().unwrap().flagged);
        assert_eq!(engine.toggle_flag(), Ok(false));
        assert!(engine.flags().is_empty());
    }

    #[test]
    fn restart_discards_session_but_keeps_flags() {
        let mut engine = engine();
        engine.start(&config(&["sleep"], CountSpec::All)).unwrap();
        engine.toggle_flag().unwrap();
        engine.restart();
        assert_eq!(engine.state(), QuizState::Idle);
        assert!(engine.session().is_none());
        assert_eq!(engine.flags().len(), 1);

        engine.restart();
        assert_eq!(engine.state(), QuizState::Idle);
    }

    #[test]
    fn flagged_review_ignores_category_filter() {
        let mut engine = engine();
        engine.flags().add("d1");
        engine.flags().add("s3");
        assert_eq!(engine.start(&config(&["sleep"], CountSpec::Flagged)), Ok(2));
        let ids: Vec<&str> = engine
            .session()
            .unwrap()
            .questions()
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s3", "d1"]);
    }

    #[test]
    fn view_resolves_category_display_name() {
        let mut engine = engine();
        engine.flags().add("s3");
        engine.start(&config(&["mind"], CountSpec::Flagged)).unwrap();
        let view = engine.current_question().unwrap();
        assert_eq!(view.category, "mind");

        engine.restart();
        engine.start(&config(&["diet"], CountSpec::Flagged)).unwrap();
        let view = engine.current_question().unwrap();
        assert_eq!(view.category, "Sleep");
        assert_eq!(view.category_icon, "z");
    }
}
