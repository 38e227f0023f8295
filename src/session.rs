use crate::gateway::GatewayHandle;
use crate::models::{
    AnswerSet, AppState, GatewayRequest, GatewayResponse, QuestionsResponse, QuizMetadata,
    QuizPhase, QuizQuestion, QuizResult, SubmitPayload, SubmitResponse, SubmitStorage,
};
use crate::review::{PageMove, ReviewPager};
use crate::store::{self, KeyValueStore, LAST_RESULT_KEY, PLAYER_NAME_KEY};
use crate::timer::{Clock, QuizTimer};
use crate::utils::percent;
use crossterm::event::{KeyCode, KeyEvent};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NAME_MAX_CHARS: usize = 120;
pub const LOAD_FAILED_MESSAGE: &str = "Quizfragen konnten nicht geladen werden.";
pub const SELECT_ANSWER_MESSAGE: &str = "Bitte wähle mindestens eine Antwort.";
pub const SUBMIT_FAILED_MESSAGE: &str = "Das hat leider nicht geklappt. Bitte versuch es erneut.";
pub const NAME_REQUIRED_MESSAGE: &str = "Bitte gib einen Namen ein.";
pub const NAME_TOO_LONG_MESSAGE: &str = "Name ist zu lang (max. 120 Zeichen).";
pub const NO_QUESTIONS_MESSAGE: &str = "Aktuell sind keine Quizfragen verfügbar.";

/// Name capture step shown before the quiz can start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePrompt {
    pub input: String,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct QuizSession {
    pub phase: QuizPhase,
    pub metadata: Option<QuizMetadata>,
    pub questions: Vec<QuizQuestion>,
    pub current_index: usize,
    pub selections: AnswerSet,
    pub choice_cursor: usize,
    pub timer: QuizTimer,
    pub player_name: String,
    pub name_prompt: Option<NamePrompt>,
    pub result: Option<QuizResult>,
    pub storage: Option<SubmitStorage>,
    pub leaderboard_preview: Vec<QuizResult>,
    pub review: ReviewPager,
    pub error_message: Option<String>,
    gateway: GatewayHandle,
    pending: Option<u64>,
}

impl QuizSession {
    pub fn new(gateway: GatewayHandle, clock: Arc<dyn Clock>, store: &dyn KeyValueStore) -> Self {
        let player_name = store::read_or_none(store, PLAYER_NAME_KEY)
            .map(|name| name.trim().to_string())
            .unwrap_or_default();

        Self {
            phase: QuizPhase::Loading,
            metadata: None,
            questions: Vec::new(),
            current_index: 0,
            selections: AnswerSet::new(),
            choice_cursor: 0,
            timer: QuizTimer::new(clock),
            player_name,
            name_prompt: None,
            result: None,
            storage: None,
            leaderboard_preview: Vec::new(),
            review: ReviewPager::default(),
            error_message: None,
            gateway,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn load_questions(&mut self) {
        self.phase = QuizPhase::Loading;
        self.error_message = None;
        self.pending = Some(
            self.gateway
                .send(|ticket| GatewayRequest::LoadQuestions { ticket }),
        );
        info!("Loading quiz questions");
    }

    /// Apply a gateway response. Responses this session is not waiting for
    /// (late, from before a restart, or for another view) are ignored.
    pub fn handle_response(&mut self, response: GatewayResponse, store: &dyn KeyValueStore) {
        if self.pending != Some(response.ticket()) {
            debug!(ticket = response.ticket(), "quiz session ignoring response");
            return;
        }
        self.pending = None;

        match response {
            GatewayResponse::Questions { result, .. } => match result {
                Ok(response) => self.on_questions_loaded(response),
                Err(e) => {
                    warn!(error = %e, "failed to load quiz questions");
                    self.phase = QuizPhase::Error;
                    self.error_message = Some(LOAD_FAILED_MESSAGE.to_string());
                }
            },
            GatewayResponse::Submitted { result, .. } => match result {
                Ok(response) => self.on_submitted(response, store),
                Err(e) => {
                    warn!(error = %e, "quiz submission failed");
                    self.phase = QuizPhase::Confirm;
                    self.error_message = Some(SUBMIT_FAILED_MESSAGE.to_string());
                    self.storage = None;
                    self.review = ReviewPager::default();
                }
            },
            other => {
                warn!(ticket = other.ticket(), "unexpected response kind for quiz session");
            }
        }
    }

    fn on_questions_loaded(&mut self, response: QuestionsResponse) {
        info!(
            count = response.items.len(),
            planned = response.metadata.planned_total,
            "Quiz questions loaded"
        );
        self.metadata = Some(response.metadata);
        self.questions = response.items;
        self.current_index = 0;
        self.phase = QuizPhase::Intro;

        if self.player_name.is_empty() {
            self.open_name_prompt();
        } else {
            self.begin_quiz();
        }
    }

    fn on_submitted(&mut self, response: SubmitResponse, store: &dyn KeyValueStore) {
        info!(
            id = %response.result.id,
            correct = response.result.correct,
            total = response.result.total,
            rank = response.result.rank,
            "Quiz submitted"
        );

        let highlight_id = response
            .storage
            .as_ref()
            .and_then(|s| s.highlight_id.clone())
            .unwrap_or_else(|| response.result.id.clone());
        store::write_or_log(store, LAST_RESULT_KEY, &highlight_id);

        self.timer.set_elapsed(response.result.time_ms);
        self.metadata = Some(response.metadata);
        self.leaderboard_preview = response.leaderboard;
        self.review = ReviewPager::new(response.review);
        self.storage = response.storage;
        self.result = Some(response.result);
        self.error_message = None;
        self.phase = QuizPhase::Submitted;
    }

    fn begin_quiz(&mut self) {
        if self.questions.is_empty() {
            warn!("no playable questions, staying in intro");
            self.phase = QuizPhase::Intro;
            self.error_message = Some(NO_QUESTIONS_MESSAGE.to_string());
            return;
        }
        self.error_message = None;
        self.phase = QuizPhase::Quiz;
        self.current_index = 0;
        self.choice_cursor = 0;
        self.timer.start();
        info!(player = %self.player_name, "Quiz started");
    }

    /// Intro action: start right away when a name is known, otherwise ask
    /// for one first.
    pub fn start_quiz_flow(&mut self) {
        if self.phase != QuizPhase::Intro {
            return;
        }
        if self.player_name.is_empty() {
            self.open_name_prompt();
            return;
        }
        self.begin_quiz();
    }

    pub fn open_name_prompt(&mut self) {
        self.name_prompt = Some(NamePrompt {
            input: self.player_name.clone(),
            error: None,
        });
    }

    pub fn dismiss_name_prompt(&mut self) {
        self.name_prompt = None;
    }

    pub fn save_name(&mut self, store: &dyn KeyValueStore) {
        let Some(prompt) = self.name_prompt.as_mut() else {
            return;
        };

        let name = prompt.input.trim();
        if name.is_empty() {
            prompt.error = Some(NAME_REQUIRED_MESSAGE.to_string());
            return;
        }
        if name.chars().count() > NAME_MAX_CHARS {
            prompt.error = Some(NAME_TOO_LONG_MESSAGE.to_string());
            return;
        }

        self.player_name = name.to_string();
        self.name_prompt = None;
        store::write_or_log(store, PLAYER_NAME_KEY, &self.player_name);

        if self.phase == QuizPhase::Intro {
            self.begin_quiz();
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.current_index)
    }

    /// Single-answer questions keep exactly the chosen id; multi-answer
    /// questions toggle it.
    pub fn select_option(&mut self, question_id: &str, choice_id: &str) {
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return;
        };
        if !question.choices.iter().any(|c| c.id == choice_id) {
            return;
        }

        let selected = self.selections.entry(question.id.clone()).or_default();
        if question.multi {
            if !selected.remove(choice_id) {
                selected.insert(choice_id.to_string());
            }
        } else {
            selected.clear();
            selected.insert(choice_id.to_string());
        }
        self.error_message = None;
    }

    pub fn select_choice_at(&mut self, index: usize) {
        let Some(question) = self.current_question() else {
            return;
        };
        let Some(choice) = question.choices.get(index) else {
            return;
        };
        let (question_id, choice_id) = (question.id.clone(), choice.id.clone());
        self.choice_cursor = index;
        self.select_option(&question_id, &choice_id);
    }

    pub fn move_choice_cursor(&mut self, forward: bool) {
        let count = self.current_question().map_or(0, |q| q.choices.len());
        if count == 0 {
            return;
        }
        if forward {
            self.choice_cursor = (self.choice_cursor + 1).min(count - 1);
        } else {
            self.choice_cursor = self.choice_cursor.saturating_sub(1);
        }
    }

    pub fn is_selected(&self, question_id: &str, choice_id: &str) -> bool {
        self.selections
            .get(question_id)
            .is_some_and(|s| s.contains(choice_id))
    }

    pub fn has_selection(&self) -> bool {
        self.current_question()
            .and_then(|q| self.selections.get(&q.id))
            .is_some_and(|s| !s.is_empty())
    }

    pub fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.selections.get(&q.id).is_some_and(|s| !s.is_empty()))
            .count()
    }

    /// Advancing is always allowed; selections are only checked on submit.
    pub fn go_next(&mut self) {
        if self.phase != QuizPhase::Quiz || self.current_question().is_none() {
            return;
        }
        self.error_message = None;
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.choice_cursor = 0;
            return;
        }
        self.phase = QuizPhase::Confirm;
    }

    pub fn go_back(&mut self) {
        match self.phase {
            QuizPhase::Confirm => {
                self.phase = QuizPhase::Quiz;
                self.error_message = None;
            }
            QuizPhase::Quiz if self.current_index > 0 => {
                self.current_index -= 1;
                self.choice_cursor = 0;
                self.error_message = None;
            }
            _ => {}
        }
    }

    pub fn submit_quiz(&mut self) {
        if !matches!(self.phase, QuizPhase::Quiz | QuizPhase::Confirm) {
            return;
        }
        if self.player_name.is_empty() {
            self.open_name_prompt();
            return;
        }

        let mut answers = BTreeMap::new();
        for (index, question) in self.questions.iter().enumerate() {
            match self.selections.get(&question.id) {
                Some(selected) if !selected.is_empty() => {
                    answers.insert(question.id.clone(), selected.iter().cloned().collect());
                }
                _ => {
                    debug!(question = %question.id, "submit blocked by unanswered question");
                    self.error_message = Some(SELECT_ANSWER_MESSAGE.to_string());
                    self.phase = QuizPhase::Quiz;
                    self.current_index = index;
                    self.choice_cursor = 0;
                    return;
                }
            }
        }

        self.timer.stop();
        let payload = SubmitPayload {
            name: self.player_name.clone(),
            time_ms: self.timer.elapsed_ms(),
            answers,
        };
        self.phase = QuizPhase::Loading;
        self.pending = Some(
            self.gateway
                .send(|ticket| GatewayRequest::Submit { ticket, payload }),
        );
    }

    /// Fresh attempt with the same questions and player name.
    pub fn restart_quiz(&mut self) {
        self.result = None;
        self.storage = None;
        self.leaderboard_preview.clear();
        self.review = ReviewPager::default();
        self.timer.reset();
        self.current_index = 0;
        self.choice_cursor = 0;
        self.selections.clear();
        self.error_message = None;
        self.pending = None;
        self.phase = QuizPhase::Quiz;
        self.timer.start();
        info!("Quiz restarted");
    }

    /// Stop the timer and forget in-flight requests when the view closes.
    pub fn teardown(&mut self) {
        self.timer.stop();
        self.pending = None;
    }

    pub fn next_review(&mut self) -> PageMove {
        self.review.next()
    }

    pub fn prev_review(&mut self) -> PageMove {
        self.review.prev()
    }

    pub fn total_question_count(&self) -> usize {
        if !self.questions.is_empty() {
            return self.questions.len();
        }
        self.metadata.as_ref().map_or(0, |m| m.active_total as usize)
    }

    pub fn progress_label(&self) -> String {
        let total = self.total_question_count();
        if total == 0 {
            return "–".to_string();
        }
        let current = (self.current_index + 1).min(total);
        format!("{}/{}", current, total)
    }

    pub fn progress_percent(&self) -> u16 {
        let total = self.total_question_count();
        percent((self.current_index + 1).min(total), total)
    }

    pub fn timer_display(&self) -> String {
        self.timer.display()
    }

    pub fn status_message(&self) -> String {
        match &self.metadata {
            None => String::new(),
            Some(m) if m.upcoming_total > 0 => {
                format!("{} geplant – {} in Arbeit", m.planned_total, m.upcoming_total)
            }
            Some(m) => format!("{} Fragen live", m.active_total),
        }
    }
}

pub fn handle_quiz_input(
    session: &mut QuizSession,
    key: KeyEvent,
    app_state: &mut AppState,
    store: &dyn KeyValueStore,
) {
    if let Some(prompt) = session.name_prompt.as_mut() {
        match key.code {
            KeyCode::Esc => session.dismiss_name_prompt(),
            KeyCode::Enter => session.save_name(store),
            KeyCode::Backspace => {
                prompt.input.pop();
                prompt.error = None;
            }
            KeyCode::Char(c) => {
                prompt.input.push(c);
                prompt.error = None;
            }
            _ => {}
        }
        return;
    }

    match session.phase {
        QuizPhase::Loading => {}
        QuizPhase::Error => match key.code {
            KeyCode::Char('r') => session.load_questions(),
            KeyCode::Esc => *app_state = AppState::Menu,
            _ => {}
        },
        QuizPhase::Intro => match key.code {
            KeyCode::Enter => session.start_quiz_flow(),
            KeyCode::Char('r') if session.questions.is_empty() => session.load_questions(),
            KeyCode::Char('n') => session.open_name_prompt(),
            KeyCode::Esc => *app_state = AppState::Menu,
            _ => {}
        },
        QuizPhase::Quiz => match key.code {
            KeyCode::Up => session.move_choice_cursor(false),
            KeyCode::Down => session.move_choice_cursor(true),
            KeyCode::Char(' ') => session.select_choice_at(session.choice_cursor),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                if let Some(digit) = c.to_digit(10) {
                    session.select_choice_at(digit as usize - 1);
                }
            }
            KeyCode::Enter | KeyCode::Right => session.go_next(),
            KeyCode::Left | KeyCode::Backspace => session.go_back(),
            KeyCode::Char('n') => session.open_name_prompt(),
            KeyCode::Esc => *app_state = AppState::QuizQuitConfirm,
            _ => {}
        },
        QuizPhase::Confirm => match key.code {
            KeyCode::Enter => session.submit_quiz(),
            KeyCode::Left | KeyCode::Backspace => session.go_back(),
            KeyCode::Char('n') => session.open_name_prompt(),
            KeyCode::Esc => *app_state = AppState::QuizQuitConfirm,
            _ => {}
        },
        QuizPhase::Submitted => match key.code {
            KeyCode::Left => {
                session.prev_review();
            }
            KeyCode::Right => {
                session.next_review();
            }
            KeyCode::Char('r') => session.restart_quiz(),
            KeyCode::Char('l') => *app_state = AppState::Leaderboard,
            KeyCode::Esc | KeyCode::Char('m') => *app_state = AppState::Menu,
            _ => {}
        },
    }
}
