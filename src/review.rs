use crate::error::GatewayError;
use crate::gateway::GatewayHandle;
use crate::models::{GatewayRequest, QuizResult, ReviewQuestion, ReviewResponse};
use tracing::warn;

pub const REVIEW_LOAD_FAILED_MESSAGE: &str = "Auswertung konnte nicht geladen werden.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Moved,
    /// `prev` at the first question, or nothing to page through.
    AtStart,
    /// `next` at the last question. Callers may treat this as "close".
    AtEnd,
}

/// Cursor over graded questions, clamped to `[0, len - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPager {
    questions: Vec<ReviewQuestion>,
    index: usize,
}

impl ReviewPager {
    pub fn new(questions: Vec<ReviewQuestion>) -> Self {
        Self {
            questions,
            index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn questions(&self) -> &[ReviewQuestion] {
        &self.questions
    }

    pub fn current(&self) -> Option<&ReviewQuestion> {
        self.questions.get(self.index)
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn next(&mut self) -> PageMove {
        if self.questions.is_empty() || self.is_last() {
            return PageMove::AtEnd;
        }
        self.index += 1;
        PageMove::Moved
    }

    pub fn prev(&mut self) -> PageMove {
        if self.questions.is_empty() || self.index == 0 {
            return PageMove::AtStart;
        }
        self.index -= 1;
        PageMove::Moved
    }

    pub fn correct_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_correct()).count()
    }
}

/// Review of one leaderboard entry, fetched on demand. Each overlay owns
/// its own pager.
#[derive(Debug)]
pub struct ReviewOverlay {
    pub entry_id: String,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub result: Option<QuizResult>,
    pub pager: ReviewPager,
    ticket: u64,
}

impl ReviewOverlay {
    pub fn open(gateway: &GatewayHandle, entry_id: &str) -> Self {
        let id = entry_id.to_string();
        let ticket = gateway.send(|ticket| GatewayRequest::LoadReview { ticket, id });
        Self {
            entry_id: entry_id.to_string(),
            is_loading: true,
            error_message: None,
            result: None,
            pager: ReviewPager::default(),
            ticket,
        }
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn apply(&mut self, result: Result<ReviewResponse, GatewayError>) {
        self.is_loading = false;
        match result {
            Ok(response) => {
                self.pager = ReviewPager::new(response.questions);
                self.result = Some(response.result);
                self.error_message = None;
            }
            Err(e) => {
                warn!(id = %self.entry_id, error = %e, "failed to load review");
                self.error_message = Some(REVIEW_LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }
}

/// Page forward; paging past the last question closes the overlay.
pub fn advance_overlay(overlay: &mut Option<ReviewOverlay>) {
    let close = match overlay.as_mut() {
        Some(o) if o.is_loading || o.error_message.is_some() => false,
        Some(o) => o.pager.next() == PageMove::AtEnd,
        None => false,
    };
    if close {
        *overlay = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::review_question;

    fn pager(n: usize) -> ReviewPager {
        ReviewPager::new(
            (0..n)
                .map(|i| review_question(&format!("q{}", i + 1), &["A"], &["A"]))
                .collect(),
        )
    }

    #[test]
    fn test_prev_at_start_is_noop() {
        let mut pager = pager(3);
        assert_eq!(pager.prev(), PageMove::AtStart);
        assert_eq!(pager.index(), 0);
    }

    #[test]
    fn test_next_at_end_is_noop() {
        let mut pager = pager(3);
        assert_eq!(pager.next(), PageMove::Moved);
        assert_eq!(pager.next(), PageMove::Moved);
        assert_eq!(pager.index(), 2);
        assert!(pager.is_last());
        assert_eq!(pager.next(), PageMove::AtEnd);
        assert_eq!(pager.index(), 2);
        assert_eq!(pager.current().unwrap().id, "q3");
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut pager = pager(4);
        let moves = [true, true, false, true, true, true, false, false, false, false, true];
        for forward in moves {
            if forward {
                pager.next();
            } else {
                pager.prev();
            }
            assert!(pager.index() < pager.len());
        }
    }

    #[test]
    fn test_empty_pager() {
        let mut pager = ReviewPager::default();
        assert!(pager.is_empty());
        assert!(pager.current().is_none());
        assert_eq!(pager.next(), PageMove::AtEnd);
        assert_eq!(pager.prev(), PageMove::AtStart);
        assert_eq!(pager.index(), 0);
    }

    #[test]
    fn test_independent_cursors() {
        let mut first = pager(3);
        let mut second = first.clone();
        first.next();
        assert_eq!(first.index(), 1);
        assert_eq!(second.index(), 0);
        second.next();
        second.next();
        assert_eq!(first.index(), 1);
    }

    #[test]
    fn test_correct_count() {
        let pager = ReviewPager::new(vec![
            review_question("q1", &["A"], &["A"]),
            review_question("q2", &["B"], &["A"]),
            review_question("q3", &["A", "C"], &["A", "C"]),
        ]);
        assert_eq!(pager.correct_count(), 2);
    }

    #[test]
    fn test_overlay_open_and_apply() {
        let (handle, mut rx) = GatewayHandle::channel();
        let mut overlay = ReviewOverlay::open(&handle, "r1");
        assert!(overlay.is_loading);
        match rx.try_recv().unwrap() {
            GatewayRequest::LoadReview { ticket, id } => {
                assert_eq!(ticket, overlay.ticket());
                assert_eq!(id, "r1");
            }
            other => panic!("unexpected request: {:?}", other),
        }

        overlay.apply(Ok(ReviewResponse {
            result: crate::models::fixtures::result("r1", "Anna", 1, 2, 30_000, 3),
            questions: vec![
                review_question("q1", &["A"], &["A"]),
                review_question("q2", &["B"], &["C"]),
            ],
        }));
        assert!(!overlay.is_loading);
        assert_eq!(overlay.pager.len(), 2);
        assert_eq!(overlay.result.as_ref().unwrap().name, "Anna");
    }

    #[test]
    fn test_overlay_failure_sets_message() {
        let (handle, _rx) = GatewayHandle::channel();
        let mut overlay = ReviewOverlay::open(&handle, "r1");
        overlay.apply(Err(GatewayError::Api(
            reqwest::StatusCode::NOT_FOUND,
            "Eintrag nicht gefunden.".into(),
        )));
        assert!(!overlay.is_loading);
        assert_eq!(overlay.error_message.as_deref(), Some(REVIEW_LOAD_FAILED_MESSAGE));
        assert!(overlay.pager.is_empty());
    }

    #[test]
    fn test_advance_past_last_closes_overlay() {
        let (handle, _rx) = GatewayHandle::channel();
        let mut overlay = ReviewOverlay::open(&handle, "r1");
        overlay.apply(Ok(ReviewResponse {
            result: crate::models::fixtures::result("r1", "Anna", 2, 2, 30_000, 1),
            questions: vec![
                review_question("q1", &["A"], &["A"]),
                review_question("q2", &["A"], &["A"]),
            ],
        }));
        let mut slot = Some(overlay);

        advance_overlay(&mut slot);
        assert_eq!(slot.as_ref().unwrap().pager.index(), 1);
        advance_overlay(&mut slot);
        assert!(slot.is_none());
    }

    #[test]
    fn test_advance_while_loading_keeps_overlay() {
        let (handle, _rx) = GatewayHandle::channel();
        let mut slot = Some(ReviewOverlay::open(&handle, "r1"));
        advance_overlay(&mut slot);
        assert!(slot.is_some());
    }
}
