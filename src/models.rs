use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizChoice {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: String,
    pub topic: String,
    pub prompt: String,
    pub multi: bool,
    pub choices: Vec<QuizChoice>,
}

/// Announced question that is not playable yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub id: String,
    pub label: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMetadata {
    pub planned_total: u32,
    pub active_total: u32,
    pub upcoming_total: u32,
    #[serde(default)]
    pub placeholders: Vec<Placeholder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub name: String,
    pub correct: u32,
    pub total: u32,
    pub time_ms: u64,
    pub rank: u32,
    /// Backend timestamp, kept verbatim and only parsed for display.
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewChoice {
    pub id: String,
    pub text: String,
    pub selected: bool,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewQuestion {
    pub id: String,
    pub topic: String,
    pub prompt: String,
    pub multi: bool,
    pub choices: Vec<ReviewChoice>,
}

impl ReviewQuestion {
    /// A question counts as answered correctly when the selection matches the
    /// correct set exactly.
    pub fn is_correct(&self) -> bool {
        self.choices.iter().all(|c| c.selected == c.correct)
    }
}

/// Selected choice ids per question id. A missing entry means unanswered.
pub type AnswerSet = HashMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub name: String,
    pub time_ms: u64,
    pub answers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStorage {
    #[serde(default)]
    pub highlight_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub metadata: QuizMetadata,
    pub items: Vec<QuizQuestion>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub metadata: QuizMetadata,
    pub result: QuizResult,
    pub leaderboard: Vec<QuizResult>,
    #[serde(default)]
    pub review: Vec<ReviewQuestion>,
    #[serde(default)]
    pub storage: Option<SubmitStorage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub metadata: QuizMetadata,
    pub entries: Vec<QuizResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub result: QuizResult,
    pub questions: Vec<ReviewQuestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Intro,
    Quiz,
    Confirm,
    Submitted,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Menu,
    Quiz,
    QuizQuitConfirm,
    Leaderboard,
    Admin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayRequest {
    LoadQuestions {
        ticket: u64,
    },
    Submit {
        ticket: u64,
        payload: SubmitPayload,
    },
    LoadLeaderboard {
        ticket: u64,
        limit: Option<u32>,
    },
    LoadReview {
        ticket: u64,
        id: String,
    },
    DeleteEntry {
        ticket: u64,
        id: String,
    },
    ClearLeaderboard {
        ticket: u64,
    },
}

impl GatewayRequest {
    pub fn ticket(&self) -> u64 {
        match self {
            GatewayRequest::LoadQuestions { ticket }
            | GatewayRequest::Submit { ticket, .. }
            | GatewayRequest::LoadLeaderboard { ticket, .. }
            | GatewayRequest::LoadReview { ticket, .. }
            | GatewayRequest::DeleteEntry { ticket, .. }
            | GatewayRequest::ClearLeaderboard { ticket } => *ticket,
        }
    }
}

#[derive(Debug)]
pub enum GatewayResponse {
    Questions {
        ticket: u64,
        result: Result<QuestionsResponse, crate::error::GatewayError>,
    },
    Submitted {
        ticket: u64,
        result: Result<SubmitResponse, crate::error::GatewayError>,
    },
    Leaderboard {
        ticket: u64,
        result: Result<LeaderboardResponse, crate::error::GatewayError>,
    },
    Review {
        ticket: u64,
        result: Result<ReviewResponse, crate::error::GatewayError>,
    },
    EntryDeleted {
        ticket: u64,
        id: String,
        result: Result<(), crate::error::GatewayError>,
    },
    Cleared {
        ticket: u64,
        result: Result<(), crate::error::GatewayError>,
    },
}

impl GatewayResponse {
    pub fn ticket(&self) -> u64 {
        match self {
            GatewayResponse::Questions { ticket, .. }
            | GatewayResponse::Submitted { ticket, .. }
            | GatewayResponse::Leaderboard { ticket, .. }
            | GatewayResponse::Review { ticket, .. }
            | GatewayResponse::EntryDeleted { ticket, .. }
            | GatewayResponse::Cleared { ticket, .. } => *ticket,
        }
    }
}
