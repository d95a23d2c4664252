// Session state module
// Conversation history, engagement scoring and per-query telemetry for one chat

#[cfg(test)]
mod tests;

use chrono::Local;
use serde::Serialize;

/// Greeting seeded into every fresh session.
pub const WELCOME_MESSAGE: &str = "Welcome to FoodieBot! How can I help you with our menu today?";

/// Engagement score a session starts from.
pub const INITIAL_INTEREST_SCORE: i32 = 50;

/// Keyword groups that move the engagement score, ordered by precedence.
/// The first group with a hit decides the delta for the whole message.
const SCORE_RULES: &[(i32, &[&str])] = &[
    (25, &["add it", "order it", "i'll take", "yes add", "place order"]),
    (15, &["add", "order", "want", "get", "take"]),
    (12, &["perfect", "awesome", "love", "great", "excellent", "good"]),
    (10, &["hungry", "starving", "craving"]),
    (-8, &["no", "not interested", "don't want", "different", "exit"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Lowercase label used when the history is replayed into a prompt.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Telemetry for one retrieval round trip, stamped at creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryLogEntry {
    pub timestamp: String,
    pub user_query: String,
    pub top_match: String,
    pub match_score: f32,
    pub duration_ms: f64,
}

impl QueryLogEntry {
    #[inline]
    pub fn new(user_query: &str, top_match: String, match_score: f32, duration_ms: f64) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            user_query: user_query.to_string(),
            top_match,
            match_score,
            duration_ms,
        }
    }
}

/// Mutable state for one chat session.
///
/// The history always opens with the welcome message and the engagement
/// score always stays within 0..=100; `interest_history` keeps one entry
/// per scored message plus the seed value.
#[derive(Debug)]
pub struct Session {
    chat_history: Vec<ChatMessage>,
    interest_score: i32,
    interest_history: Vec<i32>,
    query_log: Vec<QueryLogEntry>,
}

impl Session {
    #[inline]
    pub fn new() -> Self {
        Self {
            chat_history: vec![ChatMessage {
                role: Role::Assistant,
                content: WELCOME_MESSAGE.to_string(),
            }],
            interest_score: INITIAL_INTEREST_SCORE,
            interest_history: vec![INITIAL_INTEREST_SCORE],
            query_log: Vec::new(),
        }
    }

    /// Drop everything and start over with a fresh greeting.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    #[inline]
    pub fn push_user(&mut self, content: &str) {
        self.chat_history.push(ChatMessage {
            role: Role::User,
            content: content.to_string(),
        });
    }

    #[inline]
    pub fn push_assistant(&mut self, content: &str) {
        self.chat_history.push(ChatMessage {
            role: Role::Assistant,
            content: content.to_string(),
        });
    }

    #[inline]
    pub fn interest_score(&self) -> i32 {
        self.interest_score
    }

    #[inline]
    pub fn interest_history(&self) -> &[i32] {
        &self.interest_history
    }

    #[inline]
    pub fn query_log(&self) -> &[QueryLogEntry] {
        &self.query_log
    }

    /// Score one user message and append the result to the history curve.
    #[inline]
    pub fn apply_interest(&mut self, query: &str) -> i32 {
        self.interest_score = update_interest_score(query, self.interest_score);
        self.interest_history.push(self.interest_score);
        self.interest_score
    }

    #[inline]
    pub fn record_query(&mut self, entry: QueryLogEntry) {
        self.query_log.push(entry);
    }
}

impl Default for Session {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Move the engagement score by the first matching keyword group and
/// clamp the result to 0..=100.
#[inline]
pub fn update_interest_score(query: &str, current: i32) -> i32 {
    let query = query.to_lowercase();
    let delta = SCORE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| query.contains(keyword)))
        .map(|(delta, _)| *delta)
        .unwrap_or(0);

    (current + delta).clamp(0, 100)
}
