// Assistant module
// Ties retrieval, moderation, prompt assembly and generation into one turn


use itertools::Itertools;
use tracing::{debug, error};

use crate::Result;
use crate::config::Config;
use crate::embeddings::OllamaClient;
use crate::index::MenuIndex;
use crate::llm::GroqClient;
use crate::pipeline;
use crate::session::{ChatMessage, QueryLogEntry, Session};

/// Reply for messages that fail moderation.
pub const MODERATION_REPLY: &str =
    "My apologies, but I can only provide information about our menu items.";

const SPICY_FOLLOW_UP: &str = "\n\nSince you ordered something spicy, would you like a cooling \
    drink? I recommend our Mango Citrus Refresher or Strawberry Basil Lemonade!";

const BAD_WORDS: &[&str] = &["sex", "porn", "fuck", "shit"];

const OFF_TOPIC_WORDS: &[&str] = &["weather", "politics"];

const FOOD_WORDS: &[&str] = &["food", "eat", "menu", "hungry", "burger", "pizza", "order"];

/// Filler the model sometimes produces despite the persona rules.
const REASONING_PHRASES: &[&str] = &[
    "Based on your requirements",
    "Based on your request",
    "I would recommend",
    "I'll exclude",
    "Looking at the menu",
];

const SPICY_WORDS: &[&str] = &["ghost pepper", "spicy", "hot", "jalapeño", "buffalo", "sriracha"];

const ORDER_WORDS: &[&str] = &["add", "order"];

const PERSONA_RULES: &str = "You are FoodieBot, a professional restaurant assistant. Follow these rules:
- NEVER use internal reasoning phrases.
- Respect allergens: exclude items with allergens mentioned by user.
- Classify food correctly (main dish vs snack).
- Only provide information from CONTEXT; if unknown, say \"I don't have that information.\"
- Use bullets (•), show prices as $X.XX, include calories, category, allergens if known.
- Suggest cooling drinks if user orders spicy food.
- Keep responses natural, concise, and helpful.";

/// The assistant: one retrieval pipeline and one generation call per message.
pub struct FoodieBot {
    embedder: OllamaClient,
    index: MenuIndex,
    llm: GroqClient,
    n_results: usize,
}

impl FoodieBot {
    /// Wire up all capabilities from the config. The Groq API key is read
    /// from the environment variable the config names.
    #[inline]
    pub async fn new(config: &Config) -> Result<Self> {
        let embedder = OllamaClient::new(&config.ollama)?;
        let index = MenuIndex::new(config).await?;
        let llm = GroqClient::new(&config.groq)?;

        Ok(Self {
            embedder,
            index,
            llm,
            n_results: config.retrieval.n_results,
        })
    }

    /// Assemble a bot from already-built capabilities.
    #[inline]
    pub fn from_parts(
        embedder: OllamaClient,
        index: MenuIndex,
        llm: GroqClient,
        n_results: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            llm,
            n_results,
        }
    }

    /// Handle one user message as an atomic turn.
    ///
    /// The turn always completes: moderation and generation failures fall
    /// back to fixed replies, and history, interest score and query log are
    /// updated no matter which path produced the reply.
    #[inline]
    pub async fn handle_message(&self, session: &mut Session, user_input: &str) -> String {
        session.push_user(user_input);

        let turn = pipeline::run(&self.embedder, &self.index, user_input, self.n_results).await;

        let reply = if is_inappropriate_or_irrelevant(user_input) {
            debug!("Message failed moderation, skipping generation");
            MODERATION_REPLY.to_string()
        } else {
            self.generate_reply(session.history(), user_input, &turn.context)
        };

        session.push_assistant(&reply);
        session.apply_interest(user_input);

        let (top_match, match_score) = match &turn.top_match {
            Some(top) => (top.name.clone(), top.score),
            None => ("N/A".to_string(), 0.0),
        };
        session.record_query(QueryLogEntry::new(
            user_input,
            top_match,
            match_score,
            turn.latency_ms,
        ));

        reply
    }

    fn generate_reply(&self, history: &[ChatMessage], user_input: &str, context: &str) -> String {
        let prompt = build_prompt(context, history, user_input);

        match self.llm.complete(&prompt) {
            Ok(raw) => {
                let mut reply = clean_response(&raw);
                if wants_spicy_order(user_input) {
                    reply.push_str(SPICY_FOLLOW_UP);
                }
                reply
            }
            Err(e) => {
                error!("Generation failed: {:#}", e);
                format!(
                    "Sorry, I'm having a technical issue and can't respond right now. Error: {}",
                    e
                )
            }
        }
    }
}

fn build_prompt(context: &str, history: &[ChatMessage], user_input: &str) -> String {
    let history_block = history
        .iter()
        .map(|message| format!("{}: {}", message.role.label(), message.content))
        .join("\n");

    format!(
        "{PERSONA_RULES}\n\nCONTEXT:\n{context}\n\nCONVERSATION HISTORY:\n{history_block}\n\nUSER MESSAGE:\n{user_input}\n\nRespond as FoodieBot."
    )
}

/// Moderation gate: profanity, mostly non-ASCII input, or off-topic chatter
/// with no food word in it.
fn is_inappropriate_or_irrelevant(user_input: &str) -> bool {
    let lowered = user_input.to_lowercase();
    if BAD_WORDS.iter().any(|word| lowered.contains(word)) {
        return true;
    }

    let char_count = user_input.chars().count();
    if char_count > 10 {
        let non_ascii = user_input.chars().filter(|c| !c.is_ascii()).count();
        if non_ascii as f64 > char_count as f64 * 0.7 {
            return true;
        }
    }

    if OFF_TOPIC_WORDS.iter().any(|word| lowered.contains(word))
        && !FOOD_WORDS.iter().any(|word| lowered.contains(word))
    {
        return true;
    }

    false
}

fn clean_response(response: &str) -> String {
    let mut cleaned = response.to_string();
    for phrase in REASONING_PHRASES {
        cleaned = cleaned.replace(phrase, "");
    }
    cleaned.trim().to_string()
}

fn wants_spicy_order(user_input: &str) -> bool {
    let lowered = user_input.to_lowercase();
    SPICY_WORDS.iter().any(|word| lowered.contains(word))
        && ORDER_WORDS.iter().any(|word| lowered.contains(word))
}
