// LLM module
// Response generation through the Groq chat completions API

pub mod groq;

pub use groq::GroqClient;
