/// Word Tutor - language learning explanations
///
/// Core library turning a word or short passage into a structured,
/// learner-oriented explanation with optional pronunciation audio,
/// rendered as chat-ready markup.

pub mod config;
pub mod core;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
