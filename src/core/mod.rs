pub mod logging;
pub mod llm;
pub mod voice;

// Generation and response assembly pipeline
pub mod lesson;
