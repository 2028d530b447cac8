// Atelier Studio Modules

pub mod artifacts;
pub mod content;
pub mod core;
pub mod diffusion;
pub mod editing;
pub mod llm;
pub mod prompt_lab;
pub mod slideshow;
pub mod speech;
pub mod table;
pub mod templates;
pub mod transcription;
