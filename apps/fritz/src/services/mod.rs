pub mod launcher;
pub mod prompt;
