pub mod config;
pub mod controller;
pub mod defaults;
pub mod document;
pub mod error;
pub mod model;
pub mod navigator;
pub mod session;
pub mod sources;
pub mod tally;

// Convenient re-exports
pub use controller::{QuizController, Screen, Status};
pub use document::{QuizDocument, Validation};
pub use model::{Block, BlockKind, Letter, Page, PageType};
pub use session::Session;
pub use tally::tally;
