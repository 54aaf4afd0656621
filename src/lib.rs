//! MCQ generation from document text.
//!
//! Text is segmented into content units, then turned into four-option
//! multiple-choice questions either by an OpenAI-compatible provider or by a
//! local rule-based generator. The provider path always falls back to the
//! local one, so a valid request never fails at the generation step.
//!
//! ```no_run
//! # async fn demo() -> Result<(), quizgen_backend::McqError> {
//! let generator = quizgen_backend::McqGenerator::rule_based();
//! let mcqs = generator.generate_mcqs("Mitochondria produce most of the cell's energy.", 3).await?;
//! assert!(!mcqs.is_empty());
//! # Ok(()) }
//! ```

pub mod completer;
pub mod config;
pub mod distractors;
pub mod domain;
pub mod error;
pub mod generator;
pub mod logic;
pub mod openai;
pub mod parser;
pub mod pdf;
pub mod protocol;
pub mod routes;
pub mod rules;
pub mod seeds;
pub mod segment;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod util;
pub mod validate;

pub use domain::{AnswerOption, Generation, Mcq, McqSource, Provider};
pub use error::McqError;
pub use generator::McqGenerator;
