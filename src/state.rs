//! Application state: configuration, the MCQ generator, PDF extractor and quiz store.
//!
//! The external client is built once here. When OPENAI_API_KEY is absent the
//! generator simply has no handle and every request takes the rule-based path.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::completer::Completer;
use crate::config::AppConfig;
use crate::domain::Provider;
use crate::generator::McqGenerator;
use crate::openai::OpenAI;
use crate::pdf::{LopdfExtractor, PdfExtractor};
use crate::store::QuizStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub generator: McqGenerator,
    pub extractor: Arc<dyn PdfExtractor>,
    pub store: QuizStore,
}

impl AppState {
    /// Build state from env: load config, init the OpenAI client, wire the generator.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = AppConfig::from_env();

        let openai = OpenAI::from_config(&config);
        if let Some(oa) = &openai {
            info!(target: "quizgen_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "quizgen_backend", "OpenAI disabled (no OPENAI_API_KEY). Using rule-based generation.");
        }
        if config.provider == Provider::External && openai.is_none() {
            warn!(target: "quizgen_backend", "AI_PROVIDER requests an external provider but no client is available");
        }

        let completer = openai.map(|oa| Arc::new(oa) as Arc<dyn Completer>);
        Self::with_parts(config, completer, Arc::new(LopdfExtractor))
    }

    /// Assemble state from explicit parts (used by `new` and by tests).
    pub fn with_parts(
        config: AppConfig,
        completer: Option<Arc<dyn Completer>>,
        extractor: Arc<dyn PdfExtractor>,
    ) -> Self {
        info!(
            target: "quizgen_backend",
            provider = ?config.provider,
            timeout_secs = config.provider_timeout.as_secs(),
            max_upload_mb = config.max_upload_mb,
            "MCQ generator configured"
        );
        Self {
            generator: McqGenerator::new(&config, completer),
            config,
            extractor,
            store: QuizStore::new(),
        }
    }
}
