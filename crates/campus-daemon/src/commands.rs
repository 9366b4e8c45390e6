//! Command implementations for the campus-assist daemon.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use campus_classifier::{CandleClassifier, ConfidencePolicy, QueryClassifier};
use campus_router::ChatService;
use campus_services::{
    ApiGenerator, ApiGeneratorConfig, DuckDuckGoSearch, HttpRecordStore, HttpRetriever,
};
use campus_types::{ChatRequest, Settings};

/// Initialize tracing with an env-filter.
///
/// Precedence: RUST_LOG env var, then the CLI/config log level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load settings, applying the CLI log-level override.
pub fn load_settings(config_path: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("failed to load configuration")?;
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }
    Ok(settings)
}

/// Construct the classifier engine.
///
/// Engine construction failure is fatal: the process must not serve
/// requests without a working model.
fn build_classifier(settings: &Settings) -> Result<Arc<CandleClassifier>> {
    let classifier = CandleClassifier::from_settings(&settings.classifier)
        .context("failed to load classifier model (startup aborted)")?;
    Ok(Arc::new(classifier))
}

/// Construct the full chat service from settings.
fn build_service(settings: &Settings) -> Result<ChatService> {
    let classifier = build_classifier(settings)?;
    let policy = ConfidencePolicy::from_settings(&settings.classifier);

    let generator = ApiGenerator::new(ApiGeneratorConfig::from_settings(&settings.generation)?)
        .context("failed to build generation client")?;
    let retriever =
        HttpRetriever::new(&settings.retrieval).context("failed to build retrieval client")?;
    let search =
        DuckDuckGoSearch::new(&settings.search).context("failed to build search client")?;
    let store =
        HttpRecordStore::new(&settings.store).context("failed to build record store client")?;

    Ok(ChatService::new(
        classifier,
        policy,
        Arc::new(store),
        Arc::new(generator),
        Arc::new(retriever),
        Arc::new(search),
    )
    .with_retrieval_top_k(settings.retrieval.top_k))
}

/// Dispatch one chat query and print the response.
pub async fn handle_chat(settings: &Settings, user: u64, query: &str) -> Result<()> {
    let service = build_service(settings)?;

    info!(user = user, "Dispatching chat query");
    let response = service.handle_chat(ChatRequest::new(user, query)).await?;

    println!("[{}] {}", response.resolved_intent, response.response_text);
    Ok(())
}

/// Classify texts and print the raw results as JSON.
pub async fn handle_classify(settings: &Settings, texts: &[String]) -> Result<()> {
    let classifier = build_classifier(settings)?;

    let results = {
        let classifier = Arc::clone(&classifier);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
            classifier.predict_batch(&refs)
        })
        .await
        .context("classification task failed")?
    };

    for (text, result) in texts.iter().zip(results) {
        println!("{}: {}", text, serde_json::to_string(&result)?);
    }
    Ok(())
}

/// Load the engine and print its status payload.
pub async fn show_status(settings: &Settings) -> Result<()> {
    let classifier = build_classifier(settings)?;
    let status = classifier.status();
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
