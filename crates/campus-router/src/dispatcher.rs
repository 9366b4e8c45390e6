//! Chat dispatch: classified intent to generated response.
//!
//! `ChatService` is the single place that knows, for each intent, which
//! records to fetch, which formatter to apply, and which generation template
//! to fill. All collaborators are injected; the service holds no global
//! state beyond the shared classifier engine handle.

use std::sync::Arc;

use tracing::{info, warn};

use campus_classifier::{ClassificationResult, ConfidencePolicy, EngineStatus, QueryClassifier};
use campus_services::{
    variables, DocumentRetriever, Generator, RecordStore, RetrievedDocument, TemplateName,
    WebSearch,
};
use campus_types::{ChatRequest, ChatResponse, Intent};

use crate::error::RouterError;
use crate::format;

/// Context substituted when the web search collaborator fails; the general
/// path still generates an answer from the query alone.
pub const SEARCH_UNAVAILABLE_SENTENCE: &str = "Unable to search at the moment.";

/// Fixed context when retrieval returns no documents.
pub const NO_DOCUMENTS_SENTENCE: &str = "No relevant documents found.";

/// Default number of documents requested on the college-info path.
pub const DEFAULT_RETRIEVAL_TOP_K: usize = 5;

/// The chat dispatcher.
pub struct ChatService {
    classifier: Arc<dyn QueryClassifier>,
    policy: ConfidencePolicy,
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn Generator>,
    retriever: Arc<dyn DocumentRetriever>,
    search: Arc<dyn WebSearch>,
    retrieval_top_k: usize,
}

impl ChatService {
    /// Create a dispatcher over the given collaborators.
    pub fn new(
        classifier: Arc<dyn QueryClassifier>,
        policy: ConfidencePolicy,
        store: Arc<dyn RecordStore>,
        generator: Arc<dyn Generator>,
        retriever: Arc<dyn DocumentRetriever>,
        search: Arc<dyn WebSearch>,
    ) -> Self {
        Self {
            classifier,
            policy,
            store,
            generator,
            retriever,
            search,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
        }
    }

    /// Set how many documents the college-info path requests.
    pub fn with_retrieval_top_k(mut self, top_k: usize) -> Self {
        self.retrieval_top_k = top_k;
        self
    }

    /// Process one chat turn: classify, route, generate.
    pub async fn handle_chat(&self, request: ChatRequest) -> Result<ChatResponse, RouterError> {
        if request.query.trim().is_empty() {
            return Err(RouterError::EmptyQuery);
        }

        info!(caller = request.caller_id, "Chat query received");

        let intent = self.classify(&request.query).await;
        info!(intent = %intent, "Query classified");

        let response_text = match intent {
            Intent::Attendance => {
                let records = self
                    .store
                    .attendance_for(request.caller_id)
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_attendance(&records))
                    .await?
            }
            Intent::Marks => {
                let records = self
                    .store
                    .marks_for(request.caller_id)
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_marks(&records))
                    .await?
            }
            Intent::Fees => {
                let records = self
                    .store
                    .fees_for(request.caller_id)
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_fees(&records))
                    .await?
            }
            Intent::Course => {
                let records = self
                    .store
                    .courses_for(request.caller_id)
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_courses(&records))
                    .await?
            }
            Intent::Assignment => {
                let records = self
                    .store
                    .recent_assignments()
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_assignments(&records))
                    .await?
            }
            Intent::UserInfo => {
                let profile = self
                    .store
                    .profile_for(request.caller_id)
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_profile(profile.as_ref()))
                    .await?
            }
            Intent::Notices => {
                let records = self
                    .store
                    .recent_notices()
                    .await
                    .map_err(RouterError::Store)?;
                self.generate_conversational(&request.query, &format::format_notices(&records))
                    .await?
            }
            Intent::CollegeInfo => {
                let documents = self
                    .retriever
                    .retrieve(&request.query, self.retrieval_top_k)
                    .await
                    .map_err(RouterError::Retrieval)?;
                let context = assemble_context(&documents);
                let vars = variables([("context", context.as_str()), ("query", request.query.as_str())]);
                self.generator
                    .generate(TemplateName::CollegeInfo, &vars)
                    .await
                    .map_err(RouterError::Generation)?
            }
            Intent::General => {
                let search_results = match self.search.search(&request.query).await {
                    Ok(text) => text,
                    Err(e) => {
                        // The general path answers without search rather
                        // than failing the whole request.
                        warn!(error = %e, "Web search failed, generating without results");
                        SEARCH_UNAVAILABLE_SENTENCE.to_string()
                    }
                };
                let vars = variables([
                    ("query", request.query.as_str()),
                    ("search_results", search_results.as_str()),
                ]);
                self.generator
                    .generate(TemplateName::GeneralSearch, &vars)
                    .await
                    .map_err(RouterError::Generation)?
            }
        };

        Ok(ChatResponse {
            response_text,
            resolved_intent: intent,
        })
    }

    /// Engine introspection for health/readiness reporting.
    pub fn engine_status(&self) -> EngineStatus {
        self.classifier.status()
    }

    /// Classify on a worker thread and resolve through the confidence
    /// policy. Total: every failure mode ends in a member of the intent
    /// set.
    async fn classify(&self, query: &str) -> Intent {
        let classifier = Arc::clone(&self.classifier);
        let text = query.to_string();

        let result = match tokio::task::spawn_blocking(move || classifier.predict_cached(&text)).await
        {
            Ok(result) => result,
            Err(e) => ClassificationResult::failed(format!("classification task failed: {}", e)),
        };

        self.policy.resolve(&result)
    }

    async fn generate_conversational(
        &self,
        query: &str,
        digest: &str,
    ) -> Result<String, RouterError> {
        let vars = variables([("query", query), ("user_data", digest)]);
        self.generator
            .generate(TemplateName::Conversational, &vars)
            .await
            .map_err(RouterError::Generation)
    }
}

/// Assemble retrieved documents into a numbered context block.
///
/// Never empty: a retrieval with no documents yields a fixed sentence so the
/// template's context slot is always filled.
fn assemble_context(documents: &[RetrievedDocument]) -> String {
    if documents.is_empty() {
        return NO_DOCUMENTS_SENTENCE.to_string();
    }

    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("Document {}:\n{}", i + 1, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_classifier::MockClassifier;
    use campus_services::{MockGenerator, MockRecordStore, MockRetriever, MockSearch};
    use campus_types::AttendanceRecord;

    fn service(
        classifier: MockClassifier,
        store: MockRecordStore,
        generator: Arc<MockGenerator>,
        retriever: MockRetriever,
        search: MockSearch,
    ) -> ChatService {
        ChatService::new(
            Arc::new(classifier),
            ConfidencePolicy::default(),
            Arc::new(store),
            generator,
            Arc::new(retriever),
            Arc::new(search),
        )
    }

    fn default_service(classifier: MockClassifier, store: MockRecordStore) -> (ChatService, Arc<MockGenerator>) {
        let generator = Arc::new(MockGenerator::new());
        let svc = service(
            classifier,
            store,
            Arc::clone(&generator),
            MockRetriever::empty(),
            MockSearch::returning("search context"),
        );
        (svc, generator)
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_classification() {
        let classifier = MockClassifier::returning("general", 0.9);
        let (svc, generator) = default_service(classifier, MockRecordStore::empty());

        let err = svc.handle_chat(ChatRequest::new(1, "   ")).await.unwrap_err();
        assert!(matches!(err, RouterError::EmptyQuery));
        assert_eq!(generator.call_count(), 0);
        assert_eq!(svc.engine_status().cache.misses, 0);
    }

    #[tokio::test]
    async fn test_attendance_digest_reaches_generation() {
        let classifier = MockClassifier::returning("attendance", 0.92);
        let store = MockRecordStore::empty().with_attendance(vec![AttendanceRecord {
            month: "Ashoj".to_string(),
            semester: "Fall 2024".to_string(),
            total: 27,
            status: "satisfied".to_string(),
        }]);
        let (svc, generator) = default_service(classifier, store);

        let response = svc
            .handle_chat(ChatRequest::new(1, "What is my attendance this month?"))
            .await
            .unwrap();

        assert_eq!(response.resolved_intent, Intent::Attendance);
        assert!(response.response_text.contains("Ashoj"));
        assert!(response.response_text.contains("27"));

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].template, TemplateName::Conversational);
    }

    #[tokio::test]
    async fn test_low_confidence_routes_to_search() {
        let classifier = MockClassifier::with_fallback(ClassificationResult::classified(
            "attendance",
            0.05,
            0.1,
        ));
        let (svc, generator) = default_service(classifier, MockRecordStore::empty());

        let response = svc.handle_chat(ChatRequest::new(1, "asdkjasd")).await.unwrap();

        assert_eq!(response.resolved_intent, Intent::General);
        let calls = generator.calls();
        assert_eq!(calls[0].template, TemplateName::GeneralSearch);
        assert_eq!(calls[0].variables["search_results"], "search context");
    }

    #[tokio::test]
    async fn test_classifier_error_resolves_to_general() {
        let classifier = MockClassifier::failing("device failure");
        let (svc, _generator) = default_service(classifier, MockRecordStore::empty());

        let response = svc
            .handle_chat(ChatRequest::new(1, "What are my marks?"))
            .await
            .unwrap();

        assert_eq!(response.resolved_intent, Intent::General);
    }

    #[tokio::test]
    async fn test_empty_fees_sends_fixed_sentence() {
        let classifier = MockClassifier::returning("fees", 0.9);
        let (svc, generator) = default_service(classifier, MockRecordStore::empty());

        let response = svc
            .handle_chat(ChatRequest::new(1, "What is my fee status?"))
            .await
            .unwrap();

        assert_eq!(response.resolved_intent, Intent::Fees);
        let calls = generator.calls();
        assert_eq!(calls[0].variables["user_data"], format::NO_FEES_SENTENCE);
    }

    #[tokio::test]
    async fn test_repeated_query_hits_cache() {
        let classifier = MockClassifier::returning("notices", 0.9);
        let (svc, _generator) = default_service(classifier, MockRecordStore::empty());

        let first = svc
            .handle_chat(ChatRequest::new(1, "Any new notices?"))
            .await
            .unwrap();
        let second = svc
            .handle_chat(ChatRequest::new(1, "Any new notices?"))
            .await
            .unwrap();

        assert_eq!(first.resolved_intent, second.resolved_intent);
        let stats = svc.engine_status().cache;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_college_info_context_assembly() {
        let classifier = MockClassifier::returning("college_info", 0.85);
        let generator = Arc::new(MockGenerator::new());
        let retriever = MockRetriever::with_documents(vec![
            RetrievedDocument {
                content: "The college offers BSc CSIT and BCA.".to_string(),
                source: "https://example.edu/programs".to_string(),
                score: 0.9,
            },
            RetrievedDocument {
                content: "Admissions open in Bhadra.".to_string(),
                source: "https://example.edu/admissions".to_string(),
                score: 0.7,
            },
        ]);
        let svc = service(
            classifier,
            MockRecordStore::empty(),
            Arc::clone(&generator),
            retriever,
            MockSearch::returning(""),
        );

        let response = svc
            .handle_chat(ChatRequest::new(1, "What programs are offered?"))
            .await
            .unwrap();

        assert_eq!(response.resolved_intent, Intent::CollegeInfo);
        let context = &generator.calls()[0].variables["context"];
        assert!(context.starts_with("Document 1:"));
        assert!(context.contains("BSc CSIT"));
        assert!(context.contains("Document 2:"));
    }

    #[tokio::test]
    async fn test_search_failure_substitutes_placeholder() {
        let classifier = MockClassifier::returning("general", 0.9);
        let generator = Arc::new(MockGenerator::new());
        let svc = service(
            classifier,
            MockRecordStore::empty(),
            Arc::clone(&generator),
            MockRetriever::empty(),
            MockSearch::failing("network unreachable"),
        );

        let response = svc
            .handle_chat(ChatRequest::new(1, "how to prepare for exams?"))
            .await
            .unwrap();

        assert_eq!(response.resolved_intent, Intent::General);
        let calls = generator.calls();
        assert_eq!(
            calls[0].variables["search_results"],
            SEARCH_UNAVAILABLE_SENTENCE
        );
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_error() {
        let classifier = MockClassifier::returning("marks", 0.9);
        let generator = Arc::new(MockGenerator::new());
        let svc = service(
            classifier,
            MockRecordStore::failing("database unavailable"),
            Arc::clone(&generator),
            MockRetriever::empty(),
            MockSearch::returning(""),
        );

        let err = svc
            .handle_chat(ChatRequest::new(1, "What are my marks?"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::Store(_)));
        // No partial answer: generation never ran
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_retrieval_failure_surfaces_as_error() {
        let classifier = MockClassifier::returning("college_info", 0.9);
        let generator = Arc::new(MockGenerator::new());
        let svc = service(
            classifier,
            MockRecordStore::empty(),
            Arc::clone(&generator),
            MockRetriever::failing("index offline"),
            MockSearch::returning(""),
        );

        let err = svc
            .handle_chat(ChatRequest::new(1, "Tell me about the college"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::Retrieval(_)));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_surfaces_as_error() {
        let classifier = MockClassifier::returning("attendance", 0.9);
        let generator = Arc::new(MockGenerator::failing("upstream down"));
        let svc = service(
            classifier,
            MockRecordStore::empty(),
            Arc::clone(&generator),
            MockRetriever::empty(),
            MockSearch::returning(""),
        );

        let err = svc
            .handle_chat(ChatRequest::new(1, "What is my attendance?"))
            .await
            .unwrap_err();

        assert!(matches!(err, RouterError::Generation(_)));
    }

    #[test]
    fn test_assemble_context_empty() {
        assert_eq!(assemble_context(&[]), NO_DOCUMENTS_SENTENCE);
    }
}
