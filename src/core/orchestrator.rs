//! Translation request orchestration

use std::collections::VecDeque;
use std::sync::Arc;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::client::LanguageService;
use crate::core::errors::{GatewayError, Result};
use crate::core::models::{HistoryEntry, TranslationOutcome, TranslationRequest, UsageCounters};
use crate::core::usage::UsageLimiter;

/// Session history keeps this many entries; older ones are evicted
pub const HISTORY_CAPACITY: usize = 10;

/// One line of a batch run, in input order
#[derive(Debug)]
pub struct BatchItem {
    /// 1-based line number in the input
    pub line_no: usize,
    pub original: String,
    pub result: Result<TranslationOutcome>,
}

/// Runs translation requests end-to-end: validation, quota gate, source
/// detection, the remote call, then history and usage bookkeeping.
///
/// Usage is charged only on confirmed translation success. A request that is
/// rejected by validation, denied by the quota gate, or failed by the remote
/// service leaves the counters untouched.
pub struct TranslationOrchestrator {
    service: Arc<dyn LanguageService>,
    limiter: UsageLimiter,
    history: Mutex<VecDeque<HistoryEntry>>,
}

impl TranslationOrchestrator {
    pub fn new(service: Arc<dyn LanguageService>, limiter: UsageLimiter) -> Self {
        Self {
            service,
            limiter,
            history: Mutex::new(VecDeque::with_capacity(HISTORY_CAPACITY)),
        }
    }

    /// Handle one translation request.
    ///
    /// The quota gate runs before any remote call: a denied request never
    /// reaches the service. A source language of "auto" is resolved through
    /// detection first, falling back to "en" when detection is inconclusive.
    pub async fn handle_translation(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationOutcome> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(GatewayError::Validation);
        }

        let verdict = self.limiter.can_translate().await;
        if !verdict.allowed {
            info!(reason = %verdict.reason, "Translation denied by quota gate");
            return Err(GatewayError::QuotaExceeded { reason: verdict.reason });
        }

        let (source_lang, detected_lang) = if request.wants_detection() {
            let detection = self.service.detect_language(text).await;
            let resolved = detection.or_default().to_string();
            debug!(resolved = %resolved, "Source language resolved");
            (resolved.clone(), Some(resolved))
        } else {
            (request.source_lang.clone(), None)
        };

        let translated = match self
            .service
            .translate(text, &source_lang, &request.target_lang)
            .await
        {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Translation failed: {}", e);
                return Err(e);
            }
        };

        self.limiter.record_usage().await;
        self.push_history(HistoryEntry {
            source_text: text.to_string(),
            translated_text: translated.clone(),
            source_lang: source_lang.clone(),
            target_lang: request.target_lang.clone(),
            timestamp: Utc::now(),
        })
        .await;

        Ok(TranslationOutcome {
            original_text: text.to_string(),
            translated_text: translated,
            source_lang,
            target_lang: request.target_lang.clone(),
            detected_lang,
        })
    }

    /// Translate an ordered sequence of lines.
    ///
    /// Strictly sequential: the quota gate must run between every call, so
    /// lines are never translated in parallel. Blank lines are skipped
    /// without consuming quota. `on_progress` receives the fraction complete
    /// after every line, blank or not.
    pub async fn translate_batch(
        &self,
        lines: &[String],
        target_lang: &str,
        source_lang: &str,
        mut on_progress: impl FnMut(f64),
    ) -> Vec<BatchItem> {
        let total = lines.len();
        let mut items = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !line.trim().is_empty() {
                let request = TranslationRequest::new(line.trim(), target_lang)
                    .with_source_lang(source_lang);
                let result = self.handle_translation(&request).await;
                items.push(BatchItem {
                    line_no: i + 1,
                    original: line.trim().to_string(),
                    result,
                });
            }
            on_progress((i + 1) as f64 / total as f64);
        }

        items
    }

    /// Last translations, most recent first
    pub async fn history(&self) -> Vec<HistoryEntry> {
        let history = self.history.lock().await;
        history.iter().rev().cloned().collect()
    }

    /// Current usage counters for display
    pub async fn usage(&self) -> UsageCounters {
        self.limiter.snapshot().await
    }

    async fn push_history(&self, entry: HistoryEntry) {
        let mut history = self.history.lock().await;
        if history.len() == HISTORY_CAPACITY {
            history.pop_front();
        }
        history.push_back(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;

    use crate::core::models::Detection;

    /// Scripted language service recording every call it receives
    struct MockService {
        detection: Detection,
        translation: std::result::Result<String, String>,
        detect_calls: AtomicUsize,
        translate_calls: AtomicUsize,
        seen_source_langs: std::sync::Mutex<Vec<String>>,
    }

    impl MockService {
        fn new(detection: Detection, translation: std::result::Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                detection,
                translation: translation
                    .map(|s| s.to_string())
                    .map_err(|e| e.to_string()),
                detect_calls: AtomicUsize::new(0),
                translate_calls: AtomicUsize::new(0),
                seen_source_langs: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn translating(translated: &str) -> Arc<Self> {
            Self::new(Detection::Code("en".to_string()), Ok(translated))
        }
    }

    #[async_trait]
    impl LanguageService for MockService {
        async fn detect_language(&self, _text: &str) -> Detection {
            self.detect_calls.fetch_add(1, Ordering::SeqCst);
            self.detection.clone()
        }

        async fn translate(
            &self,
            _text: &str,
            source_lang: &str,
            _target_lang: &str,
        ) -> Result<String> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            self.seen_source_langs
                .lock()
                .unwrap()
                .push(source_lang.to_string());
            self.translation
                .clone()
                .map_err(GatewayError::service)
        }
    }

    fn orchestrator(service: Arc<MockService>, daily: u32, monthly: u32) -> TranslationOrchestrator {
        TranslationOrchestrator::new(service, UsageLimiter::new(daily, monthly))
    }

    #[tokio::test]
    async fn test_empty_text_never_reaches_service() {
        let service = MockService::translating("x");
        let orch = orchestrator(service.clone(), 10, 100);

        let result = orch
            .handle_translation(&TranslationRequest::new("   \n\t ", "ja"))
            .await;

        assert!(matches!(result, Err(GatewayError::Validation)));
        assert_eq!(service.detect_calls.load(Ordering::SeqCst), 0);
        assert_eq!(service.translate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_exhausted_quota_blocks_before_remote_call() {
        let service = MockService::translating("x");
        let orch = orchestrator(service.clone(), 0, 100);

        let result = orch
            .handle_translation(&TranslationRequest::new("Hello", "ja"))
            .await;

        match result {
            Err(GatewayError::QuotaExceeded { reason }) => {
                assert_eq!(reason, "Daily limit reached (0 translations)");
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        assert_eq!(service.translate_calls.load(Ordering::SeqCst), 0);

        let usage = orch.usage().await;
        assert_eq!(usage.daily_count, 0);
        assert_eq!(usage.monthly_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_detection_falls_back_to_english() {
        let service = MockService::new(Detection::Unknown, Ok("salut"));
        let orch = orchestrator(service.clone(), 10, 100);

        let outcome = orch
            .handle_translation(&TranslationRequest::new("bonjour", "fr"))
            .await
            .unwrap();

        assert_eq!(service.seen_source_langs.lock().unwrap().as_slice(), ["en"]);
        assert_eq!(outcome.source_lang, "en");
        assert_eq!(outcome.detected_lang.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn test_explicit_source_skips_detection() {
        let service = MockService::translating("hola");
        let orch = orchestrator(service.clone(), 10, 100);

        let outcome = orch
            .handle_translation(&TranslationRequest::new("hello", "es").with_source_lang("en"))
            .await
            .unwrap();

        assert_eq!(service.detect_calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.source_lang, "en");
        assert_eq!(outcome.detected_lang, None);
    }

    #[tokio::test]
    async fn test_successful_translation_outcome_and_history() {
        let service = MockService::translating("こんにちは");
        let orch = orchestrator(service, 10, 100);

        let outcome = orch
            .handle_translation(&TranslationRequest::new("Hello", "ja"))
            .await
            .unwrap();

        assert_eq!(outcome.original_text, "Hello");
        assert_eq!(outcome.translated_text, "こんにちは");
        assert_eq!(outcome.source_lang, "en");
        assert_eq!(outcome.target_lang, "ja");
        assert_eq!(outcome.detected_lang.as_deref(), Some("en"));

        let history = orch.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source_text, "Hello");
        assert_eq!(history[0].translated_text, "こんにちは");

        let usage = orch.usage().await;
        assert_eq!(usage.daily_count, 1);
        assert_eq!(usage.monthly_count, 1);
    }

    #[tokio::test]
    async fn test_remote_failure_does_not_consume_quota() {
        let service = MockService::new(
            Detection::Code("en".to_string()),
            Err("404 NotAuthorizedOrNotFound"),
        );
        let orch = orchestrator(service.clone(), 10, 100);

        let result = orch
            .handle_translation(&TranslationRequest::new("Hello", "ja"))
            .await;

        match result {
            Err(GatewayError::Service { category, .. }) => {
                assert_eq!(
                    category,
                    crate::core::errors::ServiceErrorCategory::ServiceNotEnabled
                );
            }
            other => panic!("expected Service error, got {other:?}"),
        }

        let usage = orch.usage().await;
        assert_eq!(usage.daily_count, 0);
        assert!(orch.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_daily_limit_cuts_off_third_request() {
        let service = MockService::translating("ok");
        let orch = orchestrator(service.clone(), 2, 100);
        let request = TranslationRequest::new("Hello", "ja");

        assert!(orch.handle_translation(&request).await.is_ok());
        assert!(orch.handle_translation(&request).await.is_ok());

        match orch.handle_translation(&request).await {
            Err(GatewayError::QuotaExceeded { reason }) => {
                assert_eq!(reason, "Daily limit reached (2 translations)");
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }

        assert_eq!(service.translate_calls.load(Ordering::SeqCst), 2);
        assert_eq!(orch.usage().await.daily_count, 2);
    }

    #[tokio::test]
    async fn test_batch_skips_blank_lines_without_charging() {
        let service = MockService::translating("ok");
        let orch = orchestrator(service.clone(), 10, 100);

        let lines = vec![
            "first".to_string(),
            "   ".to_string(),
            "third".to_string(),
        ];

        let mut progress = Vec::new();
        let items = orch
            .translate_batch(&lines, "ja", "en", |p| progress.push(p))
            .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_no, 1);
        assert_eq!(items[0].original, "first");
        assert_eq!(items[1].line_no, 3);
        assert_eq!(items[1].original, "third");
        assert!(items.iter().all(|item| item.result.is_ok()));

        assert_eq!(service.translate_calls.load(Ordering::SeqCst), 2);
        assert_eq!(orch.usage().await.daily_count, 2);

        // Progress advances on every line, blank included
        assert_eq!(progress.len(), 3);
        assert!((progress[2] - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_batch_stops_charging_at_quota() {
        let service = MockService::translating("ok");
        let orch = orchestrator(service.clone(), 1, 100);

        let lines = vec!["one".to_string(), "two".to_string()];
        let items = orch.translate_batch(&lines, "ja", "en", |_| {}).await;

        assert!(items[0].result.is_ok());
        assert!(matches!(
            items[1].result,
            Err(GatewayError::QuotaExceeded { .. })
        ));
        assert_eq!(service.translate_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let service = MockService::translating("ok");
        let orch = orchestrator(service, 100, 1000);

        for i in 0..15 {
            let request = TranslationRequest::new(format!("line {i}"), "ja");
            orch.handle_translation(&request).await.unwrap();
        }

        let history = orch.history().await;
        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Most recent first, oldest five evicted
        assert_eq!(history[0].source_text, "line 14");
        assert_eq!(history[9].source_text, "line 5");
    }
}
