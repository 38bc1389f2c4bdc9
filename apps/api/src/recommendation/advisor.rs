//! Build advisor — orchestrates one submission end to end.
//!
//! Flow: PreferenceRequest → PreferenceModel (validate) → compile prompt →
//!       fetch_recommendation (one round trip) → validate response.
//!
//! Invalid preferences never reach the completion call. Nothing is retried; a transient
//! `ServiceUnavailable` is the caller's to retry.

use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{fetch_recommendation, CompletionProvider};
use crate::money::format_inr;
use crate::preferences::{PreferenceModel, PreferenceRequest};
use crate::prompt::compile;
use crate::recommendation::models::RecommendationResponse;
use crate::recommendation::validator::{validate, ValidationPolicy};

/// Per-process advisor settings, derived from `Config` at startup.
#[derive(Debug, Clone, Copy)]
pub struct AdvisorSettings {
    /// Upper bound on the completion round trip.
    pub deadline: Duration,
    pub price_tolerance: f64,
}

impl AdvisorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            deadline: config.llm.timeout,
            price_tolerance: config.price_tolerance,
        }
    }
}

pub async fn recommend_build(
    provider: &dyn CompletionProvider,
    request: PreferenceRequest,
    settings: &AdvisorSettings,
) -> Result<RecommendationResponse, AppError> {
    // Step 1: Validate preferences
    let preferences = PreferenceModel::try_from(request)?;
    info!(
        "Recommending {} {} build for {}",
        preferences.pc_type(),
        preferences.form_factor(),
        format_inr(preferences.budget())
    );

    // Step 2: Compile prompt
    let prompt = compile(&preferences);

    // Step 3: Single completion round trip
    let parsed = fetch_recommendation(provider, &prompt, settings.deadline).await?;

    // Step 4: Schema validation and price reconciliation
    let policy = ValidationPolicy {
        form_factor: preferences.form_factor(),
        price_tolerance: settings.price_tolerance,
    };
    let response = validate(&parsed, &policy)?;

    info!(
        "Recommendation ready: {} parts, total {}, {} advisories",
        response.parts.len(),
        format_inr(response.total_cost),
        response.advisories.len()
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::llm_client::LlmError;
    use crate::recommendation::validator::ValidationError;

    /// Replays a canned completion and records every prompt it receives.
    struct ScriptedProvider {
        reply: Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedProvider {
        fn replying(text: impl Into<String>) -> Self {
            Self {
                reply: Ok(text.into()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        fn unavailable() -> Self {
            Self {
                reply: Err("connection refused".to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().map_err(LlmError::ServiceUnavailable)
        }
    }

    const SETTINGS: AdvisorSettings = AdvisorSettings {
        deadline: Duration::from_secs(5),
        price_tolerance: 0.02,
    };

    fn gaming_request() -> PreferenceRequest {
        serde_json::from_value(json!({
            "budget": "80000",
            "pc_type": "Gaming",
            "style": "Any",
            "form_factor": "Desktop",
            "cpu_brand": "AMD",
            "gpu_brand": "Any",
            "accessories": "Keyboard"
        }))
        .unwrap()
    }

    fn build_reply() -> String {
        json!({
            "total_cost": 79500,
            "notes": "GPU-heavy build for 1080p/1440p gaming.",
            "parts": [
                {"type": "CPU", "name": "Ryzen 5 7600", "price": 18500, "specs": "6C/12T", "reason": "Strong gaming IPC"},
                {"type": "GPU", "name": "RTX 4060 Ti", "price": 39000, "specs": "8GB", "reason": "GPU first"},
                {"type": "Motherboard", "name": "B650M", "price": 13000, "specs": "AM5", "reason": "Cheapest AM5"},
                {"type": "Accessories", "name": "Membrane keyboard", "price": 9000, "specs": "USB", "reason": "Requested"}
            ],
            "performance_benchmarks": {
                "gaming_1080p": "120+ FPS",
                "gaming_1440p": "80 FPS",
                "productivity_score": "Good, 7/10"
            },
            "compatibility_matrix": {
                "cpu_motherboard": "Compatible",
                "ram_motherboard": "Compatible",
                "gpu_case": "Fits",
                "psu_wattage": "Sufficient"
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_pipeline_returns_validated_build() {
        let provider = ScriptedProvider::replying(build_reply());
        let response = recommend_build(&provider, gaming_request(), &SETTINGS)
            .await
            .unwrap();

        assert_eq!(response.parts.len(), 4);
        assert_eq!(response.total_cost, 79500.0);
        assert!(response.advisories.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pipeline_sends_compiled_prompt() {
        let provider = ScriptedProvider::replying(build_reply());
        recommend_build(&provider, gaming_request(), &SETTINGS)
            .await
            .unwrap();

        let prompt = provider.last_prompt.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("- CPU Brand Preference: AMD"));
        assert!(prompt.contains("- Include Accessories: Keyboard"));
        assert!(!prompt.contains("GPU Brand Preference"));
        assert!(prompt.contains("GPU > CPU > RAM > Storage"));
    }

    #[tokio::test]
    async fn test_invalid_preferences_never_reach_provider() {
        let provider = ScriptedProvider::replying(build_reply());
        let mut request = gaming_request();
        request.exclude_accessories = Some(crate::preferences::request::AccessoryInput::Csv(
            "keyboard".to_string(),
        ));

        let err = recommend_build(&provider, request, &SETTINGS)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidPreferences(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_service_unavailable() {
        let provider = ScriptedProvider::unavailable();
        let err = recommend_build(&provider, gaming_request(), &SETTINGS)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_garbage_reply_surfaces_as_malformed() {
        let provider = ScriptedProvider::replying("I recommend an RTX 4060 build!");
        let err = recommend_build(&provider, gaming_request(), &SETTINGS)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_schema_violation_surfaces_as_validation_error() {
        let mut reply: serde_json::Value = serde_json::from_str(&build_reply()).unwrap();
        reply
            .as_object_mut()
            .unwrap()
            .remove("performance_benchmarks");
        let provider = ScriptedProvider::replying(reply.to_string());

        let err = recommend_build(&provider, gaming_request(), &SETTINGS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingField(ref f)) if f == "performance_benchmarks"
        ));
    }
}
