//! Model registry for managing available LLM services

use super::{all_models, find_model, LlmService, LoggingService, OpenAIService, Pricing};
use std::collections::HashMap;
use std::sync::Arc;

const FALLBACK_DEFAULT_MODEL: &str = "claude-3.5-sonnet";

/// Configuration for the reasoning-agent transport
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    /// Chat completions endpoint override (gateway or self-hosted proxy)
    pub base_url: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("OPENROUTER_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|k| !k.is_empty()),
            base_url: std::env::var("LLM_BASE_URL").ok(),
            default_model: std::env::var("ARENA_MODEL").ok(),
        }
    }
}

/// A model ready to be driven: its service handle and pricing
#[derive(Clone)]
pub struct RegisteredModel {
    pub service: Arc<dyn LlmService>,
    pub pricing: Pricing,
}

/// Registry of available LLM models
pub struct ModelRegistry {
    models: HashMap<String, RegisteredModel>,
    default_model: String,
    config: LlmConfig,
}

impl ModelRegistry {
    /// Create an empty registry for testing purposes
    #[cfg(test)]
    pub fn new_empty() -> Self {
        Self {
            models: HashMap::new(),
            default_model: "test-model".to_string(),
            config: LlmConfig::default(),
        }
    }

    pub fn new(config: &LlmConfig) -> Self {
        let mut models = HashMap::new();

        if let Some(api_key) = config.api_key.as_deref() {
            for model_def in all_models() {
                match OpenAIService::new(
                    api_key,
                    model_def.api_name,
                    model_def.id,
                    config.base_url.as_deref(),
                ) {
                    Ok(service) => {
                        models.insert(
                            model_def.id.to_string(),
                            RegisteredModel {
                                service: Arc::new(LoggingService::new(Arc::new(service))),
                                pricing: model_def.pricing,
                            },
                        );
                    }
                    Err(e) => {
                        tracing::warn!(model = model_def.id, error = %e, "Failed to create model service");
                    }
                }
            }
        }

        let default_model = config
            .default_model
            .clone()
            .unwrap_or_else(|| FALLBACK_DEFAULT_MODEL.to_string());

        Self {
            models,
            default_model,
            config: config.clone(),
        }
    }

    /// Get a catalog model by ID
    pub fn get(&self, model_id: &str) -> Option<RegisteredModel> {
        self.models.get(model_id).cloned().or_else(|| {
            let def = find_model(model_id)?;
            self.models.get(def.id).cloned()
        })
    }

    /// Get a model by ID, routing ids outside the catalog straight to the
    /// provider. Such models are unpriced, so their cost reports as zero.
    pub fn resolve(&self, model_id: &str) -> Option<RegisteredModel> {
        if let Some(model) = self.get(model_id) {
            return Some(model);
        }

        let api_key = self.config.api_key.as_deref()?;
        let service = OpenAIService::new(api_key, model_id, model_id, self.config.base_url.as_deref())
            .map_err(|e| tracing::warn!(model = model_id, error = %e, "Failed to create model service"))
            .ok()?;
        tracing::warn!(model = model_id, "Model not in catalog, cost will be reported as zero");

        Some(RegisteredModel {
            service: Arc::new(LoggingService::new(Arc::new(service))),
            pricing: Pricing::free(),
        })
    }

    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn has_models(&self) -> bool {
        !self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_api_key_no_models() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert!(!registry.has_models());
        assert!(registry.get("gpt-4o").is_none());
        assert!(registry.resolve("some/other-model").is_none());
    }

    #[test]
    fn test_catalog_models_registered_with_key() {
        let config = LlmConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);

        assert_eq!(registry.available_models().len(), all_models().len());
        let model = registry.get("openai/gpt-4o-mini").unwrap();
        assert_eq!(model.service.model_id(), "gpt-4o-mini");
        assert!(model.pricing.output_per_1k > 0.0);
    }

    #[test]
    fn test_uncatalogued_model_is_free() {
        let config = LlmConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);

        let model = registry.resolve("mistralai/mistral-large").unwrap();
        assert_eq!(model.service.model_id(), "mistralai/mistral-large");
        assert_eq!(model.pricing, Pricing::free());
    }

    #[test]
    fn test_default_model_selection() {
        let registry = ModelRegistry::new(&LlmConfig::default());
        assert_eq!(registry.default_model_id(), FALLBACK_DEFAULT_MODEL);

        let config = LlmConfig {
            default_model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        assert_eq!(ModelRegistry::new(&config).default_model_id(), "gpt-4o");
        assert_eq!(ModelRegistry::new_empty().default_model_id(), "test-model");
    }
}
