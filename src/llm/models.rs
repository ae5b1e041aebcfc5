//! Model catalog
//!
//! Every model the arena knows how to price. All of them are reached through
//! an OpenAI-compatible chat completions endpoint (OpenRouter by default),
//! so a definition is just the routing name plus pricing.

use super::Usage;

/// Price per 1K tokens, in USD
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Pricing {
    pub const fn new(input_per_1k: f64, output_per_1k: f64) -> Self {
        Self {
            input_per_1k,
            output_per_1k,
        }
    }

    /// Zero-cost pricing for models outside the catalog and for tests
    pub const fn free() -> Self {
        Self::new(0.0, 0.0)
    }

    #[allow(clippy::cast_precision_loss)] // Token counts stay far below 2^52
    pub fn cost(&self, usage: &Usage) -> f64 {
        (usage.input_tokens as f64 / 1000.0) * self.input_per_1k
            + (usage.output_tokens as f64 / 1000.0) * self.output_per_1k
    }
}

/// Model definition with metadata
#[derive(Debug, Clone)]
pub struct ModelDef {
    /// User-facing model ID (e.g., "claude-3.5-sonnet")
    pub id: &'static str,
    /// Routing name sent to the provider (e.g., "anthropic/claude-3.5-sonnet")
    pub api_name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    pub pricing: Pricing,
}

static MODELS: &[ModelDef] = &[
    ModelDef {
        id: "claude-3.5-sonnet",
        api_name: "anthropic/claude-3.5-sonnet",
        description: "Claude 3.5 Sonnet",
        pricing: Pricing::new(0.003, 0.015),
    },
    ModelDef {
        id: "claude-3-haiku",
        api_name: "anthropic/claude-3-haiku",
        description: "Claude 3 Haiku (fast, cheap)",
        pricing: Pricing::new(0.000_25, 0.001_25),
    },
    ModelDef {
        id: "gpt-4o",
        api_name: "openai/gpt-4o",
        description: "GPT-4o",
        pricing: Pricing::new(0.002_5, 0.01),
    },
    ModelDef {
        id: "gpt-4o-mini",
        api_name: "openai/gpt-4o-mini",
        description: "GPT-4o mini (fast, cheap)",
        pricing: Pricing::new(0.000_15, 0.000_6),
    },
    ModelDef {
        id: "gemini-1.5-pro",
        api_name: "google/gemini-1.5-pro",
        description: "Gemini 1.5 Pro",
        pricing: Pricing::new(0.001_25, 0.005),
    },
    ModelDef {
        id: "gemini-1.5-flash",
        api_name: "google/gemini-1.5-flash",
        description: "Gemini 1.5 Flash (fast, cheap)",
        pricing: Pricing::new(0.000_075, 0.000_3),
    },
];

/// Get all model definitions
pub fn all_models() -> &'static [ModelDef] {
    MODELS
}

/// Look up a model by user-facing id or routing name
pub fn find_model(id: &str) -> Option<&'static ModelDef> {
    MODELS.iter().find(|m| m.id == id || m.api_name == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_model_ids() {
        let mut ids: Vec<_> = all_models().iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all_models().len());
    }

    #[test]
    fn test_find_by_either_name() {
        assert_eq!(find_model("gpt-4o").unwrap().api_name, "openai/gpt-4o");
        assert_eq!(find_model("openai/gpt-4o").unwrap().id, "gpt-4o");
        assert!(find_model("nonexistent").is_none());
    }

    #[test]
    fn test_cost_per_thousand_tokens() {
        let pricing = Pricing::new(0.003, 0.015);
        let usage = Usage {
            input_tokens: 2000,
            output_tokens: 1000,
        };
        let cost = pricing.cost(&usage);
        assert!((cost - 0.021).abs() < 1e-9);
        assert!(Pricing::free().cost(&usage).abs() < f64::EPSILON);
    }
}
