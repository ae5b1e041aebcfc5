//! Per-decision usage accounting

use crate::llm::{Pricing, Usage};
use serde::Serialize;
use std::ops::AddAssign;

/// Tokens and cost of the reasoning requests made for one decision.
///
/// Only responses that actually arrived are counted; a failed transport
/// attempt has no usage to report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageRecord {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub requests: u32,
    pub cost_usd: f64,
}

impl UsageRecord {
    pub fn record(&mut self, usage: &Usage, pricing: &Pricing) {
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.requests += 1;
        self.cost_usd += pricing.cost(usage);
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

impl AddAssign for UsageRecord {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.requests += other.requests;
        self.cost_usd += other.cost_usd;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accumulates() {
        let pricing = Pricing::new(0.001, 0.002);
        let mut record = UsageRecord::default();

        record.record(&Usage { input_tokens: 1000, output_tokens: 500 }, &pricing);
        record.record(&Usage { input_tokens: 2000, output_tokens: 0 }, &pricing);

        assert_eq!(record.requests, 2);
        assert_eq!(record.total_tokens(), 3500);
        assert!((record.cost_usd - 0.004).abs() < 1e-12);
    }

    #[test]
    fn test_add_assign_sums_decisions() {
        let mut total = UsageRecord::default();
        total += UsageRecord {
            input_tokens: 10,
            output_tokens: 5,
            requests: 1,
            cost_usd: 0.5,
        };
        total += UsageRecord {
            input_tokens: 1,
            output_tokens: 1,
            requests: 2,
            cost_usd: 0.25,
        };

        assert_eq!(total.total_tokens(), 17);
        assert_eq!(total.requests, 3);
        assert!((total.cost_usd - 0.75).abs() < 1e-12);
    }
}
