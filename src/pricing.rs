//! # Pricing Module
//!
//! Provides model-specific pricing information for cost calculations.
//!
//! ## Pricing Structure
//!
//! Each model has rates, in USD per million tokens, for:
//! - Input tokens
//! - Output tokens
//! - Cache creation (typically 1.25x input price)
//! - Cache reads (typically 0.1x input price)
//!
//! ## Resolution
//!
//! 1. Exact model id in [`EXACT_PRICING`]
//! 2. First matching prefix in [`PREFIX_PRICING`], which is ordered most
//!    specific first
//! 3. [`DEFAULT_PRICING`] (Sonnet tier)

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
    pub cache_write_per_million: f64,
    pub cache_read_per_million: f64,
}

impl Pricing {
    pub const fn new(input: f64, output: f64, cache_write: f64, cache_read: f64) -> Self {
        Self {
            input_per_million: input,
            output_per_million: output,
            cache_write_per_million: cache_write,
            cache_read_per_million: cache_read,
        }
    }
}

const OPUS_LEGACY: Pricing = Pricing::new(15.0, 75.0, 18.75, 1.50);
const OPUS: Pricing = Pricing::new(5.0, 25.0, 6.25, 0.50);
const SONNET: Pricing = Pricing::new(3.0, 15.0, 3.75, 0.30);
const HAIKU: Pricing = Pricing::new(1.0, 5.0, 1.25, 0.10);
const HAIKU_3_5: Pricing = Pricing::new(0.80, 4.0, 1.0, 0.08);
const HAIKU_3: Pricing = Pricing::new(0.25, 1.25, 0.30, 0.03);

/// Fallback when nothing matches: mid (Sonnet) tier.
pub const DEFAULT_PRICING: Pricing = SONNET;

pub static EXACT_PRICING: Lazy<HashMap<&'static str, Pricing>> = Lazy::new(|| {
    HashMap::from([
        ("claude-opus-4-6", OPUS),
        ("claude-opus-4-5-20251101", OPUS),
        ("claude-opus-4-1-20250805", OPUS_LEGACY),
        ("claude-opus-4-20250514", OPUS_LEGACY),
        ("claude-3-opus-20240229", OPUS_LEGACY),
        ("claude-sonnet-4-5-20251101", SONNET),
        ("claude-sonnet-4-5-20250929", SONNET),
        ("claude-sonnet-4-20250514", SONNET),
        ("claude-3-7-sonnet-20250219", SONNET),
        ("claude-3-5-sonnet-20241022", SONNET),
        ("claude-haiku-4-5-20251101", HAIKU),
        ("claude-haiku-4-5-20251001", HAIKU),
        ("claude-3-5-haiku-20241022", HAIKU_3_5),
        ("claude-3-haiku-20240307", HAIKU_3),
    ])
});

/// Family prefixes, checked in order. A prefix must come before any shorter
/// prefix it extends, otherwise the shorter one would shadow it.
pub const PREFIX_PRICING: &[(&str, Pricing)] = &[
    // Opus 4 and 4.1 kept the old rate card; 4.5 onwards falls to "claude-opus"
    ("claude-opus-4-1", OPUS_LEGACY),
    ("claude-opus-4-2025", OPUS_LEGACY),
    ("claude-opus", OPUS),
    ("claude-3-opus", OPUS_LEGACY),
    ("claude-sonnet", SONNET),
    ("claude-3-7-sonnet", SONNET),
    ("claude-3-5-sonnet", SONNET),
    ("claude-haiku", HAIKU),
    ("claude-3-5-haiku", HAIKU_3_5),
    ("claude-3-haiku", HAIKU_3),
];

/// Rates for `model`. Never fails: unknown ids get [`DEFAULT_PRICING`].
pub fn model_price(model: &str) -> Pricing {
    if let Some(p) = EXACT_PRICING.get(model) {
        return *p;
    }
    PREFIX_PRICING
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_PRICING)
}

/// USD cost of one usage record.
pub fn calculate_entry_cost(
    input_tokens: u64,
    output_tokens: u64,
    cache_write_tokens: u64,
    cache_read_tokens: u64,
    model: &str,
) -> f64 {
    let p = model_price(model);
    (input_tokens as f64 * p.input_per_million
        + output_tokens as f64 * p.output_per_million
        + cache_write_tokens as f64 * p.cache_write_per_million
        + cache_read_tokens as f64 * p.cache_read_per_million)
        / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_for_known_models() {
        let cases = [
            ("claude-opus-4-5-20251101", (5.0, 25.0, 6.25, 0.50)),
            ("claude-opus-4-6", (5.0, 25.0, 6.25, 0.50)),
            ("claude-sonnet-4-5-20251101", (3.0, 15.0, 3.75, 0.30)),
            ("claude-sonnet-4-5-20250929", (3.0, 15.0, 3.75, 0.30)),
            ("claude-sonnet-4-20250514", (3.0, 15.0, 3.75, 0.30)),
            ("claude-haiku-4-5-20251101", (1.0, 5.0, 1.25, 0.10)),
            ("claude-haiku-4-5-20251001", (1.0, 5.0, 1.25, 0.10)),
        ];
        for (model, (i, o, cw, cr)) in cases {
            let p = model_price(model);
            assert_eq!(p.input_per_million, i, "{model}");
            assert_eq!(p.output_per_million, o, "{model}");
            assert_eq!(p.cache_write_per_million, cw, "{model}");
            assert_eq!(p.cache_read_per_million, cr, "{model}");
        }
    }

    #[test]
    fn test_pricing_family_fallback() {
        // Future variants resolve by prefix
        assert_eq!(model_price("claude-opus-4-7-20260301"), OPUS);
        assert_eq!(model_price("claude-sonnet-5"), SONNET);
        assert_eq!(model_price("claude-haiku-4-6"), HAIKU);
        // More specific prefix wins over the family prefix
        assert_eq!(model_price("claude-opus-4-1-20990101"), OPUS_LEGACY);
        assert_eq!(model_price("claude-opus-4-20250601"), OPUS_LEGACY);
        assert_eq!(model_price("claude-3-5-haiku-latest"), HAIKU_3_5);
    }

    #[test]
    fn test_unknown_model_gets_default() {
        assert_eq!(model_price("claude-unknown-99"), DEFAULT_PRICING);
        assert_eq!(model_price("gpt-4o"), DEFAULT_PRICING);
        assert_eq!(model_price(""), DEFAULT_PRICING);
    }

    #[test]
    fn prefixes_are_not_shadowed() {
        for (i, (earlier, _)) in PREFIX_PRICING.iter().enumerate() {
            for (later, _) in &PREFIX_PRICING[i + 1..] {
                assert!(
                    !later.starts_with(earlier),
                    "{later} is unreachable behind {earlier}"
                );
            }
        }
    }

    #[test]
    fn test_calculate_entry_cost() {
        // (1000*5 + 500*25 + 200*6.25 + 10000*0.50) / 1M
        let cost = calculate_entry_cost(1000, 500, 200, 10000, "claude-opus-4-5-20251101");
        assert!((cost - 0.02375).abs() < 1e-12);
    }

    #[test]
    fn zero_tokens_cost_nothing() {
        for model in ["claude-opus-4-5-20251101", "claude-3-haiku-20240307", "mystery"] {
            assert_eq!(calculate_entry_cost(0, 0, 0, 0, model), 0.0);
        }
    }
}
