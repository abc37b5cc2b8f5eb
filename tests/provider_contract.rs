//! Contract tests for the market-data seam.
//!
//! Any `MarketData` implementation must honor these: zero bars is a valid
//! result rather than an error, failures carry a stable classification, and
//! the trait stays object-safe so providers can be swapped at runtime.

use tickwatch_core::{
    FixtureProvider, MarketData, ProviderError, ProviderErrorKind, Symbol, Timeframe,
};

fn symbol(name: &str) -> Symbol {
    Symbol::parse(name).expect("valid symbol")
}

#[tokio::test]
async fn empty_window_is_ok_not_an_error() {
    let provider = FixtureProvider::new().with_empty(symbol("THIN"));

    for timeframe in Timeframe::ALL {
        let bars = provider
            .history(&symbol("THIN"), timeframe)
            .await
            .expect("empty window must be Ok");
        assert!(bars.is_empty());
    }
}

#[tokio::test]
async fn provider_errors_carry_kind_code_and_retryability() {
    let transport = ProviderError::transport("connection refused");
    assert_eq!(transport.kind(), ProviderErrorKind::Transport);
    assert_eq!(transport.code(), "provider.transport");
    assert!(transport.retryable());

    let unknown = ProviderError::unknown_symbol(&symbol("NOPE"));
    assert_eq!(unknown.kind(), ProviderErrorKind::UnknownSymbol);
    assert!(!unknown.retryable());
    assert!(unknown.to_string().contains("NOPE"));

    let throttled = ProviderError::rate_limited("429");
    assert!(throttled.retryable());

    let garbled = ProviderError::invalid_response("truncated json");
    assert!(!garbled.retryable());
}

#[tokio::test]
async fn providers_are_usable_behind_a_trait_object() {
    let provider: Box<dyn MarketData> = Box::new(FixtureProvider::seeded());
    assert_eq!(provider.provider_name(), "fixture");

    let bars = provider
        .history(&symbol("SPY"), Timeframe::Daily)
        .await
        .expect("seeded history");
    assert!(!bars.is_empty());

    for window in bars.windows(2) {
        assert!(window[0].ts < window[1].ts);
    }
}
