//! Translation between domain enums and provider string tokens.
//!
//! Provider tokens are lowercase. Decoding ignores case and maps anything
//! unknown to `Unspecified`; encoding `Unspecified` yields `""`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::model::{Currency, Interval};

static CURRENCY_TOKENS: LazyLock<HashMap<Currency, String>> = LazyLock::new(|| {
    Currency::ALL
        .iter()
        .map(|c| (*c, c.iso_code().to_ascii_lowercase()))
        .collect()
});

static CURRENCIES_BY_TOKEN: LazyLock<HashMap<&'static str, Currency>> = LazyLock::new(|| {
    CURRENCY_TOKENS
        .iter()
        .map(|(currency, token)| (token.as_str(), *currency))
        .collect()
});

const INTERVAL_TOKENS: [(Interval, &str); 4] = [
    (Interval::Day, "day"),
    (Interval::Week, "week"),
    (Interval::Month, "month"),
    (Interval::Year, "year"),
];

pub fn currency_token(currency: Currency) -> &'static str {
    CURRENCY_TOKENS
        .get(&currency)
        .map(String::as_str)
        .unwrap_or("")
}

pub fn currency_from_token(token: &str) -> Currency {
    CURRENCIES_BY_TOKEN
        .get(token.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or_default()
}

pub fn interval_token(interval: Interval) -> &'static str {
    INTERVAL_TOKENS
        .iter()
        .find(|(i, _)| *i == interval)
        .map(|(_, token)| *token)
        .unwrap_or("")
}

pub fn interval_from_token(token: &str) -> Interval {
    INTERVAL_TOKENS
        .iter()
        .find(|(_, t)| t.eq_ignore_ascii_case(token))
        .map(|(interval, _)| *interval)
        .unwrap_or_default()
}
