//! The privacy tag span pattern.

use std::sync::LazyLock;

use regex::Regex;

/// Matches one complete tag region, shortest-first, spans crossing newlines.
/// Compilation failure leaves `None`; the engine degrades to a no-op and
/// logs.
pub(crate) static TAG_SPANS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?s)<private>.*?</private>|<no-memory>.*?</no-memory>|<secret>.*?</secret>").ok()
});
