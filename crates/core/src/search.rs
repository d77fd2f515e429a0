//! Historical waitlist search helpers.
//!
//! History search is a case-insensitive substring match over removed
//! entries. The helpers here normalise the user's query into a safe
//! `ILIKE` pattern before it reaches the repository.

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Queries shorter than this (in characters, after trimming) match nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// Default number of history rows returned.
pub const DEFAULT_HISTORY_LIMIT: i64 = 10;

/// Maximum number of history rows returned.
pub const MAX_HISTORY_LIMIT: i64 = 50;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

// ---------------------------------------------------------------------------
// Query building
// ---------------------------------------------------------------------------

/// Trim a raw query and drop it if it is too short to search on.
pub fn normalize_query(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|q| q.chars().count() >= MIN_QUERY_CHARS)
}

/// Escape `ILIKE` metacharacters so user input matches literally.
///
/// The escape character is the PostgreSQL default (`\`).
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build a `%...%` substring pattern for `ILIKE`.
pub fn contains_pattern(query: &str) -> String {
    format!("%{}%", escape_like(query))
}
