//! Utility modules for the batch service
//!
//! - **error**: Error types and the crate-wide `Result` alias
//! - **logging**: Tracing subscriber initialisation

pub mod error; // Error handling
pub mod logging; // Logging & monitoring

/// Truncate string to at most `max_chars` characters with ellipsis
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Check if a string is a valid http(s) URL
pub fn is_valid_http_url(url: &str) -> bool {
    url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}
