/// Default base URL of the debate service.
pub const DEFAULT_DEBATE_BASE_URL: &str = "http://127.0.0.1:8000";

/// Streaming endpoint path below the base URL.
pub const STREAM_ENDPOINT_PATH: &str = "/api/debate/stream";

/// Normalize a base URL to the streaming debate endpoint.
///
/// Normalization rules:
/// 1) keep `/api/debate/stream` unchanged
/// 2) append `/stream` when path ends in `/api/debate`
/// 3) append `/api/debate/stream` otherwise
pub fn normalize_debate_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_DEBATE_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(STREAM_ENDPOINT_PATH) {
        return trimmed.to_string();
    }
    if trimmed.ends_with("/api/debate") {
        return format!("{trimmed}/stream");
    }
    format!("{trimmed}{STREAM_ENDPOINT_PATH}")
}
