//! Direct media URL lookup across the response shapes providers use.

use serde_json::Value;

/// JSON pointers searched for a direct URL, in precedence order.
const URL_POINTERS: [&str; 7] = [
    "/url",
    "/data/0/url",
    "/video_url",
    "/output/url",
    "/download_url",
    "/outputs/0/url",
    "/outputs/0/download_url",
];

/// Returns the first non-empty direct media URL in a job payload.
pub fn find_media_url(payload: &Value) -> Option<String> {
    URL_POINTERS.iter().find_map(|pointer| {
        payload
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|url| !url.trim().is_empty())
            .map(str::to_string)
    })
}
