use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::constants::limits::MAX_QR_CODE_LEN;

static CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid code pattern"));

/// A short code only ever contains URL-safe characters, so it can be spliced
/// into an upstream path without encoding.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty() && code.len() <= MAX_QR_CODE_LEN && CODE_PATTERN.is_match(code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrKind {
    Url,
    Landing,
    Vcard,
}

/// Redirect target record owned by the upstream. `scans` is incremented
/// upstream on every resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub code: String,

    #[serde(rename = "type")]
    pub kind: QrKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_slug: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcard_data: Option<String>,

    #[serde(default)]
    pub scans: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The slice of the scan response the redirect route cares about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResolution {
    #[serde(default)]
    pub target_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_url_safe_codes() {
        assert!(is_valid_code("party2024"));
        assert!(is_valid_code("spring_rally-01"));
    }

    #[test]
    fn rejects_hostile_codes() {
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("../admin"));
        assert!(!is_valid_code("a b"));
        assert!(!is_valid_code(&"x".repeat(MAX_QR_CODE_LEN + 1)));
    }

    #[test]
    fn qr_code_parses_type_field() {
        let raw = r#"{
            "code": "party2024",
            "type": "url",
            "targetUrl": "https://example.org/join",
            "scans": 7,
            "createdAt": "2024-03-01T09:30:00Z"
        }"#;

        let qr: QrCode = serde_json::from_str(raw).unwrap();
        assert_eq!(qr.kind, QrKind::Url);
        assert_eq!(qr.scans, 7);
        assert!(qr.created_at.is_some());
    }
}
