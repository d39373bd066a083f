//! Link data model: contexts and check outcomes
//!
//! This module defines what the scanner records about every link it sees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The textual neighborhood a link was found in
///
/// Captured once at scan time and never mutated afterwards. The anchor text
/// doubles as the text embedded into the similarity index; the remaining
/// fields ride along as metadata for ranking and prompting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkContext {
    /// Anchor text of the link
    pub text: String,

    /// `title` attribute of the anchor, empty when absent
    pub title: String,

    /// Text around the anchor within its parent element
    pub surrounding_text: String,

    /// Text of the nearest heading preceding the enclosing section
    pub heading: String,

    /// `id` (or `class`) of the enclosing section, article, or div
    pub section_id: String,

    /// Page the link was found on (normalized)
    pub page_url: String,
}

/// Outcome of checking one link
///
/// A status is created once per observed link and never updated; re-checking
/// produces a new value. A link is broken exactly when the request failed at
/// the transport level or the final HTTP status was 400 or above, and the
/// constructors are the only way to build one, so that rule holds everywhere.
#[derive(Debug, Clone, Serialize)]
pub struct LinkStatus {
    /// The checked target URL (normalized)
    pub url: String,

    /// True when the link is considered broken
    pub is_broken: bool,

    /// Final HTTP status code, absent when the request never completed
    pub status_code: Option<u16>,

    /// Transport error description, present only on network failure
    pub error_message: Option<String>,

    /// Context the link was found in
    pub context: Option<LinkContext>,

    /// When the check happened
    pub checked_at: DateTime<Utc>,
}

impl LinkStatus {
    /// Records a completed HTTP check
    pub fn checked(url: String, status_code: u16, context: Option<LinkContext>) -> Self {
        Self {
            url,
            is_broken: status_code >= 400,
            status_code: Some(status_code),
            error_message: None,
            context,
            checked_at: Utc::now(),
        }
    }

    /// Records a transport failure; the request never produced a status
    pub fn failed(url: String, error: String, context: Option<LinkContext>) -> Self {
        Self {
            url,
            is_broken: true,
            status_code: None,
            error_message: Some(error),
            context,
            checked_at: Utc::now(),
        }
    }

    /// Anchor text of the context, empty when no context was recorded
    pub fn context_text(&self) -> &str {
        self.context
            .as_ref()
            .map(|c| c.text.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_status_not_broken() {
        let status = LinkStatus::checked("https://example.com/".to_string(), 200, None);
        assert!(!status.is_broken);
        assert_eq!(status.status_code, Some(200));
        assert!(status.error_message.is_none());
    }

    #[test]
    fn test_client_error_broken() {
        let status = LinkStatus::checked("https://example.com/gone".to_string(), 404, None);
        assert!(status.is_broken);
        assert_eq!(status.status_code, Some(404));
    }

    #[test]
    fn test_server_error_broken() {
        let status = LinkStatus::checked("https://example.com/err".to_string(), 503, None);
        assert!(status.is_broken);
    }

    #[test]
    fn test_boundary_at_400() {
        assert!(!LinkStatus::checked("https://a.test/".to_string(), 399, None).is_broken);
        assert!(LinkStatus::checked("https://a.test/".to_string(), 400, None).is_broken);
    }

    #[test]
    fn test_redirect_status_not_broken() {
        // Redirects are normally followed, but a bare 3xx still counts as alive
        let status = LinkStatus::checked("https://example.com/moved".to_string(), 301, None);
        assert!(!status.is_broken);
    }

    #[test]
    fn test_transport_failure_broken_without_status() {
        let status = LinkStatus::failed(
            "https://example.com/".to_string(),
            "connection refused".to_string(),
            None,
        );
        assert!(status.is_broken);
        assert_eq!(status.status_code, None);
        assert_eq!(status.error_message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_context_text_defaults_to_empty() {
        let status = LinkStatus::checked("https://example.com/".to_string(), 200, None);
        assert_eq!(status.context_text(), "");

        let context = LinkContext {
            text: "release notes".to_string(),
            ..Default::default()
        };
        let status = LinkStatus::checked("https://example.com/".to_string(), 200, Some(context));
        assert_eq!(status.context_text(), "release notes");
    }
}
