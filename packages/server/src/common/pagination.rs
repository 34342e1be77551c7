//! Page-number pagination for list endpoints.
//!
//! Query-string values arrive as raw strings; anything that fails to parse
//! as a number is treated as absent rather than rejecting the request.
//!
//! # Usage
//!
//! ```rust,ignore
//! let args = PageArgs { page: Some("2".into()), limit: Some("10".into()) };
//! let page = args.validate();
//! // page.offset() feeds SQL OFFSET, page.limit feeds SQL LIMIT
//! ```

/// Default page size when `limit` is absent or unparseable.
pub const DEFAULT_LIMIT: i64 = 20;

/// Upper bound on the page size.
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination inputs as they arrive from the query string.
#[derive(Debug, Clone, Default)]
pub struct PageArgs {
    /// 1-based page number; values below 1 clamp to 1.
    pub page: Option<String>,
    /// Page size; clamped to 1..=MAX_LIMIT.
    pub limit: Option<String>,
}

impl PageArgs {
    /// Normalize the raw inputs. Never fails: unparseable values fall back
    /// to the defaults.
    pub fn validate(&self) -> ValidatedPageArgs {
        let page = self
            .page
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);

        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        ValidatedPageArgs { page, limit }
    }
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPageArgs {
    /// 1-based page number (>= 1).
    pub page: i64,
    /// Page size (1..=MAX_LIMIT).
    pub limit: i64,
}

impl ValidatedPageArgs {
    /// SQL OFFSET for this window. Saturates: an absurdly large page number
    /// addresses rows past the end of any result set, not a panic.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for ValidatedPageArgs {
    fn default() -> Self {
        PageArgs::default().validate()
    }
}
