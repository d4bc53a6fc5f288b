//! Page-number pagination primitives shared by backend list endpoints.
//!
//! A [`PageRequest`] carries a 1-based page number and a page size. It is
//! usually parsed from raw query-string values with [`PageRequest::from_raw`],
//! which applies the defaults (page 1, twelve items) when a value is absent.
//! [`Page::from_items`] slices an already filtered and ordered sequence into
//! a [`Page`] envelope that reports the total count and the page count.
//!
//! Requests beyond the last page are not errors: they produce an empty page
//! carrying the same metadata, so client pagination controls stay idempotent.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::from_raw(Some("2"), Some("2")).expect("valid request");
//! let page = Page::from_items(vec!["a", "b", "c"], request);
//!
//! assert_eq!(page.entries, vec!["c"]);
//! assert_eq!(page.total, 3);
//! assert_eq!(page.page, 2);
//! assert_eq!(page.total_pages, 2);
//! ```

use serde::{Deserialize, Serialize};

/// Page number used when the client does not supply one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the client does not supply one.
pub const DEFAULT_LIMIT: u32 = 12;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number is not a positive integer.
    #[error("page must be a positive integer, got '{value}'")]
    InvalidPage {
        /// Raw value supplied by the client.
        value: String,
    },
    /// The page size is not a positive integer.
    #[error("limit must be a positive integer, got '{value}'")]
    InvalidLimit {
        /// Raw value supplied by the client.
        value: String,
    },
}

impl PageRequestError {
    /// Name of the offending query parameter.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidPage { .. } => "page",
            Self::InvalidLimit { .. } => "limit",
        }
    }
}

/// Validated pagination request.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Construct a request from already-typed values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::InvalidPage {
                value: page.to_string(),
            });
        }
        if limit == 0 {
            return Err(PageRequestError::InvalidLimit {
                value: limit.to_string(),
            });
        }
        Ok(Self { page, limit })
    }

    /// Parse raw query-string values, applying defaults for absent or blank
    /// values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a value is present but is not a
    /// positive integer.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, DEFAULT_LIMIT};
    ///
    /// let request = PageRequest::from_raw(None, Some(" ")).expect("defaults apply");
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), DEFAULT_LIMIT);
    /// assert!(PageRequest::from_raw(Some("0"), None).is_err());
    /// ```
    pub fn from_raw(
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<Self, PageRequestError> {
        let page = parse_positive(raw_page, DEFAULT_PAGE)
            .map_err(|value| PageRequestError::InvalidPage { value })?;
        let limit = parse_positive(raw_limit, DEFAULT_LIMIT)
            .map_err(|value| PageRequestError::InvalidLimit { value })?;
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on a page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Index of the first item on the requested page.
    #[must_use]
    pub fn start_index(&self) -> usize {
        let preceding_pages = usize::try_from(self.page - 1).unwrap_or(usize::MAX);
        preceding_pages.saturating_mul(self.limit_usize())
    }

    fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> Result<u32, String> {
    let Some(trimmed) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default);
    };
    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(trimmed.to_owned()),
    }
}

/// Page envelope returned by list endpoints.
///
/// Serialises as `{ "entries": [...], "total": n, "page": n, "totalPages": n }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on the requested page, in the order of the source sequence.
    pub entries: Vec<T>,
    /// Number of items in the full sequence before slicing.
    pub total: u64,
    /// Requested page number, echoed back.
    pub page: u32,
    /// Number of pages needed to show every item; `0` for an empty sequence.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Slice `items` according to `request`.
    ///
    /// The slice `[start, start + limit)` is clipped to the sequence bounds,
    /// so out-of-range pages yield no entries rather than an error.
    #[must_use]
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let limit = request.limit_usize();
        let entries = items
            .into_iter()
            .skip(request.start_index())
            .take(limit)
            .collect();

        Self {
            entries,
            total: to_u64(total),
            page: request.page(),
            total_pages: to_u64(total.div_ceil(limit)),
        }
    }
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
