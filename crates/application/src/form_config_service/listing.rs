use formdesk_core::{AppError, AppResult};
use formdesk_domain::FormConfig;

use crate::form_config_ports::{FormConfigListQuery, PageWindow};

/// Page used when the caller does not send one.
pub(crate) const DEFAULT_PAGE: usize = 1;

/// Page size used when the caller does not send one.
pub const DEFAULT_PAGE_LIMIT: usize = 25;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: usize = 500;

/// Caller-facing listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormConfigListRequest {
    /// One-indexed page; `None` or zero means the first page.
    pub page: Option<usize>,
    /// Page size; `None` or zero means the default size.
    pub limit: Option<usize>,
    /// Search term; empty means no filter.
    pub search: Option<String>,
    /// Return every match and skip pagination.
    pub export: bool,
}

impl FormConfigListRequest {
    /// Translates the request into a repository query.
    ///
    /// A page size above [`MAX_PAGE_LIMIT`] is rejected so the offset is
    /// always `(page - 1) * limit` of the size the caller asked for.
    pub fn to_query(&self) -> AppResult<FormConfigListQuery> {
        let search = self
            .search
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(str::to_owned);

        let window = if self.export {
            None
        } else {
            let page = self.page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE);
            let limit = self
                .limit
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_PAGE_LIMIT);
            if limit > MAX_PAGE_LIMIT {
                return Err(AppError::Validation(format!(
                    "limit must be at most {MAX_PAGE_LIMIT}, got {limit}"
                )));
            }

            Some(PageWindow {
                offset: (page - 1).saturating_mul(limit),
                limit,
            })
        };

        Ok(FormConfigListQuery { search, window })
    }
}

/// Listing result returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfigListing {
    /// Records, newest first.
    pub items: Vec<FormConfig>,
    /// Total matches; absent for exports.
    pub total: Option<u64>,
}
