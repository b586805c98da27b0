use serde::Serialize;

use crate::config::settings::ServerSettings;

/// Largest offset SQLite accepts as an integer
const MAX_OFFSET: usize = i64::MAX as usize;

/// Limit/offset window of a listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// Apply the configured default and cap to raw query values
    pub fn resolve(limit: Option<usize>, offset: Option<usize>, settings: &ServerSettings) -> Self {
        let limit = limit
            .unwrap_or(settings.default_page_size)
            .clamp(1, settings.max_page_size.max(1));

        Self {
            limit,
            offset: offset.unwrap_or(0).min(MAX_OFFSET),
        }
    }

    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.offset.saturating_add(self.limit) < total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}
