// src/cache.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::error::SheetError;
use crate::fetch::RowSource;
use crate::RawSheet;

/// Session-scoped memoization of fetched sheets, keyed by
/// `(spreadsheet_id, worksheet)`. Each analytical session owns one cache;
/// fetched sheets are immutable and shared via `Arc`, derived tables are
/// always recomputed from them. Invalidation is explicit (session restart),
/// there is no expiry.
pub struct SheetCache {
    entries: Mutex<HashMap<(String, String), Arc<RawSheet>>>,
}

impl SheetCache {
    pub fn new() -> Self {
        SheetCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached sheet, fetching through `source` on first use.
    /// Fetch failures are not cached; the next call retries.
    pub fn get_or_fetch(
        &self,
        source: &dyn RowSource,
        spreadsheet_id: &str,
        worksheet: &str,
    ) -> Result<Arc<RawSheet>, SheetError> {
        let key = (spreadsheet_id.to_string(), worksheet.to_string());
        if let Some(sheet) = self.entries.lock().unwrap().get(&key) {
            debug!(worksheet, "sheet cache hit");
            return Ok(Arc::clone(sheet));
        }

        let sheet = Arc::new(source.fetch_rows(spreadsheet_id, worksheet)?);
        self.entries
            .lock()
            .unwrap()
            .insert(key, Arc::clone(&sheet));
        Ok(sheet)
    }

    /// Drop every cached sheet. Called on session restart.
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock().unwrap();
        info!(dropped = entries.len(), "sheet cache invalidated");
        entries.clear();
    }
}

impl Default for SheetCache {
    fn default() -> Self {
        Self::new()
    }
}
