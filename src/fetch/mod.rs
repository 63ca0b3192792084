// src/fetch/mod.rs

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::error::SheetError;
use crate::RawSheet;

static BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets/";

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Anything that can produce the raw cell values of one worksheet. The
/// normalization pipeline and the session cache only ever see this boundary,
/// so tests inject fixture sheets instead of a live service.
pub trait RowSource {
    fn fetch_rows(&self, spreadsheet_id: &str, worksheet: &str) -> Result<RawSheet, SheetError>;
}

/// Google Sheets `values.get` client. All values come back formatted, i.e.
/// as the strings a human sees in the sheet; typing is the normalizer's job.
pub struct SheetClient {
    http: Client,
    api_key: String,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl SheetClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        SheetClient {
            http: Client::new(),
            api_key: api_key.into(),
            base: Url::parse(BASE_URL).expect("base URL should be valid"),
        }
    }

    fn endpoint(&self, spreadsheet_id: &str, worksheet: &str) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL can be a base")
            .pop_if_empty()
            .extend([spreadsheet_id, "values", worksheet]);
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        url
    }
}

/// Flatten a JSON cell to the string the sheet displays. The values endpoint
/// normally returns strings, but numbers and bools slip through on some
/// render options.
fn cell_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Map a non-success status to the error taxonomy. The values endpoint
/// answers 400 ("unable to parse range") or 404 for a worksheet name the
/// spreadsheet doesn't have; everything else is the source being unavailable.
fn classify_status(status: StatusCode, worksheet: &str) -> SheetError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
            SheetError::WorksheetNotFound(worksheet.to_string())
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SheetError::SourceUnavailable(format!("auth rejected ({status})"))
        }
        status => SheetError::SourceUnavailable(format!("HTTP {status} from sheet service")),
    }
}

impl RowSource for SheetClient {
    fn fetch_rows(&self, spreadsheet_id: &str, worksheet: &str) -> Result<RawSheet, SheetError> {
        let url = self.endpoint(spreadsheet_id, worksheet);

        // Transport errors retry; HTTP-level rejections do not.
        let mut attempt = 0;
        let resp = loop {
            attempt += 1;
            match self.http.get(url.clone()).send() {
                Ok(resp) => break resp,
                Err(err) if attempt < MAX_RETRIES => {
                    warn!(worksheet, attempt, %err, "fetch failed, retrying");
                    thread::sleep(RETRY_DELAY);
                }
                Err(err) => return Err(SheetError::SourceUnavailable(err.to_string())),
            }
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status, worksheet));
        }

        let range: ValueRange = resp
            .json()
            .map_err(|e| SheetError::SourceUnavailable(format!("bad value-range payload: {e}")))?;

        let rows: RawSheet = range
            .values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        info!(worksheet, rows = rows.len(), "fetched worksheet");
        Ok(rows)
    }
}
