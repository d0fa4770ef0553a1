use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::google_auth::{ServiceAccountAuth, TokenProvider};
use super::credentials::ServiceAccountKey;
use super::rows;
use super::traits::{HoldingStore, HoldingsSheet};
use crate::errors::CoreError;
use crate::models::holding::Holding;

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Holdings stored in one worksheet of a Google spreadsheet.
///
/// Uses the Sheets v4 `values` endpoints:
/// - read: `GET  /spreadsheets/{id}/values/{worksheet}`
/// - write: `POST /spreadsheets/{id}/values/{worksheet}:append`
pub struct GoogleSheetsStore {
    client: Client,
    auth: Arc<dyn TokenProvider>,
    spreadsheet_id: String,
    worksheet: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsStore {
    pub fn new(
        auth: Arc<dyn TokenProvider>,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Store authenticated with a service-account key.
    pub fn with_service_account(
        key: ServiceAccountKey,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Self {
        Self::new(
            Arc::new(ServiceAccountAuth::new(key)),
            spreadsheet_id,
            worksheet,
        )
    }

    /// Point the store at another host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn values_url(&self, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(&self.worksheet),
            suffix
        )
    }

    async fn check(resp: Response, action: &str) -> Result<Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(CoreError::Store(format!(
            "Google Sheets {action} failed ({status}): {}",
            body.trim()
        )))
    }
}

#[async_trait]
impl HoldingStore for GoogleSheetsStore {
    fn name(&self) -> &str {
        "Google Sheets"
    }

    async fn fetch_all(&self) -> Result<HoldingsSheet, CoreError> {
        let token = self.auth.access_token().await?;
        let url = self.values_url("");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "UNFORMATTED_VALUE"),
            ])
            .send()
            .await?;
        let resp = Self::check(resp, "read").await?;

        let range: ValueRange = resp
            .json()
            .await
            .map_err(|e| CoreError::Store(format!("Malformed values response: {e}")))?;

        let sheet = rows::parse_sheet(&range.values);
        for skipped in &sheet.skipped {
            warn!(row = skipped.row, message = %skipped.message, "skipping unreadable sheet row");
        }
        debug!(
            rows = sheet.holdings.len(),
            skipped = sheet.skipped.len(),
            "holdings sheet read"
        );
        Ok(sheet)
    }

    async fn append(&self, holding: &Holding) -> Result<(), CoreError> {
        let token = self.auth.access_token().await?;
        let url = self.values_url(":append");
        let body = AppendBody {
            major_dimension: "ROWS",
            values: vec![rows::to_row(holding)?],
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await?;
        Self::check(resp, "append").await?;

        info!(owner = %holding.owner, ticker = %holding.ticker, "row appended to sheet");
        Ok(())
    }
}
