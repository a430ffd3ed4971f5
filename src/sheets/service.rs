use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    app::{errors::AppError, util::google::client::google_client::GoogleClient},
    outcomes::log::OutcomeLog,
    prompts::queue::PromptQueue,
};

use super::{
    config::{DRIVE_API_URL, SHEETS_API_URL, SPREADSHEET_MIME_TYPE},
    structs::{
        drive_files_response::DriveFilesResponse, spreadsheet_response::SpreadsheetResponse,
        values_response::ValuesResponse,
    },
};

pub struct Spreadsheet {
    pub id: String,
    google: Arc<GoogleClient>,
}

impl Spreadsheet {
    /// Opens a spreadsheet by id, or looks it up by title through Drive.
    pub async fn open(
        google: Arc<GoogleClient>,
        id: Option<&str>,
        name: &str,
    ) -> Result<Spreadsheet, AppError> {
        let id = match id {
            Some(id) => id.to_string(),
            None => find_spreadsheet_id(&google, name).await?,
        };

        Ok(Spreadsheet { id, google })
    }

    pub async fn worksheet(&self, title: &str) -> Result<Worksheet, AppError> {
        let mut url = spreadsheet_url(&self.id, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");

        let request = self.google.http_client().get(url);
        let spreadsheet: SpreadsheetResponse =
            parse_json(self.google.send(request).await?, "worksheet").await?;

        let Some(sheet_id) = spreadsheet.sheet_id(title) else {
            tracing::error!("worksheet {} not found", title);
            return Err(AppError::Sheets);
        };

        Ok(Worksheet {
            spreadsheet_id: self.id.to_string(),
            sheet_id,
            title: title.to_string(),
            google: self.google.clone(),
        })
    }
}

pub struct Worksheet {
    pub spreadsheet_id: String,
    pub sheet_id: i64,
    pub title: String,
    google: Arc<GoogleClient>,
}

impl Worksheet {
    async fn get_values(&self, range: &str, major_dimension: &str) -> Result<Vec<String>, AppError> {
        let a1 = a1_range(&self.title, range);
        let mut url = spreadsheet_url(&self.spreadsheet_id, &["values", a1.as_str()])?;
        url.query_pairs_mut()
            .append_pair("majorDimension", major_dimension);

        let request = self.google.http_client().get(url);
        let response: ValuesResponse =
            parse_json(self.google.send(request).await?, "get_values").await?;

        Ok(response.into_first())
    }
}

#[async_trait]
impl PromptQueue for Worksheet {
    async fn column_values(&self, column: u32) -> Result<Vec<String>, AppError> {
        let letter = column_letter(column);
        self.get_values(&format!("{}:{}", letter, letter), "COLUMNS")
            .await
    }

    async fn row_values(&self, row: u32) -> Result<Vec<String>, AppError> {
        self.get_values(&format!("{}:{}", row, row), "ROWS").await
    }

    async fn delete_row(&self, row: u32) -> Result<(), AppError> {
        let url = spreadsheet_url(&format!("{}:batchUpdate", self.spreadsheet_id), &[])?;
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": self.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row.saturating_sub(1),
                        "endIndex": row,
                    }
                }
            }]
        });

        let request = self.google.http_client().post(url).json(&body);
        self.google.send(request).await?;

        tracing::debug!("deleted row {} of {}", row, self.title);
        Ok(())
    }
}

#[async_trait]
impl OutcomeLog for Worksheet {
    async fn append_row(&self, values: Vec<String>) -> Result<(), AppError> {
        let a1 = format!("{}:append", a1_range(&self.title, "A1"));
        let mut url = spreadsheet_url(&self.spreadsheet_id, &["values", a1.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");

        let request = self
            .google
            .http_client()
            .post(url)
            .json(&json!({ "values": [values] }));
        self.google.send(request).await?;

        Ok(())
    }
}

async fn find_spreadsheet_id(google: &GoogleClient, name: &str) -> Result<String, AppError> {
    let query = format!(
        "name = '{}' and mimeType = '{}' and trashed = false",
        name.replace('\\', "\\\\").replace('\'', "\\'"),
        SPREADSHEET_MIME_TYPE
    );

    let request = google
        .http_client()
        .get(DRIVE_API_URL)
        .query(&[("q", query.as_str()), ("fields", "files(id,name)")]);
    let response: DriveFilesResponse =
        parse_json(google.send(request).await?, "find_spreadsheet_id").await?;

    match response.files.into_iter().next() {
        Some(file) => {
            tracing::debug!("resolved spreadsheet {} to {}", file.name, file.id);
            Ok(file.id)
        }
        None => {
            tracing::error!("spreadsheet {} not found or not shared", name);
            Err(AppError::Sheets)
        }
    }
}

fn spreadsheet_url(id: &str, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = Url::parse(SHEETS_API_URL).map_err(|_| AppError::Internal)?;
    url.path_segments_mut()
        .map_err(|_| AppError::Internal)?
        .push(id)
        .extend(segments);

    Ok(url)
}

async fn parse_json<T: DeserializeOwned>(res: Response, operation: &str) -> Result<T, AppError> {
    match res.json::<T>().await {
        Ok(value) => Ok(value),
        Err(_) => {
            tracing::error!("{}: unexpected sheets response", operation);
            Err(AppError::InvalidResponse)
        }
    }
}

/// Quotes a worksheet title for A1 notation, e.g. `'Done'!A1`.
pub fn a1_range(title: &str, range: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), range)
}

/// 1 -> A, 26 -> Z, 27 -> AA
pub fn column_letter(column: u32) -> String {
    let mut n = column.max(1);
    let mut letters = Vec::new();

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }

    letters.iter().rev().collect()
}
