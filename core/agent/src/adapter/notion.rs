//! Notion API クライアント（DocumentApi の実装）
//!
//! - append_block: `PATCH {base}/blocks/{page_id}/children` に段落ブロックを 1 つ
//! - create_child_page: `POST {base}/pages` にタイトル + 段落 1 つ
//!
//! 2xx 以外はステータスと Notion の `message` を持つ Error::DocumentApi にする。

use crate::adapter::settings::{NotionSettings, NOTION_VERSION};
use crate::domain::BlockRef;
use crate::ports::outbound::DocumentApi;
use common::domain::{ApiKey, PageId};
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use serde_json::{json, Value};
use std::sync::Arc;

/// rich_text の 1 ラン（text.content）に入れられる最大文字数
pub const RICH_TEXT_LIMIT: usize = 2000;

/// テキストを RICH_TEXT_LIMIT 文字ごとのランに分ける（連結すると元に戻る）
pub fn rich_text_runs(text: &str) -> Vec<Value> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![text_run("")];
    }
    chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|c| text_run(&c.iter().collect::<String>()))
        .collect()
}

fn text_run(content: &str) -> Value {
    json!({ "type": "text", "text": { "content": content } })
}

fn paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text_runs(text) }
    })
}

/// append_block のリクエストボディ
pub fn append_block_payload(text: &str) -> Value {
    json!({ "children": [paragraph(text)] })
}

/// create_child_page のリクエストボディ
pub fn create_page_payload(parent: &PageId, title: &str, text: &str) -> Value {
    json!({
        "parent": { "page_id": parent.as_str() },
        "properties": {
            "title": { "title": [text_run(title)] }
        },
        "children": [paragraph(text)]
    })
}

/// append 応答から作成されたブロックの ID を取り出す（results の最後）
fn parse_appended_block_id(body: &str) -> Result<String, Error> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| Error::document_api(format!("Notion: invalid JSON response: {}", e)))?;
    v["results"]
        .as_array()
        .and_then(|r| r.last())
        .and_then(|b| b["id"].as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::document_api("Notion: response has no created block"))
}

fn parse_page_id(body: &str) -> Result<String, Error> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| Error::document_api(format!("Notion: invalid JSON response: {}", e)))?;
    v["id"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| Error::document_api("Notion: response has no page id"))
}

/// 非 2xx 応答のメッセージ（Notion のエラーボディは `{"object":"error","code":..,"message":..}`）
fn error_from_response(status: reqwest::StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        let message = v["message"].as_str()?.to_string();
        Some(match v["code"].as_str() {
            Some(code) => format!("{} ({})", message, code),
            None => message,
        })
    });
    Error::document_api(format!(
        "Notion API error: HTTP {}: {}",
        status.as_u16(),
        detail.unwrap_or_else(|| body.trim().to_string())
    ))
}

/// Notion の REST API クライアント
pub struct NotionClient {
    base_url: String,
    api_key: ApiKey,
    client: reqwest::blocking::Client,
    log: Arc<dyn Log>,
}

impl NotionClient {
    /// settings に API キーが無ければ Error::Config
    pub fn new(settings: &NotionSettings, log: Arc<dyn Log>) -> Result<Self, Error> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or_else(|| Error::config("NOTION_API_KEY is not set"))?;
        let client = reqwest::blocking::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::system(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            log,
        })
    }

    fn send(&self, method: reqwest::Method, url: &str, body: &Value) -> Result<String, Error> {
        self.log.emit(
            LogRecord::new(LogLevel::Debug, "notion request")
                .layer("adapter")
                .kind("http")
                .field("method", method.as_str())
                .field("url", url),
        );
        let response = self
            .client
            .request(method, url)
            .bearer_auth(self.api_key.expose())
            .header("Notion-Version", NOTION_VERSION)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| Error::document_api(format!("Notion request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::document_api(format!("Notion: failed to read response: {}", e)))?;
        self.log.emit(
            LogRecord::new(LogLevel::Debug, "notion response")
                .layer("adapter")
                .kind("http")
                .field("status", status.as_u16()),
        );
        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }
        Ok(text)
    }
}

impl DocumentApi for NotionClient {
    fn append_block(&self, page_id: &PageId, text: &str) -> Result<BlockRef, Error> {
        let url = format!("{}/blocks/{}/children", self.base_url, page_id);
        let body = self.send(reqwest::Method::PATCH, &url, &append_block_payload(text))?;
        parse_appended_block_id(&body).map(BlockRef::Block)
    }

    fn create_child_page(&self, parent: &PageId, title: &str, text: &str) -> Result<BlockRef, Error> {
        let url = format!("{}/pages", self.base_url);
        let body = self.send(
            reqwest::Method::POST,
            &url,
            &create_page_payload(parent, title, text),
        )?;
        parse_page_id(&body).map(BlockRef::Page)
    }
}
