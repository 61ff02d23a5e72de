//! ドメイン型（Newtype）
//!
//! String を直接運ばず、意味のある型に包んで境界を明確にする。

use crate::error::Error;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// プロバイダ名（例: "openai", "gemini"）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for ProviderName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// モデル名（例: "gpt-3.5-turbo"）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for ModelName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// API キー
///
/// Debug / Display ではマスクする。値は `expose()` でのみ取り出す。
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Notion ページ ID（UUID, 8-4-4-4-12 の小文字に正規化済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageId(String);

fn page_id_re(pattern: &'static str, cell: &'static OnceLock<Option<Regex>>) -> Result<&'static Regex, Error> {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .ok_or_else(|| Error::system(format!("invalid page id pattern: {}", pattern)))
}

fn hyphenated_re() -> Result<&'static Regex, Error> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    page_id_re(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
        &RE,
    )
}

fn compact_re() -> Result<&'static Regex, Error> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    page_id_re(r"^[0-9a-fA-F]{32}$", &RE)
}

impl PageId {
    /// 文字列から PageId を作る
    ///
    /// 受け付ける形式:
    /// - `8-4-4-4-12`（ハイフン区切り）
    /// - 32 桁の 16 進（Notion のページ URL 末尾の形式）
    pub fn parse(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if hyphenated_re()?.is_match(s) {
            return Ok(Self(s.to_ascii_lowercase()));
        }
        if compact_re()?.is_match(s) {
            let h = s.to_ascii_lowercase();
            return Ok(Self(format!(
                "{}-{}-{}-{}-{}",
                &h[0..8],
                &h[8..12],
                &h[12..16],
                &h[16..20],
                &h[20..32]
            )));
        }
        Err(Error::config(format!(
            "'{}' is not a page id (expected UUID in 8-4-4-4-12 form)",
            s
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
