//! 言語モデルが生成したコンテンツ

/// 生成結果（作成後は不変。挿入に一度だけ使って捨てる）
#[derive(Debug, PartialEq, Eq)]
pub struct GeneratedContent {
    text: String,
    source_model: String,
}

impl GeneratedContent {
    pub fn new(text: impl Into<String>, source_model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_model: source_model.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 例: "openai/gpt-3.5-turbo"
    pub fn source_model(&self) -> &str {
        &self.source_model
    }
}
