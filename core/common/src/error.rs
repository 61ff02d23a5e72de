//! エラーハンドリング
//!
//! 全レイヤーで共通の `Error` を使い、CLI 境界で終了コード（sysexits 準拠）に変換する。

/// 共通エラー型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    /// 設定不備（起動時に致命的）
    #[error("configuration error: {0}")]
    Config(String),
    /// アクション要求がスキーマを満たさない
    #[error("invalid '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// 言語モデルからコンテンツを得られなかった
    #[error("generation failed: {0}")]
    Gateway(String),
    /// ドキュメント API への書き込み失敗
    #[error("document API error: {0}")]
    DocumentApi(String),
    #[error("{0}")]
    Http(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn document_api(msg: impl Into<String>) -> Self {
        Self::DocumentApi(msg.into())
    }

    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// 終了コード（sysexits.h）
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Validation { .. } => 65,
            Self::Gateway(_) | Self::Http(_) => 69,
            Self::System(_) | Self::Json(_) => 70,
            Self::DocumentApi(_) | Self::Io(_) => 74,
            Self::Config(_) => 78,
        }
    }

    /// usage を併せて表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロバイダ層のエラーを「生成失敗」として扱う
    ///
    /// 既に Gateway / Config の場合はそのまま返す。
    pub fn into_gateway(self) -> Self {
        match self {
            Self::Gateway(_) | Self::Config(_) => self,
            other => Self::Gateway(other.to_string()),
        }
    }
}
