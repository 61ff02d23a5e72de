//! 書き込み先ドキュメントの型

use common::domain::PageId;

/// 挿入先（起動時に決まり、実行中は変わらない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTarget {
    pub page_id: PageId,
}

impl DocumentTarget {
    pub fn new(page_id: PageId) -> Self {
        Self { page_id }
    }
}

/// ドキュメント API が作成したブロック / ページ
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRef {
    Block(String),
    Page(String),
}

impl BlockRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Block(id) | Self::Page(id) => id,
        }
    }
}

impl std::fmt::Display for BlockRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block(id) => write!(f, "block {}", id),
            Self::Page(id) => write!(f, "page {}", id),
        }
    }
}
