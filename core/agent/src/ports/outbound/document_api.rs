//! ドキュメント API クライアントの Outbound ポート

use crate::domain::BlockRef;
use common::domain::PageId;
use common::error::Error;

/// ページへの書き込み（失敗は Error::DocumentApi）
pub trait DocumentApi: Send + Sync {
    /// ページ末尾にテキストのブロックを 1 つ追加する
    fn append_block(&self, page_id: &PageId, text: &str) -> Result<BlockRef, Error>;

    /// 親ページの下にタイトル付きの子ページを作り、本文にテキストを入れる
    fn create_child_page(&self, parent: &PageId, title: &str, text: &str) -> Result<BlockRef, Error>;
}
