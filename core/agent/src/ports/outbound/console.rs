//! コンソール入出力の Outbound ポート

use common::error::Error;

/// 対話ループと結果表示に使う入出力
pub trait Console: Send + Sync {
    /// プロンプトを表示して 1 行読む。EOF なら None
    fn read_line(&self, prompt: &str) -> Result<Option<String>, Error>;
    /// 標準出力へ 1 行
    fn print(&self, text: &str);
    /// 標準エラーへ 1 行
    fn eprint(&self, text: &str);
}
