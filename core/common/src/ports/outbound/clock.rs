//! 時刻取得 Outbound ポート

use chrono::NaiveDate;

/// 時刻取得の抽象
///
/// プロンプトに埋め込む「今日の日付」に使う。実装は StdClock やテスト用の固定時刻。
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
