//! テスト用: 呼び出しを記録するポート実装


#[cfg(test)]
pub use doubles::{
    CallLog, MemoryLog, RecordingDocument, ScriptedConsole, ScriptedGateway, DEFAULT_HAIKU,
};
