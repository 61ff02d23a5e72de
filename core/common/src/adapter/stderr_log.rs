//! 人間向けログ（-v 指定時に stderr へ要点のみ出力）

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

const FIELDS_SUMMARY_MAX: usize = 400;

/// fields の要点だけを短い文字列にする（巨大化防止）
fn fields_summary(record: &LogRecord) -> String {
    let Some(fields) = record.fields.as_ref() else {
        return String::new();
    };
    let s = serde_json::to_string(fields).unwrap_or_default();
    if s.chars().count() <= FIELDS_SUMMARY_MAX {
        return s;
    }
    let truncated = s.chars().take(FIELDS_SUMMARY_MAX).collect::<String>();
    format!("{}... (len={})", truncated, s.len())
}

/// 1 行に整形する
pub fn format_line(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.level.as_str(), record.message);
    if let Some(ref layer) = record.layer {
        line.push_str(&format!(" layer={}", layer));
    }
    if let Some(ref kind) = record.kind {
        line.push_str(&format!(" kind={}", kind));
    }
    let summary = fields_summary(record);
    if !summary.is_empty() {
        line.push(' ');
        line.push_str(&summary);
    }
    line
}

/// stderr へ整形して出力する Log 実装
#[derive(Debug, Clone)]
pub struct StderrLog {
    min_level: LogLevel,
}

impl StderrLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        fn rank(l: LogLevel) -> u8 {
            match l {
                LogLevel::Error => 0,
                LogLevel::Warn => 1,
                LogLevel::Info => 2,
                LogLevel::Debug => 3,
            }
        }
        rank(level) <= rank(self.min_level)
    }
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if self.enabled(record.level) {
            eprintln!("{}", format_line(record));
        }
        Ok(())
    }
}

/// 複数の Log へ同じレコードを流す
pub struct TeeLog {
    sinks: Vec<Arc<dyn Log>>,
}

impl TeeLog {
    pub fn new(sinks: Vec<Arc<dyn Log>>) -> Self {
        Self { sinks }
    }
}

impl Log for TeeLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.log(record) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect(Mutex<Vec<String>>);

    impl Log for Collect {
        fn log(&self, record: &LogRecord) -> Result<(), Error> {
            self.0.lock().unwrap().push(record.message.clone());
            Ok(())
        }
    }

    #[test]
    fn test_format_line() {
        let rec = LogRecord::new(LogLevel::Info, "dispatch completed")
            .layer("usecase")
            .kind("dispatch")
            .field("action", "insert_haiku");
        let line = format_line(&rec);
        assert_eq!(
            line,
            r#"[info] dispatch completed layer=usecase kind=dispatch {"action":"insert_haiku"}"#
        );
    }

    #[test]
    fn test_format_line_truncates_large_fields() {
        let rec = LogRecord::new(LogLevel::Debug, "big").field("text", "x".repeat(1000));
        let line = format_line(&rec);
        assert!(line.contains("... (len="));
    }

    #[test]
    fn test_stderr_log_level_filter() {
        let log = StderrLog::new(LogLevel::Info);
        assert!(log.enabled(LogLevel::Error));
        assert!(log.enabled(LogLevel::Info));
        assert!(!log.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_tee_log_fans_out() {
        let a = Arc::new(Collect(Mutex::new(Vec::new())));
        let b = Arc::new(Collect(Mutex::new(Vec::new())));
        let sinks: Vec<Arc<dyn Log>> = vec![a.clone() as Arc<dyn Log>, b.clone() as Arc<dyn Log>];
        let tee = TeeLog::new(sinks);
        tee.log(&LogRecord::new(LogLevel::Info, "hello")).unwrap();
        assert_eq!(*a.0.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(*b.0.lock().unwrap(), vec!["hello".to_string()]);
    }
}
