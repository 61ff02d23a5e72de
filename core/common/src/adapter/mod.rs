//! アダプター（外界の I/O を trait で抽象化した実装）
//!
//! 実装は標準実装（Std*）やテスト用の固定実装を注入する。

pub mod file_json_log;
pub mod stderr_log;
pub mod std_clock;
pub mod std_env_resolver;

pub use file_json_log::{FileJsonLog, NoopLog};
pub use stderr_log::{StderrLog, TeeLog};
pub use std_clock::{FixedClock, StdClock};
pub use std_env_resolver::{MapEnvResolver, StdEnvResolver};
