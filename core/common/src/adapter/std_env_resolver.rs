//! 標準環境変数解決実装（std::env を委譲）と、テスト用のマップ実装

use crate::error::Error;
use crate::ports::outbound::EnvResolver;
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// 標準環境変数解決実装
#[derive(Debug, Clone, Default)]
pub struct StdEnvResolver;

impl StdEnvResolver {
    /// カレントディレクトリの .env を読み込んでから使う。
    /// 既に設定されている環境変数は上書きしない。.env が無ければ何もしない。
    /// 読めない・書式が壊れている .env は Error::Config。
    pub fn with_dotenv() -> Result<Self, Error> {
        dotenv_result(dotenvy::dotenv().map(|_| ()))
    }

    /// 指定パスの .env を読み込む（存在しなければ何もしない）
    pub fn with_dotenv_path(path: &Path) -> Result<Self, Error> {
        dotenv_result(dotenvy::from_path(path))
    }
}

fn dotenv_result(result: Result<(), dotenvy::Error>) -> Result<StdEnvResolver, Error> {
    match result {
        Ok(()) => Ok(StdEnvResolver),
        Err(e) if e.not_found() => Ok(StdEnvResolver),
        Err(e) => Err(Error::config(format!(".env: {}", e))),
    }
}

impl EnvResolver for StdEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        env::var(name).ok().filter(|s| !s.trim().is_empty())
    }
}

/// 固定のマップから値を返す EnvResolver（テスト・埋め込み用）
#[derive(Debug, Clone, Default)]
pub struct MapEnvResolver {
    vars: HashMap<String, String>,
}

impl MapEnvResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvResolver {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |acc, (k, v)| acc.set(k, v))
    }
}

impl EnvResolver for MapEnvResolver {
    fn var(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .filter(|s| !s.trim().is_empty())
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_resolver_blank_is_unset() {
        let env = MapEnvResolver::from([("A", "1"), ("B", "  ")]);
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("B"), None);
        assert_eq!(env.var("C"), None);
    }

    #[test]
    fn test_dotenv_does_not_override_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "COMMON_TEST_DOTENV_ONLY=from_file\nPATH=overridden\n").unwrap();
        let env = StdEnvResolver::with_dotenv_path(&path).unwrap();
        assert_eq!(env.var("COMMON_TEST_DOTENV_ONLY").as_deref(), Some("from_file"));
        assert_ne!(env.var("PATH").as_deref(), Some("overridden"));
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(StdEnvResolver::with_dotenv_path(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "COMMON_TEST_BROKEN_FIRST=1\nTHIS LINE IS BROKEN\nCOMMON_TEST_BROKEN_AFTER=2\n",
        )
        .unwrap();
        let err = StdEnvResolver::with_dotenv_path(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
        assert!(err.to_string().contains(".env"));
        assert_eq!(err.exit_code(), 78);
    }
}
