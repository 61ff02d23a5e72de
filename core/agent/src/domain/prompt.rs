//! プロンプトのテンプレート

use chrono::NaiveDate;

/// 言語モデルに送るプロンプト（system + user）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn new(system: Option<String>, user: impl Into<String>) -> Self {
        Self {
            system,
            user: user.into(),
        }
    }
}

/// 俳句生成用のシステム指示
pub fn haiku_system_instruction(today: NaiveDate) -> String {
    format!(
        "You are an assistant that creates haikus. The current date is: {}",
        today.format("%Y-%m-%d")
    )
}

/// 俳句生成プロンプト（topic を固定テンプレートに埋め込む）
pub fn haiku_prompt(topic: &str, today: NaiveDate) -> Prompt {
    Prompt::new(
        Some(haiku_system_instruction(today)),
        format!(
            "Write a haiku about {}. Reply with the three lines of the haiku only, \
             without a title, quotes or any commentary.",
            topic.trim()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haiku_prompt_embeds_topic_and_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let p = haiku_prompt(" cats ", today);
        assert!(p.user.starts_with("Write a haiku about cats."));
        assert_eq!(
            p.system.as_deref(),
            Some("You are an assistant that creates haikus. The current date is: 2026-10-16")
        );
    }
}
