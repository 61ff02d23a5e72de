//! ModelGateway の標準実装（common::llm のドライバに委譲）

use crate::domain::{GeneratedContent, Prompt};
use crate::ports::outbound::ModelGateway;
use common::error::Error;
use common::llm::{create_driver, ModelConfig};
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// 設定された LLM プロバイダでテキストを生成する
///
/// 呼び出しごとに ModelConfig からドライバを作る。プロバイダ層の Http / Json エラーは
/// Error::Gateway に変換する。
pub struct StdModelGateway {
    log: Arc<dyn Log>,
}

impl StdModelGateway {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }
}

impl ModelGateway for StdModelGateway {
    fn generate(&self, prompt: &Prompt, config: &ModelConfig) -> Result<GeneratedContent, Error> {
        let source_model = format!("{}/{}", config.provider.as_str(), config.model);
        self.log.emit(
            LogRecord::new(LogLevel::Debug, "model request")
                .layer("adapter")
                .kind("llm")
                .field("model", source_model.as_str()),
        );

        let driver = create_driver(config).map_err(Error::into_gateway)?;
        let text = driver
            .query(&prompt.user, prompt.system.as_deref(), &config.generation_params())
            .map_err(Error::into_gateway)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(Error::gateway(format!("{}: empty response", source_model)));
        }
        self.log.emit(
            LogRecord::new(LogLevel::Debug, "model response")
                .layer("adapter")
                .kind("llm")
                .field("model", source_model.as_str())
                .field("chars", text.chars().count()),
        );
        Ok(GeneratedContent::new(text, source_model))
    }
}
