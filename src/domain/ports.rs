use crate::domain::model::{
    CommandSpec, CompressRequest, DecompressRequest, Mode, PreparedCommand, ProcessOutput,
};
use crate::utils::error::{GenieError, Result};
use async_trait::async_trait;

/// Runs an argv-style command to completion and captures its output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command: &CommandSpec) -> Result<ProcessOutput>;
}

/// One way of invoking Genie.
#[async_trait]
pub trait Runner: Send + Sync {
    fn mode(&self) -> Mode;

    fn prepare_compress(&self, request: &CompressRequest) -> Result<PreparedCommand>;

    fn prepare_decompress(&self, request: &DecompressRequest) -> Result<PreparedCommand>;

    fn prepare_version(&self) -> Result<PreparedCommand> {
        Err(GenieError::Unsupported {
            mode: self.mode().to_string(),
            operation: "version".to_string(),
        })
    }

    async fn compress(&self, request: &CompressRequest) -> Result<String>;

    async fn decompress(&self, request: &DecompressRequest) -> Result<String>;

    async fn version(&self) -> Result<String>;
}
