use crate::config::NativeSettings;
use crate::core::executor::{run_prepared, ProcessExecutor};
use crate::core::{
    CommandExecutor, CommandSpec, CompressRequest, DecompressRequest, Mode, PreparedCommand,
    Runner,
};
use crate::utils::error::{GenieError, Result};
use crate::utils::validation::{resolve_path, validate_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const TOOL: &str = "Genie";

/// Runs a locally installed Genie binary.
pub struct NativeRunner<E: CommandExecutor = ProcessExecutor> {
    settings: NativeSettings,
    executor: E,
}

impl NativeRunner<ProcessExecutor> {
    pub fn new(settings: NativeSettings) -> Self {
        Self::with_executor(settings, ProcessExecutor::new())
    }
}

impl<E: CommandExecutor> NativeRunner<E> {
    pub fn with_executor(settings: NativeSettings, executor: E) -> Self {
        Self { settings, executor }
    }

    fn resolve(field: &str, path: &Path) -> Result<(PathBuf, String)> {
        validate_path(field, path)?;
        let resolved = resolve_path(path)?;
        let text = resolved
            .to_str()
            .ok_or_else(|| GenieError::InvalidPath {
                field: field.to_string(),
                value: resolved.display().to_string(),
                reason: "Path is not valid UTF-8".to_string(),
            })?
            .to_string();
        Ok((resolved, text))
    }

    fn base_command(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<(CommandSpec, Option<PathBuf>)> {
        let (_, input) = Self::resolve("input", input)?;
        let (output_path, output) = Self::resolve("output", output)?;

        let command = CommandSpec::new(&self.settings.binary)
            .arg("run")
            .args(["-i", input.as_str(), "-o", output.as_str()]);
        Ok((command, output_path.parent().map(Path::to_path_buf)))
    }

    fn reference_args(reference: Option<&Path>) -> Result<Vec<String>> {
        match reference {
            Some(path) => {
                let (_, reference) = Self::resolve("reference", path)?;
                Ok(vec!["-r".to_string(), reference])
            }
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<E: CommandExecutor> Runner for NativeRunner<E> {
    fn mode(&self) -> Mode {
        Mode::Native
    }

    fn prepare_compress(&self, request: &CompressRequest) -> Result<PreparedCommand> {
        let (mut command, output_dir) = self.base_command(&request.input, &request.output)?;
        let reference = Self::reference_args(request.reference())?;

        command = command.args(["--qv", "none", "-f"]);
        if request.low_latency {
            command = command.arg("--low-latency");
        }

        Ok(PreparedCommand {
            command: command.args(reference),
            output_dir,
        })
    }

    fn prepare_decompress(&self, request: &DecompressRequest) -> Result<PreparedCommand> {
        let (command, output_dir) = self.base_command(&request.input, &request.output)?;
        let reference = Self::reference_args(request.reference())?;

        Ok(PreparedCommand {
            command: command.arg("-f").args(reference),
            output_dir,
        })
    }

    async fn compress(&self, request: &CompressRequest) -> Result<String> {
        let prepared = self.prepare_compress(request)?;
        run_prepared(&self.executor, TOOL, &prepared).await
    }

    async fn decompress(&self, request: &DecompressRequest) -> Result<String> {
        let prepared = self.prepare_decompress(request)?;
        run_prepared(&self.executor, TOOL, &prepared).await
    }

    async fn version(&self) -> Result<String> {
        let prepared = self.prepare_version()?;
        run_prepared(&self.executor, TOOL, &prepared).await
    }
}
