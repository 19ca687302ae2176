use crate::config::RunnerSettings;
use crate::core::docker_runner::DockerRunner;
use crate::core::executor::ProcessExecutor;
use crate::core::native_runner::NativeRunner;
use crate::core::{
    CommandExecutor, CompressRequest, DecompressRequest, Mode, PreparedCommand, Runner,
};
use crate::utils::error::Result;
use std::path::Path;

/// Mode used by [`compress`] and [`decompress`] when the caller has no
/// preference.
pub const DEFAULT_MODE: &str = "docker";

/// Builds the runner for `mode`. Only the exact strings `native` and
/// `docker` are accepted.
pub fn select_runner<E>(
    mode: &str,
    settings: &RunnerSettings,
    executor: E,
) -> Result<Box<dyn Runner>>
where
    E: CommandExecutor + 'static,
{
    let runner: Box<dyn Runner> = match mode.parse::<Mode>()? {
        Mode::Native => Box::new(NativeRunner::with_executor(
            settings.native.clone(),
            executor,
        )),
        Mode::Docker => Box::new(DockerRunner::with_executor(
            settings.docker.clone(),
            executor,
        )),
    };
    tracing::debug!("Selected {} runner", runner.mode());
    Ok(runner)
}

/// Settings plus executor; picks a runner per call.
#[derive(Debug, Clone, Default)]
pub struct GenieClient<E: CommandExecutor + Clone + 'static = ProcessExecutor> {
    settings: RunnerSettings,
    executor: E,
}

impl GenieClient<ProcessExecutor> {
    pub fn new(settings: RunnerSettings) -> Self {
        Self::with_executor(settings, ProcessExecutor::new())
    }
}

impl<E: CommandExecutor + Clone + 'static> GenieClient<E> {
    pub fn with_executor(settings: RunnerSettings, executor: E) -> Self {
        Self { settings, executor }
    }

    pub fn runner(&self, mode: &str) -> Result<Box<dyn Runner>> {
        select_runner(mode, &self.settings, self.executor.clone())
    }

    pub async fn compress(&self, request: &CompressRequest, mode: &str) -> Result<String> {
        let runner = self.runner(mode)?;
        tracing::info!(
            "Compressing {} -> {} ({} mode)",
            request.input.display(),
            request.output.display(),
            runner.mode()
        );
        runner.compress(request).await
    }

    pub async fn decompress(&self, request: &DecompressRequest, mode: &str) -> Result<String> {
        let runner = self.runner(mode)?;
        tracing::info!(
            "Decompressing {} -> {} ({} mode)",
            request.input.display(),
            request.output.display(),
            runner.mode()
        );
        runner.decompress(request).await
    }

    pub async fn version(&self, mode: &str) -> Result<String> {
        self.runner(mode)?.version().await
    }

    pub fn prepare_compress(&self, request: &CompressRequest, mode: &str) -> Result<PreparedCommand> {
        self.runner(mode)?.prepare_compress(request)
    }

    pub fn prepare_decompress(
        &self,
        request: &DecompressRequest,
        mode: &str,
    ) -> Result<PreparedCommand> {
        self.runner(mode)?.prepare_decompress(request)
    }

    pub fn prepare_version(&self, mode: &str) -> Result<PreparedCommand> {
        self.runner(mode)?.prepare_version()
    }
}

/// Compresses a FASTQ/SAM/BAM file into `.mgb` with default settings.
///
/// Returns the tool's captured stdout.
pub async fn compress(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    reference_path: Option<&Path>,
    mode: &str,
    low_latency: bool,
) -> Result<String> {
    let mut request = CompressRequest::new(input_path.as_ref(), output_path.as_ref())
        .with_low_latency(low_latency);
    request.reference = reference_path.map(Path::to_path_buf);

    GenieClient::new(RunnerSettings::default())
        .compress(&request, mode)
        .await
}

/// Decompresses an `.mgb` file with default settings.
pub async fn decompress(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    reference_path: Option<&Path>,
    mode: &str,
) -> Result<String> {
    let mut request = DecompressRequest::new(input_path.as_ref(), output_path.as_ref());
    request.reference = reference_path.map(Path::to_path_buf);

    GenieClient::new(RunnerSettings::default())
        .decompress(&request, mode)
        .await
}
