use crate::config::DockerSettings;
use crate::core::executor::{run_prepared, ProcessExecutor};
use crate::core::{
    CommandExecutor, CommandSpec, CompressRequest, DecompressRequest, Mode, PreparedCommand,
    Runner,
};
use crate::utils::error::{GenieError, Result};
use crate::utils::validation::{file_name, resolve_shared_parent, validate_path};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

const TOOL: &str = "Genie Docker";

/// Runs Genie inside a container, bind-mounting the one directory that holds
/// every input and output file.
pub struct DockerRunner<E: CommandExecutor = ProcessExecutor> {
    settings: DockerSettings,
    executor: E,
}

/// Resolved file names inside the mount plus the host directory to bind.
struct MountedFiles {
    bind_dir: PathBuf,
    input: String,
    output: String,
    reference: Option<String>,
}

impl DockerRunner<ProcessExecutor> {
    pub fn new(settings: DockerSettings) -> Self {
        Self::with_executor(settings, ProcessExecutor::new())
    }
}

impl<E: CommandExecutor> DockerRunner<E> {
    pub fn with_executor(settings: DockerSettings, executor: E) -> Self {
        Self { settings, executor }
    }

    fn mount(
        &self,
        input: &Path,
        output: &Path,
        reference: Option<&Path>,
    ) -> Result<MountedFiles> {
        validate_path("input", input)?;
        validate_path("output", output)?;
        if let Some(reference) = reference {
            validate_path("reference", reference)?;
        }

        let mut paths = vec![input, output];
        paths.extend(reference);
        let (resolved, bind_dir) = resolve_shared_parent(&paths)?;
        tracing::debug!("Docker bind directory: {}", bind_dir.display());

        let reference = match resolved.get(2) {
            Some(path) => Some(self.in_container(&file_name("reference", path)?)),
            None => None,
        };

        Ok(MountedFiles {
            input: self.in_container(&file_name("input", &resolved[0])?),
            output: self.in_container(&file_name("output", &resolved[1])?),
            reference,
            bind_dir,
        })
    }

    fn in_container(&self, name: &str) -> String {
        format!("{}/{}", self.settings.mount_point.trim_end_matches('/'), name)
    }

    fn base_command(&self, files: &MountedFiles) -> Result<CommandSpec> {
        let bind_dir = files.bind_dir.to_str().ok_or_else(|| {
            GenieError::InvalidPath {
                field: "bind directory".to_string(),
                value: files.bind_dir.display().to_string(),
                reason: "Path is not valid UTF-8".to_string(),
            }
        })?;

        Ok(CommandSpec::new(&self.settings.binary)
            .args(["run", "--rm", "-v"])
            .arg(format!("{}:{}", bind_dir, self.settings.mount_point))
            .arg(&self.settings.image)
            .arg("run")
            .args(["-i", files.input.as_str(), "-o", files.output.as_str()]))
    }
}

#[async_trait]
impl<E: CommandExecutor> Runner for DockerRunner<E> {
    fn mode(&self) -> Mode {
        Mode::Docker
    }

    fn prepare_compress(&self, request: &CompressRequest) -> Result<PreparedCommand> {
        let files = self.mount(&request.input, &request.output, request.reference())?;

        // Quality values are always dropped and existing outputs overwritten.
        let mut command = self.base_command(&files)?.args(["--qv", "none", "-f"]);
        if request.low_latency {
            command = command.arg("--low-latency");
        }
        if let Some(reference) = &files.reference {
            command = command.args(["-r", reference.as_str()]);
        }

        Ok(PreparedCommand {
            command,
            output_dir: Some(files.bind_dir),
        })
    }

    fn prepare_decompress(&self, request: &DecompressRequest) -> Result<PreparedCommand> {
        let files = self.mount(&request.input, &request.output, request.reference())?;

        let mut command = self.base_command(&files)?.arg("-f");
        if let Some(reference) = &files.reference {
            command = command.args(["-r", reference.as_str()]);
        }

        Ok(PreparedCommand {
            command,
            output_dir: Some(files.bind_dir),
        })
    }

    /// Genie has no version subcommand; `help` is the closest thing.
    fn prepare_version(&self) -> Result<PreparedCommand> {
        Ok(PreparedCommand {
            command: CommandSpec::new(&self.settings.binary)
                .args(["run", "--rm"])
                .arg(&self.settings.image)
                .arg("help"),
            output_dir: None,
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
        let output = run_prepared(&self.executor, TOOL, &prepared).await?;
        Ok(output.trim().to_string())
    }
}
