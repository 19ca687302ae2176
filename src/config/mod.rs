pub mod toml_config;

pub use toml_config::{DockerSettings, GenieConfig, NativeSettings, RunnerSettings};

#[cfg(feature = "cli")]
use crate::core::api::GenieClient;
#[cfg(feature = "cli")]
use crate::core::{CommandExecutor, CompressRequest, DecompressRequest, PreparedCommand};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::logger::LogFormat;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "genie-wrap")]
#[command(about = "Compress and decompress genomic data with Genie (native or Docker)")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Execution mode: "native" or "docker"
    #[arg(long)]
    pub mode: Option<String>,

    /// Override the Docker image
    #[arg(long)]
    pub image: Option<String>,

    /// Override the native Genie binary
    #[arg(long)]
    pub genie_binary: Option<String>,

    /// Print the command that would run, as JSON, without running it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Compress a FASTQ/SAM/BAM file into .mgb
    Compress {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Reference FASTA for reference-based encoding
        #[arg(short, long)]
        reference: Option<PathBuf>,

        #[arg(long)]
        low_latency: bool,
    },
    /// Decompress an .mgb file
    Decompress {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long)]
        reference: Option<PathBuf>,
    },
    /// Show Genie's help text (docker mode)
    Version,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Applies command-line overrides on top of a loaded file.
    pub fn apply_overrides(&self, config: &mut GenieConfig) {
        if let Some(mode) = &self.mode {
            config.runner.mode = Some(mode.clone());
        }
        if let Some(image) = &self.image {
            config.settings.docker.image = image.clone();
        }
        if let Some(binary) = &self.genie_binary {
            config.settings.native.binary = binary.clone();
        }
    }
}

#[cfg(feature = "cli")]
enum Request {
    Compress(CompressRequest),
    Decompress(DecompressRequest),
    Version,
}

#[cfg(feature = "cli")]
impl CliCommand {
    fn request(&self) -> Request {
        match self {
            CliCommand::Compress {
                input,
                output,
                reference,
                low_latency,
            } => Request::Compress(CompressRequest {
                input: input.clone(),
                output: output.clone(),
                reference: reference.clone(),
                low_latency: *low_latency,
            }),
            CliCommand::Decompress {
                input,
                output,
                reference,
            } => Request::Decompress(DecompressRequest {
                input: input.clone(),
                output: output.clone(),
                reference: reference.clone(),
            }),
            CliCommand::Version => Request::Version,
        }
    }

    /// Builds the invocation without running it.
    pub fn prepare<E>(&self, client: &GenieClient<E>, mode: &str) -> Result<PreparedCommand>
    where
        E: CommandExecutor + Clone + 'static,
    {
        match self.request() {
            Request::Compress(request) => client.prepare_compress(&request, mode),
            Request::Decompress(request) => client.prepare_decompress(&request, mode),
            Request::Version => client.prepare_version(mode),
        }
    }

    /// `--dry-run` output: the prepared invocation as pretty JSON.
    pub fn dry_run<E>(&self, client: &GenieClient<E>, mode: &str) -> Result<String>
    where
        E: CommandExecutor + Clone + 'static,
    {
        let prepared = self.prepare(client, mode)?;
        Ok(serde_json::to_string_pretty(&prepared)?)
    }

    /// Runs the command and returns the tool's stdout.
    pub async fn run<E>(&self, client: &GenieClient<E>, mode: &str) -> Result<String>
    where
        E: CommandExecutor + Clone + 'static,
    {
        match self.request() {
            Request::Compress(request) => client.compress(&request, mode).await,
            Request::Decompress(request) => client.decompress(&request, mode).await,
            Request::Version => client.version(mode).await,
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::{CommandSpec, ProcessOutput};
    use crate::utils::error::GenieError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct CannedExecutor {
        calls: Arc<Mutex<Vec<CommandSpec>>>,
        response: ProcessOutput,
    }

    impl CannedExecutor {
        fn new(response: ProcessOutput) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                response,
            }
        }
    }

    #[async_trait]
    impl CommandExecutor for CannedExecutor {
        async fn execute(&self, command: &CommandSpec) -> Result<ProcessOutput> {
            self.calls.lock().unwrap().push(command.clone());
            Ok(self.response.clone())
        }
    }

    fn command(args: &[&str]) -> CliCommand {
        let mut argv = vec!["genie-wrap"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_parse_compress_command() {
        let cli = CliConfig::try_parse_from([
            "genie-wrap",
            "--mode",
            "native",
            "compress",
            "-i",
            "in.fastq",
            "-o",
            "out.mgb",
            "--low-latency",
        ])
        .unwrap();

        assert_eq!(cli.mode.as_deref(), Some("native"));
        match cli.command {
            CliCommand::Compress {
                input,
                reference,
                low_latency,
                ..
            } => {
                assert_eq!(input, PathBuf::from("in.fastq"));
                assert!(reference.is_none());
                assert!(low_latency);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_overrides_win_over_file() {
        let cli = CliConfig::try_parse_from([
            "genie-wrap",
            "--mode",
            "native",
            "--image",
            "local/genie",
            "--genie-binary",
            "/usr/local/bin/genie",
            "version",
        ])
        .unwrap();

        let mut config = GenieConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.mode(), "native");
        assert_eq!(config.settings.docker.image, "local/genie");
        assert_eq!(config.settings.native.binary, "/usr/local/bin/genie");
    }

    #[test]
    fn test_mode_is_not_validated_by_parser() {
        // Mode errors are reported by the runner selector with its own message.
        let cli = CliConfig::try_parse_from(["genie-wrap", "--mode", "Native", "version"]).unwrap();
        assert_eq!(cli.mode.as_deref(), Some("Native"));
    }

    #[test]
    fn test_dry_run_prints_prepared_command_as_json() {
        let client = GenieClient::new(RunnerSettings::default());
        let cmd = command(&["compress", "-i", "/data/in.fastq", "-o", "/out/reads.mgb"]);

        let json = cmd.dry_run(&client, "native").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"]["program"], "genie");
        assert_eq!(
            value["command"]["args"],
            serde_json::json!([
                "run", "-i", "/data/in.fastq", "-o", "/out/reads.mgb", "--qv", "none", "-f"
            ])
        );
        assert_eq!(value["output_dir"], "/out");
    }

    #[test]
    fn test_dry_run_version_has_no_output_dir() {
        let client = GenieClient::new(RunnerSettings::default());
        let json = command(&["version"]).dry_run(&client, "docker").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["command"]["program"], "docker");
        assert_eq!(
            value["command"]["args"],
            serde_json::json!(["run", "--rm", "muefab/genie:latest", "help"])
        );
        assert!(value["output_dir"].is_null());
    }

    #[test]
    fn test_dry_run_invalid_mode_exits_with_one() {
        let client = GenieClient::new(RunnerSettings::default());
        let err = command(&["version"]).dry_run(&client, "Docker").unwrap_err();
        assert!(matches!(err, GenieError::InvalidMode { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_run_returns_tool_stdout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("reads.mgb");
        let output = temp_dir.path().join("out").join("reads.fastq");
        let executor = CannedExecutor::new(ProcessOutput::ok("decoded\n"));
        let client = GenieClient::with_executor(RunnerSettings::default(), executor.clone());

        let cmd = command(&[
            "decompress",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let stdout = cmd.run(&client, "native").await.unwrap();

        assert_eq!(stdout, "decoded\n");
        assert!(output.parent().unwrap().is_dir());
        let calls = executor.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "genie");
    }

    #[tokio::test]
    async fn test_run_process_failure_exits_with_two() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.fastq");
        let output = temp_dir.path().join("out.mgb");
        let executor = CannedExecutor::new(ProcessOutput::failed(1, "cannot open input"));
        let client = GenieClient::with_executor(RunnerSettings::default(), executor);

        let cmd = command(&[
            "compress",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let err = cmd.run(&client, "native").await.unwrap_err();

        assert!(matches!(err, GenieError::ProcessFailed { .. }));
        assert_eq!(err.exit_code(), 2);
        assert!(err.report().contains("cannot open input"));
    }

    #[tokio::test]
    async fn test_run_missing_binary_exits_with_three() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("in.fastq");
        let output = temp_dir.path().join("out.mgb");
        let mut settings = RunnerSettings::default();
        settings.native.binary = "genie-wrap-no-such-binary".to_string();
        let client = GenieClient::new(settings);

        let cmd = command(&[
            "compress",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        let err = cmd.run(&client, "native").await.unwrap_err();

        assert!(matches!(err, GenieError::Spawn { .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_native_version_is_unsupported() {
        let executor = CannedExecutor::new(ProcessOutput::ok("help"));
        let client = GenieClient::with_executor(RunnerSettings::default(), executor.clone());

        let err = command(&["version"]).run(&client, "native").await.unwrap_err();

        assert!(matches!(err, GenieError::Unsupported { .. }));
        assert!(executor.calls.lock().unwrap().is_empty());
    }
}
