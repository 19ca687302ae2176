mod common;

use anyhow::Result;
use common::RecordingExecutor;
use genie_wrap::{
    select_runner, CompressRequest, DecompressRequest, GenieClient, GenieError, Mode,
    ProcessOutput, RunnerSettings,
};
use tempfile::TempDir;

fn client(executor: &RecordingExecutor) -> GenieClient<RecordingExecutor> {
    GenieClient::with_executor(RunnerSettings::default(), executor.clone())
}

#[tokio::test]
async fn test_native_compress_runs_once_and_returns_stdout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let dir = temp_dir.path().join("a");
    let executor = RecordingExecutor::succeeding("Compression successful\n");

    let request = CompressRequest::new(dir.join("in.fastq"), dir.join("out.mgb"));
    let output = client(&executor).compress(&request, "native").await?;

    assert_eq!(output, "Compression successful\n");

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    let command = &calls[0];
    assert_eq!(command.program, "genie");
    assert!(!command.has_arg("-r"));
    assert!(!command.has_arg("--low-latency"));
    assert!(command.has_arg("--qv"));
    assert!(command.has_arg("-f"));

    // Output directory is created before the tool runs.
    assert!(dir.is_dir());
    Ok(())
}

#[tokio::test]
async fn test_native_compress_with_reference_and_low_latency() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let executor = RecordingExecutor::succeeding("Reference compression successful");

    let request = CompressRequest::new(
        temp_dir.path().join("in.fastq"),
        temp_dir.path().join("out.mgb"),
    )
    .with_reference(temp_dir.path().join("ref.fasta"))
    .with_low_latency(true);
    let output = client(&executor).compress(&request, "native").await?;

    assert_eq!(output, "Reference compression successful");
    let command = &executor.calls()[0];
    assert!(command.has_arg("--low-latency"));
    let reference = std::fs::canonicalize(temp_dir.path())?.join("ref.fasta");
    assert_eq!(command.flag_value("-r"), reference.to_str());
    Ok(())
}

#[tokio::test]
async fn test_native_decompress_never_drops_quality_values() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let executor = RecordingExecutor::succeeding("Decompression successful");

    let request = DecompressRequest::new(
        temp_dir.path().join("in.mgb"),
        temp_dir.path().join("out").join("reads.fastq"),
    );
    let output = client(&executor).decompress(&request, "native").await?;

    assert_eq!(output, "Decompression successful");
    let command = &executor.calls()[0];
    assert!(!command.has_arg("--qv"));
    assert!(!command.has_arg("--low-latency"));
    assert!(command.has_arg("-f"));
    assert!(temp_dir.path().join("out").is_dir());
    Ok(())
}

#[tokio::test]
async fn test_invalid_modes_never_reach_the_executor() {
    let executor = RecordingExecutor::succeeding("unused");
    let client = client(&executor);

    for mode in ["invalid", "Native", "DOCKER", "native ", ""] {
        let request = CompressRequest::new("input.fastq", "output.mgb");
        let err = client.compress(&request, mode).await.unwrap_err();
        assert!(matches!(err, GenieError::InvalidMode { .. }));
        assert!(err.to_string().contains(&format!("'{}'", mode)));

        let request = DecompressRequest::new("input.mgb", "output.fastq");
        let err = client.decompress(&request, mode).await.unwrap_err();
        assert!(err.to_string().contains("Must be 'native' or 'docker'."));
    }

    assert!(executor.calls().is_empty());
}

#[test]
fn test_select_runner_is_case_sensitive() {
    let settings = RunnerSettings::default();
    let executor = RecordingExecutor::succeeding("");

    assert_eq!(
        select_runner("native", &settings, executor.clone())
            .map(|r| r.mode())
            .ok(),
        Some(Mode::Native)
    );
    let err = select_runner("Native", &settings, executor).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Unknown mode 'Native'. Must be 'native' or 'docker'."
    );
}

#[tokio::test]
async fn test_zero_exit_with_error_marker_is_a_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let executor = RecordingExecutor::new(
        ProcessOutput::ok("some progress").with_stderr("[ERROR] Unsupported input format"),
    );

    let request = CompressRequest::new(
        temp_dir.path().join("in.fastq"),
        temp_dir.path().join("out.mgb"),
    );
    let err = client(&executor)
        .compress(&request, "native")
        .await
        .unwrap_err();

    match err {
        GenieError::ProcessFailed { stderr, .. } => {
            assert!(stderr.contains("Unsupported input format"))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(executor.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_non_zero_exit_is_a_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let executor = RecordingExecutor::new(ProcessOutput::failed(1, "segmentation fault"));

    let request = DecompressRequest::new(
        temp_dir.path().join("in.mgb"),
        temp_dir.path().join("out.fastq"),
    );
    let err = client(&executor)
        .decompress(&request, "native")
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("segmentation fault"));
    Ok(())
}

#[tokio::test]
async fn test_version_is_docker_only() {
    let executor = RecordingExecutor::succeeding("  Genie usage: genie <command>  \n");
    let client = client(&executor);

    assert!(matches!(
        client.version("native").await,
        Err(GenieError::Unsupported { .. })
    ));
    assert!(executor.calls().is_empty());

    let help = client.version("docker").await.unwrap();
    assert_eq!(help, "Genie usage: genie <command>");
    assert_eq!(executor.calls().len(), 1);
}
