pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliCommand, CliConfig};

pub use config::{DockerSettings, GenieConfig, NativeSettings, RunnerSettings};
pub use crate::core::api::{compress, decompress, select_runner, GenieClient, DEFAULT_MODE};
pub use crate::core::docker_runner::DockerRunner;
pub use crate::core::executor::ProcessExecutor;
pub use crate::core::native_runner::NativeRunner;
pub use crate::core::{
    CommandExecutor, CommandSpec, CompressRequest, DecompressRequest, Mode, PreparedCommand,
    ProcessOutput, Runner,
};
pub use utils::error::{GenieError, Result};
