pub mod api;
pub mod docker_runner;
pub mod executor;
pub mod native_runner;

pub use crate::domain::model::{
    CommandSpec, CompressRequest, DecompressRequest, Mode, PreparedCommand, ProcessOutput,
};
pub use crate::domain::ports::{CommandExecutor, Runner};
pub use crate::utils::error::Result;
