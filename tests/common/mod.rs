use async_trait::async_trait;
use genie_wrap::{CommandExecutor, CommandSpec, ProcessOutput, Result};
use std::sync::{Arc, Mutex};

/// Records every command it is asked to run and answers with a canned output.
#[derive(Clone)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<CommandSpec>>>,
    response: ProcessOutput,
}

impl RecordingExecutor {
    pub fn new(response: ProcessOutput) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response,
        }
    }

    pub fn succeeding(stdout: &str) -> Self {
        Self::new(ProcessOutput::ok(stdout))
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for RecordingExecutor {
    async fn execute(&self, command: &CommandSpec) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.clone());
        Ok(self.response.clone())
    }
}
