/*!
 * translate-shell client.
 *
 * Runs the `trans` command once per attempt, feeding the text on stdin and
 * reading the translation from stdout.
 */

use async_trait::async_trait;
use log::trace;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{TranslationRequest, Translator};

/// Translator backed by an external translate-shell compatible command
#[derive(Debug, Clone)]
pub struct ShellTranslator {
    /// Executable name or path
    command: String,
}

impl ShellTranslator {
    /// Create a translator running the given command
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }

    /// The configured command
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Command line arguments for a request
    pub fn build_args(request: &TranslationRequest) -> Vec<String> {
        vec![
            "-e".to_string(),
            request.engine.clone(),
            "-s".to_string(),
            request.source_language.clone(),
            "-no-init".to_string(),
            "-no-autocorrect".to_string(),
            "-b".to_string(),
            format!(":{}", language_utils::to_engine_code(&request.target_language)),
        ]
    }

    /// Locate the command, either as a path or as an executable on PATH
    pub fn locate(&self) -> Result<PathBuf, which::Error> {
        which::which(&self.command)
    }
}

#[async_trait]
impl Translator for ShellTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let args = Self::build_args(request);
        trace!("Running {} {}", self.command, args.join(" "));

        // The C locale keeps the tool's own messages out of the output
        let mut child = Command::new(&self.command)
            .args(&args)
            .env("LC_ALL", "C")
            .env("LANG", "C")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProviderError::Spawn {
                command: self.command.clone(),
                message: e.to_string(),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin is judged by its exit status
            match stdin.write_all(request.text.as_bytes()).await {
                Ok(()) => stdin.shutdown().await?,
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e.into()),
            }
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }

    async fn check_available(&self) -> Result<(), ProviderError> {
        match self.locate() {
            Ok(path) => {
                trace!("Using translator at {}", path.display());
                Ok(())
            }
            Err(e) => Err(ProviderError::Unavailable(format!(
                "'{}' not found ({}); install translate-shell",
                self.command, e
            ))),
        }
    }
}
