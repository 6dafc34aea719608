//! Command fetcher: run an external program and take its stdout.
//!
//! Lets the secret come from any provider CLI without linking its SDK,
//! e.g. `aws secretsmanager get-secret-value --secret-id {name}
//! --query SecretString --output text`.

use std::process::Command;

use crate::errors::{CredCycleError, Result};

use super::SecretFetcher;

/// Placeholder in `args` replaced with the secret name.
const NAME_PLACEHOLDER: &str = "{name}";

/// Runs `program args...` and returns its trimmed stdout.
#[derive(Debug, Clone)]
pub struct CommandFetcher {
    program: String,
    args: Vec<String>,
}

impl CommandFetcher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn build(&self, name: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(|a| a.replace(NAME_PLACEHOLDER, name)));
        cmd
    }
}

impl SecretFetcher for CommandFetcher {
    fn fetch(&self, name: &str) -> Result<String> {
        let output = self
            .build(name)
            .output()
            .map_err(|e| CredCycleError::fetch(name, format!("spawn {}: {e}", self.program)))?;

        if !output.status.success() {
            // stderr may echo request details but never the secret itself.
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CredCycleError::fetch(
                name,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            CredCycleError::fetch(name, format!("{} printed non UTF-8 output", self.program))
        })?;

        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn substitutes_name_and_trims_newline() {
        let fetcher = CommandFetcher::new("echo", vec!["secret-for-{name}".into()]);
        assert_eq!(fetcher.fetch("db").unwrap(), "secret-for-db");
    }

    #[test]
    fn non_zero_exit_is_a_fetch_error() {
        let fetcher = CommandFetcher::new("false", vec![]);
        let err = fetcher.fetch("db").unwrap_err();
        assert!(err.is_fetch());
    }

    #[test]
    fn missing_program_is_a_fetch_error() {
        let fetcher = CommandFetcher::new("credcycle-no-such-program", vec![]);
        assert!(fetcher.fetch("db").unwrap_err().is_fetch());
    }
}
