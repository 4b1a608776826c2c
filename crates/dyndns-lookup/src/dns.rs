// # DNS Lookup
//
// Asks OpenDNS to reflect the caller's address:
//
// ```text
// dig +short myip.opendns.com @resolver1.opendns.com
// ```
//
// `dig` is run as a subprocess rather than speaking DNS ourselves; the
// resolver answers the special `myip.opendns.com` name with the source
// address of the query.

use dyndns_core::{Error, Result};
use tokio::process::Command;

/// Public resolver that answers `myip.opendns.com`
pub const OPENDNS_RESOLVER: &str = "resolver1.opendns.com";

/// DNS reflection lookup via `dig`
#[derive(Debug, Clone)]
pub struct DigLookup {
    program: String,
    args: Vec<String>,
}

impl DigLookup {
    /// `dig +short myip.opendns.com @resolver1.opendns.com`
    pub fn new() -> Self {
        Self::with_command(
            "dig",
            [
                "+short".to_string(),
                "myip.opendns.com".to_string(),
                format!("@{}", OPENDNS_RESOLVER),
            ],
        )
    }

    /// Run a different command instead of `dig`
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run the query and return the first trimmed line of output
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The first line, possibly empty
    /// - `Err(Error)`: The command could not be started or exited non-zero
    pub async fn lookup(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(Error::ip_source(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(first_line(&stdout))
    }
}

impl Default for DigLookup {
    fn default() -> Self {
        Self::new()
    }
}

fn first_line(output: &str) -> String {
    output
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}
