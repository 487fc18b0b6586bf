//! Registry access used by installation discovery.

use std::process::Stdio;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use crate::config::RegistryValue;

/// Reads string values from the host registry.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Returns the value's data, or `None` if the key or value is absent.
    async fn read_string(&self, value: &RegistryValue) -> Option<String>;
}

/// Registry source for hosts without a registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRegistry;

#[async_trait]
impl RegistrySource for NoRegistry {
    async fn read_string(&self, _value: &RegistryValue) -> Option<String> {
        None
    }
}

/// Reads values through the `reg query` command line tool.
///
/// On hosts other than Windows nothing is spawned and every lookup misses.
#[derive(Debug, Clone)]
pub struct RegQuerySource {
    timeout: Duration,
}

impl Default for RegQuerySource {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl RegQuerySource {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrySource for RegQuerySource {
    async fn read_string(&self, value: &RegistryValue) -> Option<String> {
        if !cfg!(windows) {
            return None;
        }

        let key = format!("{}\\{}", value.hive.as_str(), value.key);
        let output = Command::new("reg")
            .args(["query", &key, "/v", &value.value])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match timeout(self.timeout, output).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                debug!("reg query for {} failed to run: {}", value, e);
                return None;
            }
            Err(_) => {
                debug!("reg query for {} timed out", value);
                return None;
            }
        };

        if !output.status.success() {
            debug!("Registry value {} not present", value);
            return None;
        }

        parse_reg_query_output(&String::from_utf8_lossy(&output.stdout), &value.value)
    }
}

static REG_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(.+?)\s{2,}(REG_[A-Z_]+)(?:\s{2,}(.*))?$").expect("reg line pattern is valid")
});

/// Extract the data of `value_name` from `reg query` output.
///
/// Output lines look like `    InstallPath    REG_SZ    C:\Program Files\Steam`.
pub fn parse_reg_query_output(output: &str, value_name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let caps = REG_LINE_RE.captures(line.trim_end())?;
        let name = caps.get(1)?.as_str();
        if !name.eq_ignore_ascii_case(value_name) {
            return None;
        }
        let data = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();
        if data.is_empty() {
            None
        } else {
            Some(data.to_string())
        }
    })
}
