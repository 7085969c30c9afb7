//! Version command implementation.
//!
//! The `llmkube version` command prints build information and, with
//! `--check`, asks the release feed whether a newer version exists.

use chrono::Utc;
use serde::Serialize;
use std::io::Write;

use crate::cli::args::VersionArgs;
use crate::error::{LlmkubeError, Result};
use crate::updates::fetch::RELEASES_PAGE_URL;
use crate::updates::{detect_install_method, UpdateSettings, UpdateStatus, VERSION};

use super::dispatcher::{Command, CommandResult};

/// Version details shown by `llmkube version`.
#[derive(Debug, Serialize)]
struct VersionReport {
    version: &'static str,
    os: &'static str,
    arch: &'static str,
    install_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_available: Option<bool>,
}

/// The version command implementation.
pub struct VersionCommand {
    args: VersionArgs,
    settings: UpdateSettings,
}

impl VersionCommand {
    /// Create a new version command.
    pub fn new(args: VersionArgs, settings: UpdateSettings) -> Self {
        Self { args, settings }
    }

    fn check(&self) -> Result<UpdateStatus> {
        let advisor = self.settings.advisor()?;
        advisor
            .check_fresh(VERSION, Utc::now())
            .map_err(|e| LlmkubeError::UpdateCheckFailed {
                message: format!("{:#}", e),
            })
    }
}

impl Command for VersionCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let status = if self.args.check {
            Some(self.check()?)
        } else {
            None
        };

        let install = detect_install_method();
        let report = VersionReport {
            version: VERSION,
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            install_method: install.name(),
            latest: status.as_ref().map(|s| s.latest.clone()),
            update_available: status.as_ref().map(|s| s.update_available),
        };

        if self.args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            return Ok(CommandResult::success());
        }

        writeln!(out, "llmkube {}", report.version)?;
        writeln!(out, "  Platform: {}/{}", report.os, report.arch)?;
        writeln!(out, "  Installed via: {}", report.install_method)?;

        if let Some(status) = status {
            if status.update_available {
                writeln!(out, "  Update available: {}", status.latest)?;
                match install.upgrade_hint() {
                    Some(command) => writeln!(out, "  To upgrade, run: {}", command)?,
                    None => writeln!(out, "  Download: {}", RELEASES_PAGE_URL)?,
                }
            } else {
                writeln!(out, "  Up to date (latest release: {})", status.latest)?;
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn settings_for(server: &MockServer, temp: &TempDir) -> UpdateSettings {
        UpdateSettings {
            enabled: true,
            url: server.url("/releases/latest"),
            cache_path: Some(temp.path().join("version_cache.json")),
        }
    }

    fn run(cmd: &VersionCommand) -> (Result<CommandResult>, String) {
        let mut out = Vec::new();
        let result = cmd.execute(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_version_without_network() {
        let cmd = VersionCommand::new(VersionArgs::default(), UpdateSettings::default());
        let (result, output) = run(&cmd);

        assert_eq!(result.unwrap().exit_code, 0);
        assert!(output.contains(VERSION));
        assert!(output.contains(std::env::consts::OS));
    }

    #[test]
    fn json_output_is_parseable() {
        let args = VersionArgs {
            json: true,
            ..Default::default()
        };
        let (_, output) = run(&VersionCommand::new(args, UpdateSettings::default()));

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["version"], VERSION);
        assert!(json.get("latest").is_none());
    }

    #[test]
    fn check_reports_newer_release() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(r#"{"tag_name": "v999.0.0"}"#);
        });
        let args = VersionArgs {
            check: true,
            json: true,
        };

        let (result, output) = run(&VersionCommand::new(args, settings_for(&server, &temp)));

        assert!(result.is_ok());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["latest"], "v999.0.0");
        assert_eq!(json["update_available"], true);
    }

    #[test]
    fn check_reports_up_to_date() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(r#"{"tag_name": "v0.0.1"}"#);
        });
        let args = VersionArgs {
            check: true,
            json: false,
        };

        let (_, output) = run(&VersionCommand::new(args, settings_for(&server, &temp)));

        assert!(output.contains("Up to date"));
    }

    #[test]
    fn check_ignores_fresh_cache() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(200).body(r#"{"tag_name": "v0.0.1"}"#);
        });
        let settings = settings_for(&server, &temp);
        crate::updates::CacheStore::new(temp.path().join("version_cache.json"))
            .write(&crate::updates::CacheRecord::new("v5.0.0", Utc::now()))
            .unwrap();
        let args = VersionArgs {
            check: true,
            json: false,
        };

        let (result, output) = run(&VersionCommand::new(args, settings));

        assert!(result.is_ok());
        assert!(output.contains("Up to date (latest release: v0.0.1)"));
        mock.assert_calls(1);
    }

    #[test]
    fn check_failure_is_an_error() {
        let server = MockServer::start();
        let temp = TempDir::new().unwrap();
        server.mock(|when, then| {
            when.method(GET).path("/releases/latest");
            then.status(500);
        });
        let args = VersionArgs {
            check: true,
            json: false,
        };

        let (result, _) = run(&VersionCommand::new(args, settings_for(&server, &temp)));

        assert!(matches!(
            result,
            Err(LlmkubeError::UpdateCheckFailed { .. })
        ));
    }
}
