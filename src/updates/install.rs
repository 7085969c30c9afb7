//! Install method detection.
//!
//! Works out how llmkube was installed so the update advisory can suggest
//! the right upgrade command.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Homebrew prefixes whose binaries resolve into a keg.
const HOMEBREW_PREFIXES: &[&str] = &[
    "/usr/local/Cellar/",
    "/opt/homebrew/Cellar/",
    "/home/linuxbrew/.linuxbrew/",
];

/// How llmkube was installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallMethod {
    /// Installed from the Homebrew tap
    Homebrew,
    /// Installed via cargo install
    Cargo,
    /// Downloaded release binary or local build
    Manual { path: PathBuf },
    /// The running executable could not be located
    Unknown,
}

impl InstallMethod {
    /// Command that upgrades this installation, if one is known.
    pub fn upgrade_hint(&self) -> Option<&'static str> {
        match self {
            InstallMethod::Homebrew => Some("brew upgrade llmkube"),
            InstallMethod::Cargo => Some("cargo install llmkube --force"),
            InstallMethod::Manual { .. } | InstallMethod::Unknown => None,
        }
    }

    /// Short name for logs and `version --json`.
    pub fn name(&self) -> &'static str {
        match self {
            InstallMethod::Homebrew => "homebrew",
            InstallMethod::Cargo => "cargo",
            InstallMethod::Manual { .. } => "manual",
            InstallMethod::Unknown => "unknown",
        }
    }
}

/// Detect how the running binary was installed.
pub fn detect_install_method() -> InstallMethod {
    let Ok(exe) = env::current_exe() else {
        return InstallMethod::Unknown;
    };
    // Homebrew links bin/llmkube into the Cellar, so look at the real path.
    let exe = fs::canonicalize(&exe).unwrap_or(exe);

    let cargo_home = env::var_os("CARGO_HOME").map(PathBuf::from);
    classify(&exe, dirs::home_dir().as_deref(), cargo_home.as_deref())
}

fn classify(exe: &Path, home: Option<&Path>, cargo_home: Option<&Path>) -> InstallMethod {
    let exe_str = exe.to_string_lossy();
    if HOMEBREW_PREFIXES
        .iter()
        .any(|prefix| exe_str.starts_with(prefix))
    {
        return InstallMethod::Homebrew;
    }

    let cargo_bins = cargo_home
        .map(|dir| dir.join("bin"))
        .into_iter()
        .chain(home.map(|dir| dir.join(".cargo").join("bin")));
    for bin in cargo_bins {
        if exe.starts_with(&bin) {
            return InstallMethod::Cargo;
        }
    }

    InstallMethod::Manual {
        path: exe.to_path_buf(),
    }
}
