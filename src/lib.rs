//! llmkube - Deploy and serve LLMs on Kubernetes.
//!
//! This crate holds the command-line shell and the self-update advisory
//! that runs before every command.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`error`] - Error types and result aliases
//! - [`updates`] - Release checks, version ordering and the update advisory
//!
//! # Example
//!
//! ```
//! use llmkube::updates::{compare, is_newer};
//! use std::cmp::Ordering;
//!
//! assert_eq!(compare("v1.2", "1.2.0"), Ordering::Equal);
//! assert!(is_newer("2", "1.9.9"));
//! ```

pub mod cli;
pub mod error;
pub mod updates;

pub use error::{LlmkubeError, Result};
