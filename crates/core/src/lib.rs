//! Mita Core Library
//!
//! This crate provides the core functionality for mita, a personal bookmark
//! manager for shell commands. Commands are short snippets that may contain
//! `{{ name }}` placeholders; variables are named values (with one step of
//! history) that get substituted into them.
//!
//! # Key Features
//!
//! - **Store**: SQLite-backed CRUD for commands and variables, gated by a schema version
//! - **Templating**: Render a command against the current variable values
//! - **Configuration**: Database location, selector and reserved label prefix
//! - **Snapshots**: Export and import the whole store as YAML
//! - **Error Handling**: One error type covering every failure mode
//!
//! # Examples
//!
//! Rendering a stored command:
//!
//! ```no_run
//! use mita_core::interpolation::{build_bindings, Renderer, TemplateRenderer};
//! use mita_core::store::Store;
//!
//! let store = Store::open("/tmp/mita.db")?;
//! store.set_variable("host", "db-1")?;
//! let bindings = build_bindings(&store.list_variables()?);
//! let rendered = TemplateRenderer::new().render("ssh {{ host }}", &bindings)?;
//! assert_eq!(rendered, "ssh db-1");
//! # Ok::<(), mita_core::error::Error>(())
//! ```

pub mod command_definitions;
pub mod config;
pub mod error;
pub mod execution;
pub mod file_handling;
pub mod interpolation;
pub mod store;
