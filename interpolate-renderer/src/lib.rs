//! # interpolate-renderer
//!
//! MiniJinja-based template engine with strict variable resolution and an
//! instance-local helper catalog.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use interpolate_core::VariableSet;
//! use interpolate_renderer::{HelperLibrary, TemplateEngine};
//!
//! fn render(vars: &VariableSet) {
//!     let engine = TemplateEngine::new(HelperLibrary::standard());
//!     if let Ok(bytes) = engine.render_str("inline", "host: {{ cidrhost(net, 5) }}\n", vars) {
//!         print!("{}", String::from_utf8_lossy(&bytes));
//!     }
//! }
//! ```

pub(crate) mod context;
pub mod engine;
pub mod error;
pub mod helpers;

pub use engine::{ParsedTemplate, TemplateEngine};
pub use error::{HelperError, RenderError};
pub use helpers::{Helper, HelperKind, HelperLibrary};
