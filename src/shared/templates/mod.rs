//! Page template management module.
//!
//! HTML pages are Jinja templates under `templates/pages/`, embedded in the
//! binary at compile time. Templates ending in `.html` are rendered with
//! HTML auto-escaping, so every interpolated value is escaped unless a
//! template marks it `|safe`.
//!
//! # Usage
//!
//! ```ignore
//! use minijinja::context;
//! use crate::shared::templates::render_page;
//!
//! let html = render_page("reports.html", context! { reports => cards })?;
//! ```

pub mod engine;

pub use engine::{render_page, TemplateError};
