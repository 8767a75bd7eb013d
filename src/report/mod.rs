//! Report generation modules.

pub mod generator;
pub mod views;

pub use generator::{generate_json_report, generate_markdown_report};
pub use views::{render_form, render_form_list, render_share};
