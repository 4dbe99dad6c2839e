//! Shared helpers for tests: HTML parsing assertions and a stub backend API.

mod html;
mod stub_backend;

pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment};
pub(crate) use stub_backend::spawn_stub_backend;
