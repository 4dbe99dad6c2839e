//! Dashboard module
//!
//! Provides an overview page that derives a financial summary from the
//! backend collections and renders summary cards, charts, and budget
//! progress meters.

mod cards;
mod charts;
mod handlers;
mod progress;
mod summary;

pub use handlers::get_dashboard_page;
