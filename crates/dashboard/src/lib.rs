//! Task analytics dashboard.
//!
//! Settle-all aggregation of the analytics sources, the dashboard view model
//! with its activation lifecycle, and plain-text chart rendering.

#![warn(missing_docs)]

pub mod aggregator;
pub mod view;
pub mod render;

pub use aggregator::Aggregator;
pub use view::{activate, Dashboard, Panel, PanelKind, ViewEvent, ViewState};
pub use render::{render_dashboard, render_error, render_panel};
