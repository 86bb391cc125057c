//! Terminal host for the form widgets
//!
//! One page, two tabs:
//! - Form: a stack of host fields, each bound to a calendar picker or a
//!   searchable select, with popups dismissed by outside presses
//! - Register: the filterable table fed from a remote sheet

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use app::{App, Tab};
pub use terminal::run;
