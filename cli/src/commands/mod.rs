//! Command implementations for the userdash CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod list;
pub mod view;

pub use list::run_list;
pub use view::run_view;
