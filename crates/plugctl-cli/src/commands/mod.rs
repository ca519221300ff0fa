//! Command implementations.

mod list;
mod status;
mod switch;

pub use list::run_list;
pub use status::run_status;
pub use switch::run_switch;
