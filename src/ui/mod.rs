//! User interface module - terminal output for commands.
//!
//! - `formatter` - styled status lines and map summaries

pub mod formatter;

pub use formatter::{
    display_error, display_map_summary, display_release_warning, display_status,
    display_success, display_warning, summarize_map,
};
