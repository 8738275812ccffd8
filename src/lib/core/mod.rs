pub mod concurrency;
pub mod error;
pub mod errors;
pub mod fs;
pub mod io;

pub mod prelude {
    pub use super::concurrency::determine_allowed_cpus;
    pub use super::error::{Result, SnpclustError};
    pub use super::errors::is_broken_pipe;
    pub use super::fs::{is_bgzipped, make_parent_dirs};
    pub use super::io::{get_writer, open_text};
}
