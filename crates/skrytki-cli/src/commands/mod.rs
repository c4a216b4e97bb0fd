pub mod config;
pub mod load;
pub mod search;
pub mod serve;
pub mod status;

pub use load::run_load;
pub use search::{run_search, run_uris};
pub use serve::run_serve;
pub use status::show_status;
