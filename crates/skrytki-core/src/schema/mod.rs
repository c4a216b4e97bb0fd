pub mod db;
pub mod functions;
pub mod migrations;
pub mod pool;

pub use db::{Database, DatabaseStats};
pub use functions::register_functions;
pub use pool::{Pool, PoolStatus, PooledConnection};
