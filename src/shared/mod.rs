pub mod collector;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;
pub mod traits;

pub use error::*;
pub use traits::*;
