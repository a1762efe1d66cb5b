// tabstatus-common/src/lib.rs

pub mod error;
pub mod capabilities;
pub mod models;
pub mod traits;

pub use error::Error;
