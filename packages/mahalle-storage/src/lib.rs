pub mod catalog;
pub mod qdrant;

mod error;

pub use error::{Error, Result};
