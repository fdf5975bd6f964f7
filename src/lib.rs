pub mod arch;
pub mod checkpoint;
pub mod configs;
pub mod dataset;
pub mod error;
pub mod gradient;
pub mod init;
pub mod optimization;
pub mod training;

pub use error::{NetErr, Result};
