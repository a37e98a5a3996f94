pub mod error;
pub mod kol;
pub mod source;
pub mod stats;
