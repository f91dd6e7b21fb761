pub mod encoding;
pub mod errors;
pub mod page;
pub mod types;
