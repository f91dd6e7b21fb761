pub mod batch;
pub mod block;
pub mod column;
pub mod loader;

#[cfg(test)]
mod loader_test;

pub use batch::Page;
pub use block::{Block, BlockData};
pub use column::OutputColumn;
pub use loader::{RowSet, RowSetLoader};
