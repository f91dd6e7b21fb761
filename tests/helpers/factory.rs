pub use super::factories::{OutputColumnFactory, PageFactory};

pub struct Factory;

impl Factory {
    pub fn page() -> PageFactory {
        PageFactory::new()
    }

    pub fn column() -> OutputColumnFactory {
        OutputColumnFactory::new()
    }
}
