pub mod output_column_factory;
pub mod page_factory;

#[cfg(test)]
mod output_column_factory_test;
#[cfg(test)]
mod page_factory_test;

pub use output_column_factory::OutputColumnFactory;
pub use page_factory::PageFactory;
