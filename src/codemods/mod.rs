pub mod catalog;

pub use catalog::{CodemodCatalog, CodemodDescriptor};
