//! Template storage backends

pub mod file;
pub mod record;

pub use file::FileStore;
pub use record::{RecordStore, TemplateRecord};
