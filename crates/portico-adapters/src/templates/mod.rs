//! Template sources.
//!
//! A template subdir is a directory of plain text files; both file paths and
//! contents may carry `{{KEY}}` placeholders.

mod directory;
mod embedded;
mod memory;

pub use directory::DirectoryTemplates;
pub use embedded::EmbeddedTemplates;
pub use memory::InMemoryTemplates;
