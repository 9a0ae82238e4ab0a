pub mod common;
pub mod placeholders;
pub mod project_structure;
pub mod service;
pub mod template;

pub use crate::domain::DomainError;
pub use placeholders::{PlaceholderSet, PlaceholderSetBuilder};
pub use project_structure::ProjectStructure;
pub use service::{Exposure, ServiceInfo, ServiceLocation};
pub use template::{TemplateFile, TemplateTree};
