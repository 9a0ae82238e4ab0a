use std::collections::HashMap;

use crate::domain::{
    entities::{ProjectStructure, ServiceInfo, TemplateTree},
    error::DomainError,
};

/// Centralized domain validation.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_template(tree: &TemplateTree, subdir: &str) -> Result<(), DomainError> {
        tree.validate(subdir)
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }

    /// Every exposed service must map to a distinct Go import alias.
    pub fn validate_unique_aliases(services: &[ServiceInfo]) -> Result<(), DomainError> {
        let mut seen: HashMap<String, &ServiceInfo> = HashMap::with_capacity(services.len());
        for service in services {
            if let Some(first) = seen.insert(service.alias(), service) {
                return Err(DomainError::AliasCollision {
                    alias: service.alias(),
                    first: first.qualified_name(),
                    second: service.qualified_name(),
                });
            }
        }
        Ok(())
    }
}
