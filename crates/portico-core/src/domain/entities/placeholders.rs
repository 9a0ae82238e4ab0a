//! The placeholder bag every pipeline component reads from.

use serde::{Deserialize, Serialize};

use crate::domain::{casing, error::DomainError, render::RenderContext};

macro_rules! placeholder_set {
    ($( $field:ident => $key:literal ),* $(,)?) => {
        /// Immutable bag of string substitution variables.
        ///
        /// Produced once per `create` call (by the CLI or any other driving
        /// adapter) and only ever read afterwards. Construct it through
        /// [`PlaceholderSet::builder`], which validates path-shaped and
        /// fqn-shaped fields.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct PlaceholderSet {
            $( $field: String, )*
        }

        impl PlaceholderSet {
            $(
                pub fn $field(&self) -> &str {
                    &self.$field
                }
            )*

            fn base_context(&self) -> RenderContext {
                let mut ctx = RenderContext::new();
                $( ctx.insert($key, self.$field.clone()); )*
                ctx
            }
        }

        /// Builder for [`PlaceholderSet`].
        #[derive(Debug, Clone, Default)]
        pub struct PlaceholderSetBuilder {
            inner: PlaceholderSet,
        }

        impl PlaceholderSetBuilder {
            $(
                pub fn $field(mut self, value: impl Into<String>) -> Self {
                    self.inner.$field = value.into();
                    self
                }
            )*
        }
    };
}

placeholder_set! {
    project_root => "PROJECT_ROOT",
    project_name => "PROJECT_NAME",
    project_directory => "PROJECT_DIRECTORY",
    project_fqn => "PROJECT_FQN",
    registry => "REGISTRY",
    registry_server => "REGISTRY_SERVER",
    remote => "REMOTE",
    branch => "BRANCH",
    version => "VERSION",
    services_fqn => "SERVICES_FQN",
    services_directory => "SERVICES_DIRECTORY",
    gateway_service_name => "GATEWAY_SERVICE_NAME",
    gateway_fqn => "GATEWAY_FQN",
    libs_fqn => "LIBS_FQN",
    libs_directory => "LIBS_DIRECTORY",
    service_namespace => "SERVICE_NAMESPACE",
    service_versioned_namespace => "SERVICE_VERSIONED_NAMESPACE",
    service_name => "SERVICE_NAME",
    service_fqn => "SERVICE_FQN",
    service_directory => "SERVICE_DIRECTORY",
    infra_directory => "INFRA_DIRECTORY",
    proto_package => "PROTO_PACKAGE",
}

impl PlaceholderSet {
    pub fn builder() -> PlaceholderSetBuilder {
        PlaceholderSetBuilder::default()
    }

    /// All fields plus derived casings, ready for template rendering.
    pub fn render_context(&self) -> RenderContext {
        self.base_context()
            .with_variable(
                "SERVICE_NAME_PASCAL",
                casing::to_pascal_case(&self.service_name),
            )
            .with_variable(
                "SERVICE_NAME_CAMEL",
                casing::to_camel_case(&self.service_name),
            )
            .with_variable(
                "SERVICE_NAME_KEBAB",
                casing::to_kebab_case(&self.service_name),
            )
            .with_variable(
                "SERVICE_NAMESPACE_PASCAL",
                casing::to_pascal_case(&self.service_namespace),
            )
    }

    /// Number of directory levels between the project root and the gateway.
    pub fn service_depth(&self) -> usize {
        path_segments(&self.service_directory).count()
    }
}

impl PlaceholderSetBuilder {
    /// Validate and freeze the placeholder set.
    ///
    /// `registry_server` defaults to the first `/`-separated segment of
    /// `registry` when not set explicitly.
    pub fn build(mut self) -> Result<PlaceholderSet, DomainError> {
        if self.inner.registry_server.is_empty() {
            self.inner.registry_server = self
                .inner
                .registry
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string();
        }

        let set = self.inner;

        require("service_namespace", &set.service_namespace)?;
        require("service_name", &set.service_name)?;
        require("service_fqn", &set.service_fqn)?;
        require("service_directory", &set.service_directory)?;
        require("services_directory", &set.services_directory)?;

        for (field, value) in [
            ("project_root", &set.project_root),
            ("project_directory", &set.project_directory),
            ("libs_directory", &set.libs_directory),
            ("infra_directory", &set.infra_directory),
        ] {
            check_path(field, value)?;
        }
        check_relative_path("services_directory", &set.services_directory)?;
        check_relative_path("service_directory", &set.service_directory)?;

        for (field, value) in [
            ("remote", &set.remote),
            ("project_fqn", &set.project_fqn),
            ("services_fqn", &set.services_fqn),
            ("gateway_fqn", &set.gateway_fqn),
            ("libs_fqn", &set.libs_fqn),
            ("service_fqn", &set.service_fqn),
        ] {
            check_fqn(field, value)?;
        }

        Ok(set)
    }
}

/// Non-empty, non-`.` segments of a slash or backslash separated path.
pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty() && *s != ".")
}

fn require(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingPlaceholder { field });
    }
    Ok(())
}

fn check_path(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.contains('\0') {
        return Err(DomainError::InvalidPlaceholder {
            field,
            reason: "contains a NUL byte".into(),
        });
    }
    Ok(())
}

fn check_relative_path(field: &'static str, value: &str) -> Result<(), DomainError> {
    check_path(field, value)?;
    if value.starts_with('/') || value.starts_with('\\') || value.contains(':') {
        return Err(DomainError::InvalidPlaceholder {
            field,
            reason: format!("'{value}' must be relative to the project root"),
        });
    }
    if path_segments(value).any(|s| s == "..") {
        return Err(DomainError::InvalidPlaceholder {
            field,
            reason: format!("'{value}' must not contain '..'"),
        });
    }
    Ok(())
}

fn check_fqn(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidPlaceholder {
            field,
            reason: format!("'{value}' contains whitespace"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> PlaceholderSetBuilder {
        PlaceholderSet::builder()
            .service_namespace("gw")
            .service_name("api")
            .service_fqn("example.com/platform/services/gw/api")
            .service_directory("services/gw/api")
            .services_directory("services")
    }

    #[test]
    fn build_derives_registry_server() {
        let set = builder()
            .registry("ghcr.io/acme/platform")
            .build()
            .unwrap();
        assert_eq!(set.registry_server(), "ghcr.io");
    }

    #[test]
    fn build_requires_service_name() {
        let err = builder().service_name("").build().unwrap_err();
        assert_eq!(
            err,
            DomainError::MissingPlaceholder {
                field: "service_name"
            }
        );
    }

    #[test]
    fn build_rejects_absolute_service_directory() {
        let err = builder()
            .service_directory("/tmp/services/gw/api")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidPlaceholder {
                field: "service_directory",
                ..
            }
        ));
    }

    #[test]
    fn build_rejects_parent_segments() {
        assert!(builder().services_directory("../services").build().is_err());
    }

    #[test]
    fn build_rejects_whitespace_in_fqn() {
        assert!(builder().service_fqn("example.com/a b").build().is_err());
    }

    #[test]
    fn render_context_exposes_fields_and_casings() {
        let ctx = builder()
            .service_name("user-profiles")
            .build()
            .unwrap()
            .render_context();

        assert_eq!(ctx.get("SERVICE_NAME"), Some("user-profiles"));
        assert_eq!(ctx.get("SERVICE_NAME_PASCAL"), Some("UserProfiles"));
        assert_eq!(ctx.get("SERVICES_DIRECTORY"), Some("services"));
        assert_eq!(ctx.get("BRANCH"), Some(""));
    }

    #[test]
    fn service_depth_counts_segments() {
        let set = builder().service_directory("./services/gw/api/").build().unwrap();
        assert_eq!(set.service_depth(), 3);
    }
}
