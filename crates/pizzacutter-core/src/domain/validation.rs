use std::collections::HashSet;

use crate::domain::{entities::BuildConfig, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_build_config(config: &BuildConfig) -> Result<(), DomainError> {
        for (name, root) in [
            ("template root", &config.template_root),
            ("target root", &config.target_root),
        ] {
            if !root.is_absolute() {
                return Err(DomainError::InvalidConfiguration(format!(
                    "{name} must be absolute: {}",
                    root.display()
                )));
            }
        }

        if config.patterns.tokens().any(|t| t.is_empty()) {
            return Err(DomainError::InvalidConfiguration(
                "pattern tokens must not be empty".into(),
            ));
        }

        let mut seen = HashSet::new();
        for (role, marker) in config.options.iter() {
            if marker.is_empty() {
                return Err(DomainError::InvalidConfiguration(format!(
                    "option marker for {role} must not be empty"
                )));
            }
            if !seen.insert(marker) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "option marker \"{marker}\" is used for more than one option"
                )));
            }
        }

        if config.audit_prefixes.iter().any(String::is_empty) {
            return Err(DomainError::InvalidConfiguration(
                "audit prefixes must not be empty".into(),
            ));
        }

        Ok(())
    }
}
