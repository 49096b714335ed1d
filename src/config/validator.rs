use std::collections::HashSet;
use thiserror::Error;

use crate::config::{ModelSettings, OrchestrationSettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cross-reference error: {0}")]
    CrossReference(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_server(&settings.server));
        errors.extend(Self::validate_models(&settings.models));
        errors.extend(Self::validate_orchestration(&settings.orchestration));

        if settings.search.api_key_env.trim().is_empty() {
            errors.push(ValidationError::MissingField("search.api_key_env".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        errors
    }

    fn validate_models(models: &ModelSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if models.allowed.is_empty() {
            errors.push(ValidationError::InvalidValue {
                field: "models.allowed".to_string(),
                reason: "At least one model must be allowed".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for model in &models.allowed {
            if model.trim().is_empty() {
                errors.push(ValidationError::InvalidValue {
                    field: "models.allowed".to_string(),
                    reason: "Model identifiers must not be empty".to_string(),
                });
            } else if !seen.insert(model.as_str()) {
                errors.push(ValidationError::Duplicate(format!(
                    "Model '{}' is allowed more than once",
                    model
                )));
            }
        }

        for model in &models.no_tool_models {
            if !models.is_allowed(model) {
                errors.push(ValidationError::CrossReference(format!(
                    "models.no_tool_models entry '{}' is not in models.allowed",
                    model
                )));
            }
        }

        for entry in &models.catalog {
            if !models.is_allowed(&entry.id) {
                errors.push(ValidationError::CrossReference(format!(
                    "models.catalog entry '{}' is not in models.allowed",
                    entry.id
                )));
            }
        }

        errors
    }

    fn validate_orchestration(orchestration: &OrchestrationSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if orchestration.stage_timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "orchestration.stage_timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if orchestration.max_tool_iterations == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "orchestration.max_tool_iterations".to_string(),
                reason: "At least one model call is required".to_string(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ConfigValidator::validate(&Settings::default()).is_ok());
    }

    #[test]
    fn test_errors_are_collected() {
        let mut settings = Settings::default();
        settings.server.host = String::new();
        settings.server.port = 0;
        settings.orchestration.stage_timeout_seconds = 0;

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_empty_allow_list() {
        let mut settings = Settings::default();
        settings.models.allowed.clear();
        settings.models.no_tool_models.clear();
        settings.models.catalog.clear();

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("models.allowed"));
    }

    #[test]
    fn test_no_tool_model_must_be_allowed() {
        let mut settings = Settings::default();
        settings.models.no_tool_models.push("mystery-model".to_string());

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(matches!(errors[0], ValidationError::CrossReference(_)));
    }

    #[test]
    fn test_duplicate_allowed_model() {
        let mut settings = Settings::default();
        settings.models.allowed.push("gemini-2.0-flash".to_string());

        let errors = ConfigValidator::validate(&settings).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Duplicate(_)));
    }
}
