use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown blend mode: {0}")]
    UnknownBlendMode(String),

    #[error("Unknown dynamics property: {0}")]
    UnknownProperty(String),

    #[error("Property {name} expects a {expected} value")]
    PropertyType { name: String, expected: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::PropertyType {
            name: "pressure-prescale".to_string(),
            expected: "double",
        };
        assert_eq!(err.to_string(), "Property pressure-prescale expects a double value");

        let message: String = CoreError::UnknownBlendMode("glow".to_string()).into();
        assert_eq!(message, "Unknown blend mode: glow");
    }
}
