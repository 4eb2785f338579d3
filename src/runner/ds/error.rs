use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OlooError {
    /// A base call walked off the end of the delegate chain.
    #[error("No base function `{method}` was found for {instance}")]
    ChainExhausted { instance: String, method: String },

    #[error("displayName `{0}` must be a valid function name")]
    MalformedDebugTag(String),

    #[error("Unable to determine calling function name")]
    UnresolvableCallerName,

    #[error("'{0}' is not a function")]
    NotCallable(String),

    #[error("Uncaught type error: {0}")]
    TypeError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl OlooError {
    pub fn is_chain_exhausted(&self) -> bool {
        matches!(self, OlooError::ChainExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_exhausted_message_names_method_and_instance() {
        let err = OlooError::ChainExhausted {
            instance: "Child".to_string(),
            method: "greet".to_string(),
        };
        assert_eq!(err.to_string(), "No base function `greet` was found for Child");
        assert!(err.is_chain_exhausted());
    }
}
