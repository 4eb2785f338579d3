//! Validation of the `displayName` tag an extension object may carry.
//!
//! A valid tag is attached to the node the chain builder inserts, and shows up in
//! diagnostics and in `ChainExhausted` errors.

use pest::Parser;
use pest_derive::Parser;

use crate::runner::ds::error::OlooError;
use crate::runner::ds::object::Node;
use crate::runner::ds::object_property::{CONSTRUCTOR_PROP, DISPLAY_NAME_PROP};
use crate::runner::ds::value::Value;

#[derive(Parser)]
#[grammar = "runner/debug_tag.pest"] // relative to src
pub struct DebugTagParser;

pub fn parse_debug_tag(tag: &str) -> Result<String, OlooError> {
    match DebugTagParser::parse(Rule::debug_tag, tag) {
        Ok(_) => Ok(tag.to_string()),
        Err(_) => Err(OlooError::MalformedDebugTag(tag.to_string())),
    }
}

/// Looks for a `displayName` on `extension`. Returns `None` when the extension does not ask
/// for a tag: no `displayName`, a falsy one (`""`, `0`, `false`, `null`), or a custom
/// `constructor` of its own. Any other non-string value is malformed.
pub fn extract_debug_tag(extension: &Node) -> Option<Result<String, OlooError>> {
    if extension.has_own_property(&CONSTRUCTOR_PROP) {
        return None;
    }
    let value = extension.get_own_property(&DISPLAY_NAME_PROP)?.value()?.clone();
    if !value.is_truthy() {
        return None;
    }
    match value {
        Value::String(s) => Some(parse_debug_tag(&s)),
        other => Some(Err(OlooError::MalformedDebugTag(other.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ds::object_property::PropertyDescriptor;

    #[test]
    fn test_accepts_identifiers() {
        for tag in &["Animal", "_private", "Dog2", "snake_case_name", "X"] {
            assert_eq!(parse_debug_tag(tag), Ok(tag.to_string()));
        }
    }

    #[test]
    fn test_rejects_non_identifiers() {
        for tag in &["2Fast", "has space", "dash-name", "dotted.name", "émile", ""] {
            assert_eq!(
                parse_debug_tag(tag),
                Err(OlooError::MalformedDebugTag(tag.to_string()))
            );
        }
    }

    #[test]
    fn test_custom_constructor_suppresses_tag() {
        let mut ext = Node::new();
        ext.define_own_property(
            DISPLAY_NAME_PROP.clone(),
            PropertyDescriptor::data(Value::from("Animal")),
        );
        assert_eq!(extract_debug_tag(&ext), Some(Ok("Animal".to_string())));
        ext.define_own_property(CONSTRUCTOR_PROP.clone(), PropertyDescriptor::data(Value::Null));
        assert_eq!(extract_debug_tag(&ext), None);
    }

    #[test]
    fn test_falsy_display_name_asks_for_no_tag() {
        for falsy in vec![
            Value::from(""),
            Value::Number(0.0),
            Value::Number(f64::NAN),
            Value::Boolean(false),
            Value::Null,
        ] {
            let mut ext = Node::new();
            ext.define_own_property(DISPLAY_NAME_PROP.clone(), PropertyDescriptor::data(falsy));
            assert_eq!(extract_debug_tag(&ext), None);
        }
    }

    #[test]
    fn test_non_string_display_name_is_malformed() {
        let mut ext = Node::new();
        ext.define_own_property(
            DISPLAY_NAME_PROP.clone(),
            PropertyDescriptor::data(Value::Number(7.0)),
        );
        assert_eq!(
            extract_debug_tag(&ext),
            Some(Err(OlooError::MalformedDebugTag("7".to_string())))
        );
    }
}
