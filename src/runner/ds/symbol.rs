use std::fmt;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolData {
    description: String,
}

impl SymbolData {
    pub fn new(description: String) -> Self {
        SymbolData { description }
    }

    pub fn new_empty() -> Self {
        SymbolData {
            description: Uuid::new_v4().to_hyphenated().to_string(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
impl Display for SymbolData {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_symbols_are_distinct() {
        assert_ne!(SymbolData::new_empty(), SymbolData::new_empty());
    }

    #[test]
    fn test_described_symbols_compare_by_description() {
        let a = SymbolData::new("tag".to_string());
        let b = SymbolData::new("tag".to_string());
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Symbol(tag)");
    }
}
