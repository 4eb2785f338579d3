//! Runtime configuration.

use std::env;
use std::fs;
use std::path::Path;

use crate::runner::ds::error::OlooError;

/// Environment variable consulted by [`OlooConfig::from_env`].
pub const MODE_ENV_VAR: &str = "OLOO_ENV";

#[derive(Debug, Clone, PartialEq)]
pub struct OlooConfig {
    /// Attach validated `displayName` tags to the nodes the chain builder inserts, and report
    /// malformed ones to the warning sink.
    pub debug_tags: bool,
}

impl OlooConfig {
    pub fn new() -> Self {
        OlooConfig { debug_tags: true }
    }

    /// No debug tags and no tag warnings.
    pub fn production() -> Self {
        OlooConfig { debug_tags: false }
    }

    pub fn with_debug_tags(mut self, debug_tags: bool) -> Self {
        self.debug_tags = debug_tags;
        self
    }

    /// `OLOO_ENV=production` selects [`OlooConfig::production`]; anything else, or no
    /// variable at all, the development defaults (`debug_tags = true`).
    pub fn from_env() -> Self {
        Self::for_mode(env::var(MODE_ENV_VAR).ok().as_deref())
    }

    pub fn for_mode(mode: Option<&str>) -> Self {
        match mode {
            Some(m) if m.trim().eq_ignore_ascii_case("production") => Self::production(),
            _ => Self::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, OlooError> {
        let content = fs::read_to_string(path)
            .map_err(|e| OlooError::ConfigError(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Parses `key = value` lines.
    ///
    /// ```text
    /// # comments and blank lines are skipped
    /// mode = "production"
    /// debug_tags = true
    /// ```
    ///
    /// Keys apply in order, so a later `debug_tags` overrides what `mode` implied.
    pub fn parse(content: &str) -> Result<Self, OlooError> {
        let mut config = OlooConfig::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = match line.find('=') {
                Some(eq) => (line[..eq].trim(), unquote(line[eq + 1..].trim())),
                None => {
                    return Err(OlooError::ConfigError(format!(
                        "line {}: expected `key = value`",
                        index + 1
                    )))
                }
            };

            match key {
                "mode" => config = Self::for_mode(Some(value)),
                "debug_tags" => {
                    let debug_tags = parse_bool(value).ok_or_else(|| {
                        OlooError::ConfigError(format!(
                            "line {}: debug_tags must be true or false",
                            index + 1
                        ))
                    })?;
                    config = config.with_debug_tags(debug_tags);
                }
                _ => {
                    return Err(OlooError::ConfigError(format!(
                        "line {}: unknown key `{}`",
                        index + 1,
                        key
                    )))
                }
            }
        }

        Ok(config)
    }
}

impl Default for OlooConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert!(OlooConfig::for_mode(None).debug_tags);
        assert!(OlooConfig::for_mode(Some("development")).debug_tags);
        assert!(!OlooConfig::for_mode(Some("production")).debug_tags);
        assert!(!OlooConfig::for_mode(Some(" PRODUCTION ")).debug_tags);
    }

    #[test]
    fn test_parse_applies_keys_in_order() {
        let config = OlooConfig::parse(
            "# tuned for release\nmode = \"production\"\n\ndebug_tags = true\n",
        )
        .unwrap();
        assert!(config.debug_tags);
    }

    #[test]
    fn test_parse_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            OlooConfig::parse("colour = red"),
            Err(OlooError::ConfigError(_))
        ));
        assert!(matches!(
            OlooConfig::parse("debug_tags = maybe"),
            Err(OlooError::ConfigError(_))
        ));
        assert!(matches!(
            OlooConfig::parse("debug_tags"),
            Err(OlooError::ConfigError(_))
        ));
    }

    #[test]
    fn test_load_reads_a_config_file() {
        let path = env::temp_dir().join(format!("oloo-config-{}.conf", std::process::id()));
        fs::write(&path, "mode = production
").unwrap();
        let loaded = OlooConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap(), OlooConfig::production());

        assert!(matches!(
            OlooConfig::load(Path::new("/nonexistent/oloo.conf")),
            Err(OlooError::ConfigError(_))
        ));
    }
}
