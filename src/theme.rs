use std::collections::HashMap;

use serde::Deserialize;

/// One theme token. Colors are plain strings, sizes are numbers, and the
/// zoom-dependent opacity settings are `(zoom, value)` control-point lists.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Number(f64),
    Text(String),
    Curve(Vec<[f64; 2]>),
}

/// Flat token map loaded from a theme file. Plays the role a stylesheet
/// variable lookup plays when the diagram is hosted in a browser: resolved
/// properties consult it before falling back to their hardcoded defaults.
#[derive(Debug, Clone, Default)]
pub struct ThemeVars {
    tokens: HashMap<String, Token>,
}

impl ThemeVars {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        let tokens: HashMap<String, Token> =
            toml::from_str(content).map_err(|e| format!("Failed to parse theme TOML: {}", e))?;
        Ok(Self { tokens })
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let tokens: HashMap<String, Token> = serde_yaml::from_str(content)
            .map_err(|e| format!("Failed to parse theme YAML: {}", e))?;
        Ok(Self { tokens })
    }

    pub fn color(&self, key: &str) -> Option<String> {
        match self.tokens.get(key) {
            Some(Token::Text(value)) if !value.is_empty() => Some(value.clone()),
            _ => None,
        }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.tokens.get(key) {
            Some(Token::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn curve(&self, key: &str) -> Option<Vec<(f64, f64)>> {
        match self.tokens.get(key) {
            Some(Token::Curve(points)) => Some(points.iter().map(|p| (p[0], p[1])).collect()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeVars;

    #[test]
    fn parses_toml_tokens() {
        let vars = ThemeVars::from_toml(
            r##"
surface = "#101418"
thickness = 6.0
shadow-opacity = [[20.0, 20.0], [40.0, 0.0]]
"##,
        )
        .expect("valid theme");

        assert_eq!(vars.color("surface").as_deref(), Some("#101418"));
        assert_eq!(vars.number("thickness"), Some(6.0));
        assert_eq!(
            vars.curve("shadow-opacity"),
            Some(vec![(20.0, 20.0), (40.0, 0.0)])
        );
    }

    #[test]
    fn parses_yaml_tokens() {
        let vars =
            ThemeVars::from_yaml("surface: \"#101418\"\nfont-size: 14\n").expect("valid theme");
        assert_eq!(vars.color("surface").as_deref(), Some("#101418"));
        assert_eq!(vars.number("font-size"), Some(14.0));
    }

    #[test]
    fn missing_and_mistyped_keys_resolve_to_none() {
        let vars = ThemeVars::from_toml("surface = \"#101418\"").expect("valid theme");
        assert_eq!(vars.color("primary"), None);
        assert_eq!(vars.number("surface"), None);
        assert_eq!(vars.curve("surface"), None);
    }
}
