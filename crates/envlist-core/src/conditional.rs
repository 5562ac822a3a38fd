//! Factor-conditional setting values
//!
//! A setting value may hold lines like `py37: mock`, which only apply to
//! environments carrying the factors of the condition. Values themselves are
//! opaque.

use std::collections::BTreeSet;
use std::fmt;

use crate::cst::ast::AstNode;
use crate::cst::{EnvSyntaxKind, parse};
use crate::expand::Expand;

/// The factor expression before the colon of a conditional line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    text: String,
    names: Vec<String>,
}

impl Condition {
    /// Parse a condition; `None` if `text` is not a bare factor expression
    pub fn parse(text: &str) -> Option<Self> {
        let list = parse(text.trim()).ok()?;
        let entries: Vec<_> = list.entries().collect();
        if entries.is_empty() {
            return None;
        }

        for entry in &entries {
            if entry.payload().is_some() || entry.key().is_empty() {
                return None;
            }
            // Whitespace only counts as trivia inside braces
            let loose_trivia = entry
                .syntax()
                .descendants_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| t.kind().is_trivia())
                .any(|t| !t.parent_ancestors().any(|n| n.kind() == EnvSyntaxKind::Group));
            if loose_trivia {
                return None;
            }
        }

        let text = entries
            .iter()
            .map(|e| e.key())
            .collect::<Vec<_>>()
            .join(",");
        let names = entries.iter().flat_map(|e| e.expand()).collect();
        Some(Self { text, names })
    }

    /// Canonical text without whitespace
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Some name has all of its factors in `factors`
    pub fn matches(&self, factors: &BTreeSet<&str>) -> bool {
        self.names
            .iter()
            .any(|name| name.split('-').all(|f| factors.contains(f)))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One line of a setting value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalLine {
    pub condition: Option<Condition>,
    pub value: String,
}

/// A multi-line setting value with optional per-line conditions
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionalSetting {
    lines: Vec<ConditionalLine>,
}

impl ConditionalSetting {
    /// Split a setting value into lines; blank lines are dropped
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let conditional = line.split_once(':').and_then(|(head, value)| {
                    Condition::parse(head).map(|condition| ConditionalLine {
                        condition: Some(condition),
                        value: value.trim().to_string(),
                    })
                });
                conditional.unwrap_or_else(|| ConditionalLine {
                    condition: None,
                    value: line.to_string(),
                })
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ConditionalLine] {
        &self.lines
    }

    /// The value seen by environment `env`
    pub fn evaluate(&self, env: &str) -> String {
        let factors: BTreeSet<&str> = env.split('-').collect();
        self.lines
            .iter()
            .filter(|line| {
                line.condition
                    .as_ref()
                    .is_none_or(|condition| condition.matches(&factors))
            })
            .map(|line| line.value.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for ConditionalSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match &line.condition {
                Some(condition) => write!(f, "{condition}: {}", line.value)?,
                None => f.write_str(&line.value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conditional() {
        let setting = ConditionalSetting::parse("x\ny: z");
        let lines = setting.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].condition, None);
        assert_eq!(lines[0].value, "x");
        assert_eq!(lines[1].condition.as_ref().map(Condition::text), Some("y"));
        assert_eq!(lines[1].value, "z");

        assert_eq!(setting.to_string(), "x\ny: z");
        assert_eq!(setting.evaluate("foo"), "x");
        assert_eq!(setting.evaluate("yy"), "x");
        assert_eq!(setting.evaluate("y"), "x\nz");
        assert_eq!(setting.evaluate("foo-y"), "x\nz");
    }

    #[test]
    fn test_conditional_expands() {
        let setting = ConditionalSetting::parse("{lint, tests}: x");
        assert_eq!(setting.to_string(), "{lint,tests}: x");
        assert_eq!(setting.lines()[0].condition.as_ref().unwrap().names(), ["lint", "tests"]);
        assert_eq!(setting.evaluate("foo"), "");
        assert_eq!(setting.evaluate("foo-tests"), "x");
    }

    #[test]
    fn test_multi_factor_condition() {
        let setting = ConditionalSetting::parse("\n    pytest\n    py37-django: django<3\n");
        assert_eq!(setting.evaluate("py37-django"), "pytest\ndjango<3");
        assert_eq!(setting.evaluate("py37"), "pytest");
    }

    #[test]
    fn test_colon_in_plain_value() {
        let setting = ConditionalSetting::parse("see http://example.com\npy37,py38: mock");
        assert_eq!(setting.lines()[0].condition, None);
        assert_eq!(setting.lines()[0].value, "see http://example.com");
        assert_eq!(setting.evaluate("py38"), "see http://example.com\nmock");
    }
}
