//! Parsing of `pattern:level` rule strings.

use crate::{LevelError, LevelResult, Severity};
use globset::{GlobBuilder, GlobMatcher};
use std::str::FromStr;

/// Pattern that matches every logger name.
pub const WILDCARD: &str = "*";

/// One `pattern:level` entry of a rule string.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    level: Severity,
    matcher: GlobMatcher,
}

impl Rule {
    /// Parse a single trimmed token.
    ///
    /// The token is split on its *last* colon, so patterns may themselves
    /// contain colons: `test:with:colons:warn` has pattern `test:with:colons`.
    pub fn parse(token: &str) -> LevelResult<Self> {
        let (pattern, level) = token
            .rsplit_once(':')
            .ok_or_else(|| LevelError::MalformedRule {
                token: token.to_string(),
            })?;
        let level = level.parse::<Severity>()?;
        let matcher = compile_pattern(pattern)?;

        Ok(Self {
            pattern: pattern.to_string(),
            level,
            matcher,
        })
    }

    /// Glob pattern matched against logger names.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Level applied when the pattern matches.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Whether this rule is the `*` fallback.
    pub fn is_wildcard(&self) -> bool {
        self.pattern == WILDCARD
    }

    /// Shell-glob match of the pattern against a logger name.
    pub fn matches(&self, name: &str) -> bool {
        self.is_wildcard() || self.matcher.is_match(name)
    }
}

/// Ordered rules parsed from a comma-separated rule string.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse a whole rule string.
    ///
    /// Every token is validated before any matching happens; the first bad
    /// token aborts parsing.
    pub fn parse(input: &str) -> LevelResult<Self> {
        let rules = input
            .split(',')
            .map(str::trim)
            .map(Rule::parse)
            .collect::<LevelResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Level of the first rule, in input order, whose pattern matches `name`.
    pub fn level_for(&self, name: &str) -> Option<Severity> {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(Rule::level)
    }

    /// Rules in input order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromStr for RuleSet {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleSet::parse(s)
    }
}

/// `*` and `?` cross every character, `/` included.
fn compile_pattern(pattern: &str) -> LevelResult<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
        .map_err(|source| LevelError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}
