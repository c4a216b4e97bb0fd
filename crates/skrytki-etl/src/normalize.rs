//! Free-text cleaning for names and addresses.
//!
//! [`clean_text`] runs the ordered [`rules`] list over a value and is used
//! for entity names. [`clean_text_gently`] only drops a few locality
//! annotations and tidies whitespace; it is used for addresses, localities,
//! postcodes, registry numbers and URIs, where punctuation is meaningful.
//!
//! Both functions are pure, total and idempotent.

use regex::Regex;
use std::sync::LazyLock;

/// How a rule rewrites its input.
enum Rewrite {
    /// Replace every match of `pattern` with `with` (`$n` group syntax).
    Replace { pattern: Regex, with: &'static str },
    /// Arbitrary rewrite for rules a single regex cannot express.
    Custom(fn(&str) -> String),
}

/// One named step of the cleaning pipeline.
pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    rewrite: Rewrite,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

impl Rule {
    fn replace(
        name: &'static str,
        description: &'static str,
        pattern: &str,
        with: &'static str,
    ) -> Self {
        Self {
            name,
            description,
            rewrite: Rewrite::Replace {
                pattern: compile(pattern),
                with,
            },
        }
    }

    fn custom(name: &'static str, description: &'static str, f: fn(&str) -> String) -> Self {
        Self {
            name,
            description,
            rewrite: Rewrite::Custom(f),
        }
    }

    /// Apply this rule alone.
    pub fn apply(&self, text: &str) -> String {
        match &self.rewrite {
            Rewrite::Replace { pattern, with } => pattern.replace_all(text, *with).into_owned(),
            Rewrite::Custom(f) => f(text),
        }
    }
}

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in cleaning pattern must compile")
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::replace("tab", "Replace tab with a space.", r"\t", " "),
        Rule::replace(
            "separators",
            "Replace commas, semicolons and underscores with spaces.",
            r"[,;_]",
            " ",
        ),
        Rule::replace("apostrophe", "Remove single apostrophes.", r"'", ""),
        Rule::replace(
            "double_quotes",
            "Collapse repeated double quotes into one.",
            r#""{2,}"#,
            "\"",
        ),
        Rule::replace("period_space", "Add a space after every period.", r"\.", ". "),
        Rule::replace(
            "hyphen_spacing",
            "Surround hyphens with single spaces.",
            r"\s?-\s?",
            " - ",
        ),
        Rule::custom(
            "space_before_quote",
            "Add a space before a quoted substring if missing.",
            space_before_quotes,
        ),
        Rule::custom(
            "space_after_quote",
            "Add a space after a quoted substring if missing.",
            space_after_quotes,
        ),
        Rule::replace(
            "collapse_whitespace",
            "Replace whitespace runs with a single space.",
            r"\s\s+",
            " ",
        ),
        Rule::custom(
            "unwrap_quotes",
            "Remove one layer of double quotes wrapping the whole value.",
            unwrap_quotes,
        ),
        Rule::custom("trim", "Trim leading and trailing whitespace.", |s| {
            s.trim().to_string()
        }),
    ]
});

static GENTLE_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::replace("city", "Remove the '(miasto)' annotation.", r"\(miasto\)", ""),
        Rule::replace("village", "Remove the '(wieś)' annotation.", r"\(wieś\)", ""),
        Rule::replace(
            "capital_district",
            "Spell out the Warsaw district annotation as a suffix.",
            r"\s*\(dzielnica\s+m\.\s*st\.\s*Warszawy\)",
            " - dzielnica Warszawy",
        ),
        Rule::replace(
            "collapse_whitespace",
            "Replace whitespace runs with a single space.",
            r"\s\s+",
            " ",
        ),
        Rule::custom("trim", "Trim leading and trailing whitespace.", |s| {
            s.trim().to_string()
        }),
    ]
});

/// The ordered rule list applied by [`clean_text`].
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// The ordered rule list applied by [`clean_text_gently`].
pub fn gentle_rules() -> &'static [Rule] {
    &GENTLE_RULES
}

/// Clean a name for indexing and display.
pub fn clean_text(text: &str) -> String {
    apply_all(rules(), text)
}

/// Tidy an address-like value without touching its punctuation.
pub fn clean_text_gently(text: &str) -> String {
    apply_all(gentle_rules(), text)
}

/// [`clean_text`] over an optional value; `None` passes through.
pub fn clean_optional(text: Option<&str>) -> Option<String> {
    text.map(clean_text)
}

fn apply_all(rules: &[Rule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Byte offsets of quote pairs, pairing the 1st quote with the 2nd, the
/// 3rd with the 4th and so on. A trailing unpaired quote is ignored.
fn quote_pairs(text: &str) -> Vec<(usize, usize)> {
    let quotes: Vec<usize> = text.match_indices('"').map(|(i, _)| i).collect();
    quotes.chunks_exact(2).map(|p| (p[0], p[1])).collect()
}

fn space_before_quotes(text: &str) -> String {
    let openings: Vec<usize> = quote_pairs(text).iter().map(|&(open, _)| open).collect();
    let mut out = String::with_capacity(text.len() + openings.len());
    for (i, c) in text.char_indices() {
        if openings.contains(&i) && out.chars().last().is_some_and(|prev| !prev.is_whitespace())
        {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

fn space_after_quotes(text: &str) -> String {
    let closings: Vec<usize> = quote_pairs(text).iter().map(|&(_, close)| close).collect();
    let mut out = String::with_capacity(text.len() + closings.len());
    let mut pending = false;
    for (i, c) in text.char_indices() {
        if pending && !c.is_whitespace() {
            out.push(' ');
        }
        out.push(c);
        pending = closings.contains(&i);
    }
    out
}

fn unwrap_quotes(text: &str) -> String {
    let trimmed = text.trim();
    let wrapped = trimmed.len() >= 2
        && trimmed.starts_with('"')
        && trimmed.ends_with('"')
        && !trimmed[1..trimmed.len() - 1].contains('"');
    if wrapped {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        text.to_string()
    }
}
