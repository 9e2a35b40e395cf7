//! ## Summary
//! Guard that keeps forward migrations additive.
//!
//! Stored events must stay readable under every later schema, so an `up.sql`
//! may create tables, add nullable columns, add indexes or insert rows, but
//! never drop, rename or retype anything, and never rewrite registered kinds.
//! `down.sql` files are not checked.

use std::fmt;

/// A statement an additive migration must not contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyViolation {
    pub rule: Rule,
    pub statement: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    DropTable,
    DropColumn,
    Rename,
    ChangeColumnType,
    Truncate,
    RewriteKinds,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DropTable => "drops a table",
            Self::DropColumn => "drops a column",
            Self::Rename => "renames a table or column",
            Self::ChangeColumnType => "changes a column type",
            Self::Truncate => "truncates a table",
            Self::RewriteKinds => "updates or deletes registered kinds",
        }
    }
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "migration {}: {}", self.rule.as_str(), self.statement)
    }
}

impl std::error::Error for PolicyViolation {}

/// ## Summary
/// Checks that every statement in `sql` is additive.
///
/// ## Errors
/// Returns the first offending statement.
pub fn check_additive(sql: &str) -> Result<(), PolicyViolation> {
    for statement in strip_comments(sql).split(';') {
        let words = words(statement);
        if words.is_empty() {
            continue;
        }
        if let Some(rule) = violation(&words) {
            return Err(PolicyViolation {
                rule,
                statement: words.join(" "),
            });
        }
    }
    Ok(())
}

fn violation(words: &[String]) -> Option<Rule> {
    let has_pair = |a: &str, b: &str| words.windows(2).any(|w| w[0] == a && w[1] == b);

    match words[0].as_str() {
        "DROP" if words.get(1).is_some_and(|w| w == "TABLE") => Some(Rule::DropTable),
        "TRUNCATE" => Some(Rule::Truncate),
        "DELETE" | "UPDATE" if words.iter().any(|w| w == "EVENT_KIND") => Some(Rule::RewriteKinds),
        "ALTER" if words.get(1).is_some_and(|w| w == "TABLE") => {
            if words.iter().any(|w| w == "RENAME") {
                Some(Rule::Rename)
            } else if has_pair("DROP", "COLUMN") || drops_bare_column(words) {
                Some(Rule::DropColumn)
            } else if has_pair("ALTER", "COLUMN") && words.iter().skip(2).any(|w| w == "TYPE") {
                Some(Rule::ChangeColumnType)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `ALTER TABLE t DROP c` is shorthand for dropping column `c`.
fn drops_bare_column(words: &[String]) -> bool {
    words.windows(2).any(|w| {
        w[0] == "DROP"
            && !matches!(
                w[1].as_str(),
                "CONSTRAINT" | "DEFAULT" | "NOT" | "COLUMN" | "IDENTITY" | "EXPRESSION"
            )
    })
}

fn strip_comments(sql: &str) -> String {
    sql.lines()
        .map(|line| line.find("--").map_or(line, |idx| &line[..idx]))
        .collect::<Vec<_>>()
        .join("\n")
}

fn words(statement: &str) -> Vec<String> {
    statement
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_uppercase)
        .collect()
}
