//! Predicates gating conditional dependencies.
//!
//! Syntax mirrors `cfg(...)` expressions:
//!
//! ```text
//! editor
//! not(shipping)
//! all(editor, iwyu)
//! any(debug, development)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::flags::{Capability, CapabilitySet};

/// Deepest `not`/`all`/`any` nesting the parser accepts.
pub const MAX_DEPTH: usize = 64;

/// A boolean expression over build capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Predicate {
    Has(Capability),
    Not(Box<Predicate>),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Shorthand for the common `editor` gate.
    pub fn editor() -> Self {
        Predicate::Has(Capability::Editor)
    }

    /// Evaluate against an already computed capability set.
    pub fn matches(&self, caps: &CapabilitySet) -> bool {
        match self {
            Predicate::Has(cap) => caps.has(*cap),
            Predicate::Not(inner) => !inner.matches(caps),
            Predicate::All(preds) => preds.iter().all(|p| p.matches(caps)),
            Predicate::Any(preds) => preds.iter().any(|p| p.matches(caps)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, name: &str, preds: &[Predicate]) -> fmt::Result {
            write!(f, "{}(", name)?;
            for (i, p) in preds.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", p)?;
            }
            f.write_str(")")
        }

        match self {
            Predicate::Has(cap) => write!(f, "{}", cap),
            Predicate::Not(inner) => write!(f, "not({})", inner),
            Predicate::All(preds) => list(f, "all", preds),
            Predicate::Any(preds) => list(f, "any", preds),
        }
    }
}

/// Error parsing a predicate expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid predicate `{input}`: {message}")]
pub struct PredicateParseError {
    pub input: String,
    pub message: String,
}

impl FromStr for Predicate {
    type Err = PredicateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |message: String| PredicateParseError {
            input: s.to_string(),
            message,
        };

        let mut parser = Parser {
            src: s,
            pos: 0,
            depth: 0,
        };
        let pred = parser.parse_expr().map_err(fail)?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(fail(format!(
                "unexpected trailing input at offset {}",
                parser.pos
            )));
        }
        Ok(pred)
    }
}

impl TryFrom<String> for Predicate {
    type Error = PredicateParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Predicate> for String {
    fn from(p: Predicate) -> Self {
        p.to_string()
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&str, String> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(format!("expected identifier at offset {}", self.pos));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.src[start..self.pos])
    }

    fn parse_expr(&mut self) -> Result<Predicate, String> {
        let name = self.ident()?.to_string();

        match name.as_str() {
            "not" | "all" | "any" => {
                if !self.eat('(') {
                    return Err(format!("expected `(` after `{}`", name));
                }
                if self.depth == MAX_DEPTH {
                    return Err(format!(
                        "nesting deeper than {} at offset {}",
                        MAX_DEPTH, self.pos
                    ));
                }
                self.depth += 1;
                let args = self.parse_args()?;
                self.depth -= 1;
                match name.as_str() {
                    "not" => {
                        let mut args = args;
                        if args.len() != 1 {
                            return Err(format!(
                                "`not` takes exactly one argument, got {}",
                                args.len()
                            ));
                        }
                        Ok(Predicate::Not(Box::new(args.remove(0))))
                    }
                    "all" => Ok(Predicate::All(args)),
                    _ => Ok(Predicate::Any(args)),
                }
            }
            cap => cap.parse::<Capability>().map(Predicate::Has),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<Predicate>, String> {
        let mut args = Vec::new();
        if self.eat(')') {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(')') {
                return Ok(args);
            }
            if !self.eat(',') {
                return Err(format!("expected `,` or `)` at offset {}", self.pos));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flags::{BuildFlags, Configuration, IncludeHygiene};

    #[test]
    fn test_parse_simple() {
        assert_eq!("editor".parse::<Predicate>().unwrap(), Predicate::editor());
    }

    #[test]
    fn test_parse_nested() {
        let pred: Predicate = "all(editor, not(shipping))".parse().unwrap();
        assert_eq!(
            pred,
            Predicate::All(vec![
                Predicate::Has(Capability::Editor),
                Predicate::Not(Box::new(Predicate::Has(Capability::Shipping))),
            ])
        );
        assert_eq!(pred.to_string(), "all(editor, not(shipping))");
    }

    #[test]
    fn test_parse_errors() {
        assert!("edtor".parse::<Predicate>().is_err());
        assert!("not(editor, iwyu)".parse::<Predicate>().is_err());
        assert!("all(editor".parse::<Predicate>().is_err());
        assert!("editor iwyu".parse::<Predicate>().is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |depth: usize| {
            format!("{}editor{}", "not(".repeat(depth), ")".repeat(depth))
        };

        let pred: Predicate = nested(MAX_DEPTH).parse().unwrap();
        assert_eq!(pred.to_string(), nested(MAX_DEPTH));

        let err = nested(MAX_DEPTH + 1).parse::<Predicate>().unwrap_err();
        assert!(err.message.contains("nesting deeper than 64"));

        // Unbalanced input far past the limit fails without recursing into it
        let err = "not(".repeat(200_000).parse::<Predicate>().unwrap_err();
        assert!(err.message.starts_with("nesting deeper than"));
    }

    #[test]
    fn test_matches() {
        let editor_iwyu = BuildFlags::editor()
            .with_hygiene(IncludeHygiene::Iwyu)
            .capabilities();
        let shipping = BuildFlags::default()
            .with_configuration(Configuration::Shipping)
            .capabilities();

        let pred: Predicate = "all(editor, iwyu)".parse().unwrap();
        assert!(pred.matches(&editor_iwyu));
        assert!(!pred.matches(&shipping));

        let pred: Predicate = "any(debug, not(shipping))".parse().unwrap();
        assert!(pred.matches(&editor_iwyu));
        assert!(!pred.matches(&shipping));

        // Empty `all` is vacuously true, empty `any` is false
        assert!(Predicate::All(vec![]).matches(&shipping));
        assert!(!Predicate::Any(vec![]).matches(&shipping));
    }
}
