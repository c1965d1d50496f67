//! Label selector expressions.
//!
//! The grammar is the one used for Kubernetes label and annotation
//! selectors: a comma-separated conjunction of requirements, each one of
//!
//! - `key`, `!key`
//! - `key=value`, `key==value`, `key!=value`
//! - `key in (a,b)`, `key notin (a,b)`
//! - `key>n`, `key<n`

use super::error::SelectorError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Operator of a single requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    Exists,
    DoesNotExist,
    GreaterThan,
    LessThan,
}

/// Requirement constrains the value of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub key: String,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl Requirement {
    /// Tests the requirement against a set of labels.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Equals | Operator::In => {
                value.is_some_and(|v| self.values.iter().any(|want| want == v))
            }
            Operator::NotEquals | Operator::NotIn => {
                value.map_or(true, |v| !self.values.iter().any(|want| want == v))
            }
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
            Operator::GreaterThan | Operator::LessThan => {
                let (Some(have), Some(bound)) = (
                    value.and_then(|v| v.parse::<i64>().ok()),
                    self.values.first().and_then(|v| v.parse::<i64>().ok()),
                ) else {
                    return false;
                };
                if self.operator == Operator::GreaterThan {
                    have > bound
                } else {
                    have < bound
                }
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
            Operator::Equals => write!(f, "{}={}", self.key, self.values.join("")),
            Operator::NotEquals => write!(f, "{}!={}", self.key, self.values.join("")),
            Operator::In => write!(f, "{} in ({})", self.key, self.values.join(",")),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, self.values.join(",")),
            Operator::GreaterThan => write!(f, "{}>{}", self.key, self.values.join("")),
            Operator::LessThan => write!(f, "{}<{}", self.key, self.values.join("")),
        }
    }
}

/// LabelSelector is a parsed selector expression.
///
/// An empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// A selector without requirements.
    pub fn everything() -> Self {
        LabelSelector::default()
    }

    pub fn parse(selector: &str) -> Result<LabelSelector, SelectorError> {
        Parser::new(selector).parse()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|r| r.matches(labels))
    }
}

impl FromStr for LabelSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelSelector::parse(s)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.requirements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", r)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Identifier(String),
    Comma,
    OpenParen,
    CloseParen,
    Equals,
    NotEquals,
    Not,
    GreaterThan,
    LessThan,
}

fn is_special(ch: char) -> bool {
    matches!(ch, ',' | '(' | ')' | '=' | '!' | '<' | '>')
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        chars.next();
        let token = match ch {
            ',' => Token::Comma,
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '<' => Token::LessThan,
            '>' => Token::GreaterThan,
            '=' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                }
                Token::Equals
            }
            '!' => {
                if chars.peek() == Some(&'=') {
                    chars.next();
                    Token::NotEquals
                } else {
                    Token::Not
                }
            }
            _ => {
                let mut ident = String::from(ch);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || is_special(next) {
                        break;
                    }
                    ident.push(next);
                    chars.next();
                }
                Token::Identifier(ident)
            }
        };
        tokens.push(token);
    }

    tokens
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            tokens: tokenize(input),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SelectorError::parse(self.input, message)
    }

    fn parse(mut self) -> Result<LabelSelector, SelectorError> {
        let mut requirements = Vec::new();
        while self.peek().is_some() {
            requirements.push(self.parse_requirement()?);
            match self.next() {
                None => break,
                Some(Token::Comma) if self.peek().is_some() => continue,
                Some(token) => return Err(self.error(format!("unexpected {:?}", token))),
            }
        }
        Ok(LabelSelector { requirements })
    }

    fn parse_key(&mut self) -> Result<String, SelectorError> {
        match self.next() {
            Some(Token::Identifier(key)) => Ok(key),
            other => Err(self.error(format!("expected a key, found {:?}", other))),
        }
    }

    fn parse_requirement(&mut self) -> Result<Requirement, SelectorError> {
        if self.peek() == Some(&Token::Not) {
            self.next();
            let key = self.parse_key()?;
            return Ok(Requirement {
                key,
                operator: Operator::DoesNotExist,
                values: Vec::new(),
            });
        }

        let key = self.parse_key()?;
        let operator = match self.peek() {
            None | Some(Token::Comma) => {
                return Ok(Requirement {
                    key,
                    operator: Operator::Exists,
                    values: Vec::new(),
                })
            }
            Some(Token::Equals) => Operator::Equals,
            Some(Token::NotEquals) => Operator::NotEquals,
            Some(Token::GreaterThan) => Operator::GreaterThan,
            Some(Token::LessThan) => Operator::LessThan,
            Some(Token::Identifier(word)) if word == "in" => Operator::In,
            Some(Token::Identifier(word)) if word == "notin" => Operator::NotIn,
            Some(other) => {
                return Err(self.error(format!("unexpected {:?} after key {:?}", other, key)))
            }
        };
        self.next();

        let values = match operator {
            Operator::In | Operator::NotIn => self.parse_value_set()?,
            _ => vec![self.parse_single_value()?],
        };

        if matches!(operator, Operator::GreaterThan | Operator::LessThan)
            && values[0].parse::<i64>().is_err()
        {
            return Err(self.error(format!("value {:?} for key {:?} must be an integer", values[0], key)));
        }

        Ok(Requirement {
            key,
            operator,
            values,
        })
    }

    fn parse_single_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            // `key=` selects the empty value.
            None | Some(Token::Comma) => Ok(String::new()),
            Some(Token::Identifier(_)) => match self.next() {
                Some(Token::Identifier(v)) => Ok(v),
                _ => Err(self.error("expected a value")),
            },
            Some(other) => Err(self.error(format!("expected a value, found {:?}", other))),
        }
    }

    fn parse_value_set(&mut self) -> Result<Vec<String>, SelectorError> {
        if self.next() != Some(Token::OpenParen) {
            return Err(self.error("expected '(' to open a value set"));
        }
        let mut values = Vec::new();
        loop {
            match self.next() {
                Some(Token::Identifier(v)) => values.push(v),
                Some(Token::CloseParen) if values.is_empty() => break,
                other => return Err(self.error(format!("expected a value, found {:?}", other))),
            }
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::CloseParen) => break,
                other => return Err(self.error(format!("expected ',' or ')', found {:?}", other))),
            }
        }
        if values.is_empty() {
            return Err(self.error("value set must not be empty"));
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_empty_selector_matches_everything() {
        let sel = LabelSelector::parse("").unwrap();
        assert!(sel.is_empty());
        assert!(sel.matches(&labels(&[])));
        assert!(sel.matches(&labels(&[("app", "web")])));
    }

    #[test]
    fn test_equality_requirements() {
        let sel = LabelSelector::parse("app=web, tier==front,env!=prod").unwrap();
        assert_eq!(sel.requirements().len(), 3);
        assert!(sel.matches(&labels(&[("app", "web"), ("tier", "front")])));
        assert!(!sel.matches(&labels(&[("app", "web"), ("tier", "front"), ("env", "prod")])));
        assert!(!sel.matches(&labels(&[("app", "db"), ("tier", "front")])));
    }

    #[test]
    fn test_set_requirements() {
        let sel = LabelSelector::parse("env in (dev, staging),team notin (ops)").unwrap();
        assert!(sel.matches(&labels(&[("env", "dev")])));
        assert!(sel.matches(&labels(&[("env", "staging"), ("team", "web")])));
        assert!(!sel.matches(&labels(&[("env", "prod")])));
        assert!(!sel.matches(&labels(&[("env", "dev"), ("team", "ops")])));
    }

    #[test]
    fn test_existence_requirements() {
        let sel = LabelSelector::parse("app,!legacy").unwrap();
        assert!(sel.matches(&labels(&[("app", "")])));
        assert!(!sel.matches(&labels(&[("app", "x"), ("legacy", "true")])));
        assert!(!sel.matches(&labels(&[])));
    }

    #[test]
    fn test_numeric_requirements() {
        let sel = LabelSelector::parse("replicas>2,weight<10").unwrap();
        assert!(sel.matches(&labels(&[("replicas", "3"), ("weight", "5")])));
        assert!(!sel.matches(&labels(&[("replicas", "2"), ("weight", "5")])));
        assert!(!sel.matches(&labels(&[("replicas", "many"), ("weight", "5")])));
        assert!(LabelSelector::parse("replicas>many").is_err());
    }

    #[test]
    fn test_empty_value() {
        let sel = LabelSelector::parse("app=").unwrap();
        assert!(sel.matches(&labels(&[("app", "")])));
        assert!(!sel.matches(&labels(&[("app", "web")])));
    }

    #[test]
    fn test_parse_errors() {
        assert!(LabelSelector::parse("app=web,").is_err());
        assert!(LabelSelector::parse("env in dev").is_err());
        assert!(LabelSelector::parse("env in ()").is_err());
        assert!(LabelSelector::parse("=web").is_err());
        assert!(LabelSelector::parse("a b").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let sel = LabelSelector::parse("app=web,env in (a,b),!x").unwrap();
        assert_eq!(sel.to_string(), "app=web,env in (a,b),!x");
        assert_eq!(LabelSelector::parse(&sel.to_string()).unwrap(), sel);
    }
}
