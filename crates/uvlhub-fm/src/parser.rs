//! UVL document parser
//!
//! Handles the UVL subset stored on the hub: a `features` section holding an
//! indentation-structured tree with `mandatory`, `optional`, `or`, and
//! `alternative` groups, followed by an optional `constraints` section of
//! boolean expressions over feature names. Feature names may be double-quoted;
//! the quotes stay part of the name.

use crate::error::UvlError;
use crate::model::{Expr, Feature, FeatureModel, Group, GroupKind};
use std::path::Path;

/// Read and parse a UVL file.
pub fn read_model(path: impl AsRef<Path>) -> Result<FeatureModel, UvlError> {
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

/// Parse a UVL document.
pub fn parse(source: &str) -> Result<FeatureModel, UvlError> {
    let lines = scan_lines(source);

    if lines.is_empty() {
        return Err(UvlError::EmptyModel);
    }
    if lines[0].text != "features" {
        return Err(UvlError::syntax(
            lines[0].number,
            format!("expected 'features', found '{}'", lines[0].text),
        ));
    }
    let header_indent = lines[0].indent;
    let idx = 1;

    if idx >= lines.len() || lines[idx].indent <= header_indent {
        return Err(UvlError::EmptyModel);
    }

    let (root, mut idx) = parse_feature(&lines, idx)?;

    // Nothing but a `constraints` section may follow the tree.
    let mut constraints = Vec::new();
    if idx < lines.len() {
        let line = &lines[idx];
        if line.text != "constraints" {
            return Err(UvlError::syntax(
                line.number,
                format!("expected 'constraints', found '{}'", line.text),
            ));
        }
        let section_indent = line.indent;
        idx += 1;
        while idx < lines.len() && lines[idx].indent > section_indent {
            constraints.push(parse_constraint(&lines[idx])?);
            idx += 1;
        }
        if idx < lines.len() {
            return Err(UvlError::syntax(
                lines[idx].number,
                format!("unexpected content after constraints: '{}'", lines[idx].text),
            ));
        }
    }

    Ok(FeatureModel { root, constraints })
}

struct Line {
    indent: usize,
    text: String,
    number: usize,
}

fn scan_lines(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                return None;
            }
            let indent = raw.len() - raw.trim_start().len();
            Some(Line {
                indent,
                text: trimmed.to_string(),
                number: i + 1,
            })
        })
        .collect()
}

/// Parse the feature at `lines[idx]` together with its subtree. Returns the
/// feature and the index of the first line past the subtree.
fn parse_feature(lines: &[Line], idx: usize) -> Result<(Feature, usize), UvlError> {
    let line = &lines[idx];
    let name = parse_feature_name(line)?;
    let feature_indent = line.indent;

    let mut groups = Vec::new();
    let mut i = idx + 1;
    while i < lines.len() && lines[i].indent > feature_indent {
        let group_line = &lines[i];
        let kind = match group_line.text.as_str() {
            "mandatory" => GroupKind::Mandatory,
            "optional" => GroupKind::Optional,
            "or" => GroupKind::Or,
            "alternative" => GroupKind::Alternative,
            other => {
                return Err(UvlError::syntax(
                    group_line.number,
                    format!("expected a group keyword, found '{}'", other),
                ));
            },
        };
        let group_indent = group_line.indent;
        i += 1;

        let mut children = Vec::new();
        while i < lines.len() && lines[i].indent > group_indent {
            let (child, next) = parse_feature(lines, i)?;
            children.push(child);
            i = next;
        }
        if children.is_empty() {
            return Err(UvlError::syntax(group_line.number, "group has no children"));
        }
        groups.push(Group { kind, children });
    }

    Ok((Feature { name, groups }, i))
}

/// The name token at the start of a feature line. Attribute blocks and
/// anything after the name are ignored.
fn parse_feature_name(line: &Line) -> Result<String, UvlError> {
    let text = line.text.as_str();
    if let Some(rest) = text.strip_prefix('"') {
        match rest.find('"') {
            Some(end) => Ok(format!("\"{}\"", &rest[..end])),
            None => Err(UvlError::syntax(line.number, "unterminated quoted feature name")),
        }
    } else {
        let end = text
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(text.len());
        if end == 0 {
            return Err(UvlError::syntax(line.number, "missing feature name"));
        }
        Ok(text[..end].to_string())
    }
}

// ---------------------------------------------------------------------------
// Constraint expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Var(String),
    Not,
    And,
    Or,
    Implies,
    Equiv,
    LParen,
    RParen,
}

fn parse_constraint(line: &Line) -> Result<Expr, UvlError> {
    let tokens = tokenize(line)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        line: line.number,
    };
    let expr = parser.parse_equiv()?;
    if parser.pos != parser.tokens.len() {
        return Err(UvlError::syntax(line.number, "trailing tokens in constraint"));
    }
    Ok(expr)
}

fn tokenize(line: &Line) -> Result<Vec<Token>, UvlError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = line.text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            },
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            },
            '!' | '~' => {
                tokens.push(Token::Not);
                i += 1;
            },
            '&' => {
                tokens.push(Token::And);
                i += 1;
            },
            '|' => {
                tokens.push(Token::Or);
                i += 1;
            },
            '=' => {
                if chars.get(i + 1) == Some(&'>') {
                    tokens.push(Token::Implies);
                    i += 2;
                } else {
                    return Err(UvlError::syntax(line.number, "expected '=>'"));
                }
            },
            '<' => {
                if chars.get(i + 1) == Some(&'=') && chars.get(i + 2) == Some(&'>') {
                    tokens.push(Token::Equiv);
                    i += 3;
                } else {
                    return Err(UvlError::syntax(line.number, "expected '<=>'"));
                }
            },
            '"' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j] != '"' {
                    j += 1;
                }
                if j >= chars.len() {
                    return Err(UvlError::syntax(line.number, "unterminated quoted name"));
                }
                let name: String = chars[i..=j].iter().collect();
                tokens.push(Token::Var(name));
                i = j + 1;
            },
            c if c.is_alphanumeric() || c == '_' => {
                let mut j = i;
                while j < chars.len()
                    && (chars[j].is_alphanumeric() || chars[j] == '_' || chars[j] == '.')
                {
                    j += 1;
                }
                let name: String = chars[i..j].iter().collect();
                tokens.push(Token::Var(name));
                i = j;
            },
            other => {
                return Err(UvlError::syntax(
                    line.number,
                    format!("unexpected character '{}' in constraint", other),
                ));
            },
        }
    }
    Ok(tokens)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_equiv(&mut self) -> Result<Expr, UvlError> {
        let left = self.parse_implies()?;
        if self.peek() == Some(&Token::Equiv) {
            self.bump();
            let right = self.parse_equiv()?;
            return Ok(Expr::Equiv(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_implies(&mut self) -> Result<Expr, UvlError> {
        let left = self.parse_or()?;
        if self.peek() == Some(&Token::Implies) {
            self.bump();
            // Right associative: a => b => c is a => (b => c).
            let right = self.parse_implies()?;
            return Ok(Expr::Implies(Box::new(left), Box::new(right)));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, UvlError> {
        let mut expr = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.bump();
            let right = self.parse_and()?;
            expr = Expr::Or(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, UvlError> {
        let mut expr = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.bump();
            let right = self.parse_unary()?;
            expr = Expr::And(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<Expr, UvlError> {
        match self.bump() {
            Some(Token::Not) => Ok(Expr::Not(Box::new(self.parse_unary()?))),
            Some(Token::Var(name)) => Ok(Expr::Var(name)),
            Some(Token::LParen) => {
                let expr = self.parse_equiv()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(UvlError::syntax(self.line, "missing closing parenthesis")),
                }
            },
            _ => Err(UvlError::syntax(self.line, "expected a feature name")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: &str = "features\n    Chat\n        mandatory\n            Connection\n                alternative\n                    \"Peer 2 Peer\"\n                    Server\n            Messages\n                or\n                    Text\n                    Video\n                    Audio\n        optional\n            \"Data Storage\"\n            \"Media Player\"\n\nconstraints\n    Server => \"Data Storage\"\n    Video | Audio => \"Media Player\"\n";

    #[test]
    fn test_parse_chat_model() {
        let model = parse(CHAT).unwrap();
        assert_eq!(model.root.name, "Chat");
        assert_eq!(model.root.groups.len(), 2);
        assert_eq!(model.root.groups[0].kind, GroupKind::Mandatory);
        assert_eq!(model.root.groups[1].kind, GroupKind::Optional);
        assert_eq!(
            model.feature_names(),
            vec![
                "Chat",
                "Connection",
                "\"Peer 2 Peer\"",
                "Server",
                "Messages",
                "Text",
                "Video",
                "Audio",
                "\"Data Storage\"",
                "\"Media Player\"",
            ]
        );
        assert_eq!(model.constraints.len(), 2);
    }

    #[test]
    fn test_parse_constraint_precedence() {
        let model = parse("features\n    A\n        optional\n            B\n            C\nconstraints\n    A | B => C\n").unwrap();
        // `|` binds tighter than `=>`.
        match &model.constraints[0] {
            Expr::Implies(left, _) => assert!(matches!(**left, Expr::Or(_, _))),
            other => panic!("unexpected expression: {:?}", other),
        }
    }

    #[test]
    fn test_missing_features_header() {
        let err = parse("tree\n    A\n").unwrap_err();
        assert!(matches!(err, UvlError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(parse(""), Err(UvlError::EmptyModel)));
        assert!(matches!(parse("features\n"), Err(UvlError::EmptyModel)));
    }

    #[test]
    fn test_group_without_children() {
        let err = parse("features\n    A\n        mandatory\n").unwrap_err();
        assert!(matches!(err, UvlError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_unknown_group_keyword() {
        let err = parse("features\n    A\n        sometimes\n            B\n").unwrap_err();
        match err {
            UvlError::Syntax { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("sometimes"));
            },
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_quote_in_constraint() {
        let err =
            parse("features\n    A\n        optional\n            B\nconstraints\n    A => \"B\n")
                .unwrap_err();
        assert!(matches!(err, UvlError::Syntax { line: 6, .. }));
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let model = parse("// header comment\nfeatures\n\n    A\n        optional\n            B\n").unwrap();
        assert_eq!(model.feature_names(), vec!["A", "B"]);
    }
}
