// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Statement tokenizer for OBJ and MTL using pest

use super::MeshFormat;
use crate::error::{Location, PartDiffError, Result};
use pest::error::LineColLocation;
use pest::Parser;
use pest_derive::Parser;
use std::str::FromStr;

#[derive(Parser)]
#[grammar = "io/obj.pest"]
struct StatementParser;

/// A single token with its position in the source
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
}

impl<'a> Token<'a> {
    pub fn location(&self) -> Location {
        Location::Line {
            line: self.line,
            column: self.column,
        }
    }
}

/// `keyword argument*` on one line
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement<'a> {
    pub keyword: Token<'a>,
    pub arguments: Vec<Token<'a>>,
}

impl<'a> Statement<'a> {
    pub fn location(&self) -> Location {
        self.keyword.location()
    }

    /// Parse one argument as a number, failing with its position.
    pub fn number<T: FromStr>(&self, format: MeshFormat, index: usize) -> Result<T> {
        let token = self.arguments.get(index).ok_or_else(|| {
            PartDiffError::parse(
                format,
                Some(self.location()),
                format!(
                    "'{}' expects at least {} argument(s), found {}",
                    self.keyword.text,
                    index + 1,
                    self.arguments.len()
                ),
            )
        })?;

        token.text.parse().map_err(|_| {
            PartDiffError::parse(
                format,
                Some(token.location()),
                format!("expected a number, found {:?}", token.text),
            )
        })
    }

    /// Joined argument text, e.g. a group or material name
    pub fn rest(&self) -> String {
        self.arguments
            .iter()
            .map(|token| token.text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decode UTF-8 and split a payload into statements.
pub(crate) fn tokenize(bytes: &[u8], format: MeshFormat) -> Result<Vec<Statement<'_>>> {
    let source = std::str::from_utf8(bytes).map_err(|e| {
        PartDiffError::parse(
            format,
            Some(Location::Offset(e.valid_up_to() as u64)),
            "payload is not valid UTF-8 text",
        )
    })?;

    let mut pairs = StatementParser::parse(Rule::file, source).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        PartDiffError::parse(
            format,
            Some(Location::Line { line, column }),
            e.variant.message().into_owned(),
        )
    })?;

    let mut statements = Vec::new();

    if let Some(file) = pairs.next() {
        for pair in file.into_inner() {
            if pair.as_rule() != Rule::statement {
                continue;
            }

            let mut inner = pair.into_inner().map(|token| {
                let (line, column) = token.as_span().start_pos().line_col();
                Token {
                    text: token.as_str(),
                    line,
                    column,
                }
            });

            if let Some(keyword) = inner.next() {
                statements.push(Statement {
                    keyword,
                    arguments: inner.collect(),
                });
            }
        }
    }

    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_tokenize_skips_comments_and_blank_lines() {
        let source = b"# header\n\nv 1 2 3 # trailing\r\n  f 1/1 2//3 -1\n";
        let statements = tokenize(source, MeshFormat::Obj).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].keyword.text, "v");
        assert_eq!(statements[0].arguments.len(), 3);
        assert_eq!(statements[1].keyword.text, "f");
        assert_eq!(statements[1].keyword.line, 4);
        assert_eq!(statements[1].keyword.column, 3);

        let corners: Vec<&str> = statements[1].arguments.iter().map(|t| t.text).collect();
        assert_eq!(corners, vec!["1/1", "2//3", "-1"]);
    }

    #[test]
    fn test_tokenize_reports_line_of_syntax_error() {
        let err = tokenize(b"v 0 0 0\n3 4 5\n", MeshFormat::Obj).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseError);
        assert_eq!(err.location(), Some(Location::Line { line: 2, column: 1 }));
    }

    #[test]
    fn test_number_errors_point_at_argument() {
        let statements = tokenize(b"v 1 two 3", MeshFormat::Obj).unwrap();
        let err = statements[0].number::<f64>(MeshFormat::Obj, 1).unwrap_err();
        assert_eq!(err.location(), Some(Location::Line { line: 1, column: 5 }));

        let missing = statements[0].number::<f64>(MeshFormat::Obj, 3).unwrap_err();
        assert_eq!(missing.location(), Some(Location::Line { line: 1, column: 1 }));
    }

    #[test]
    fn test_invalid_utf8_reports_offset() {
        let err = tokenize(b"v 1 2 3\n\xff", MeshFormat::Obj).unwrap_err();
        assert_eq!(err.location(), Some(Location::Offset(8)));
    }
}
