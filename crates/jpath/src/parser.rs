//! A `nom`-based parser for source paths.
//!
//! Grammar: a first step that is a key, a fixed index or the placeholder,
//! followed by any number of `.key`, `[n]` or placeholder steps.
use super::ast::{PathExpr, PathSegment};
use crate::error::JPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, u64 as nom_u64},
    combinator::map,
    sequence::{delimited, preceded},
};

/// The default repetition placeholder token.
pub const DEFAULT_PLACEHOLDER: &str = "[_ID_]";

/// Parses a source path, recognising `placeholder` as the repetition token.
pub fn parse_path(input: &str, placeholder: &str) -> Result<PathExpr, JPathError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JPathError::Empty);
    }

    let mut segments = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let step = if segments.is_empty() {
            first_segment(rest, placeholder)
        } else {
            next_segment(rest, placeholder)
        };
        match step {
            Ok((remaining, segment)) => {
                segments.push(segment);
                rest = remaining;
            }
            Err(e) => {
                return Err(JPathError::Parse(
                    input.to_string(),
                    format!("unexpected input at '{}': {}", rest, e),
                ));
            }
        }
    }

    Ok(PathExpr::new(trimmed, segments))
}

// --- Combinators ---

/// Key text runs up to the next `.`, `[` or `]`; anything else is part of the key.
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !matches!(c, '.' | '[' | ']')).parse(input)
}

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s: &str| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    map(delimited(char('['), nom_u64, char(']')), |i| {
        PathSegment::Index(i as usize)
    })
    .parse(input)
}

fn each_segment<'a>(input: &'a str, placeholder: &str) -> IResult<&'a str, PathSegment> {
    map(tag(placeholder), |_| PathSegment::Each).parse(input)
}

fn first_segment<'a>(input: &'a str, placeholder: &str) -> IResult<&'a str, PathSegment> {
    alt((
        |i: &'a str| each_segment(i, placeholder),
        index_segment,
        map(identifier, |s: &str| PathSegment::Key(s.to_string())),
    ))
    .parse(input)
}

fn next_segment<'a>(input: &'a str, placeholder: &str) -> IResult<&'a str, PathSegment> {
    alt((|i: &'a str| each_segment(i, placeholder), index_segment, key_segment)).parse(input)
}
