//! Parser for the composite notation, e.g. `Branch(Branch(Leaf Leaf) Leaf)`.
//!
//! Whitespace around tokens is ignored. Once a branch label and its opening
//! bracket have matched, the parser commits to a container, so errors point
//! at the offending token instead of the start of the input.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::{all_consuming, cut, opt, value};
use nom::error::{Error, ErrorKind, ParseError};
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use tracing::{debug, instrument};

use crate::domain::builder::Shape;
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::notation::Notation;

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Deepest container nesting accepted by [`parse_shape`].
pub const MAX_NESTING: usize = 128;

fn separator<'a>(input: &'a str, notation: &Notation) -> IResult<&'a str, ()> {
    let sep = notation.separator.trim();
    if notation.separator.is_empty() {
        value((), multispace0)(input)
    } else if sep.is_empty() {
        value((), multispace1)(input)
    } else {
        value((), ws(tag(sep)))(input)
    }
}

fn leaf<'a>(input: &'a str, notation: &Notation) -> IResult<&'a str, Shape> {
    value(Shape::Leaf, tag(notation.leaf.as_str()))(input)
}

fn children<'a>(
    input: &'a str,
    notation: &Notation,
    depth: usize,
) -> IResult<&'a str, Vec<Shape>> {
    let (input, first) = opt(|i: &'a str| shape(i, notation, depth))(input)?;
    let Some(first) = first else {
        return Ok((input, Vec::new()));
    };
    let (input, rest) = many0(preceded(
        |i: &'a str| separator(i, notation),
        |i: &'a str| shape(i, notation, depth),
    ))(input)?;

    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    Ok((input, all))
}

fn container_body<'a>(
    input: &'a str,
    notation: &Notation,
    depth: usize,
) -> IResult<&'a str, Shape> {
    let (input, kids) = children(input, notation, depth)?;
    // trailing whitespace belongs to the next separator
    let (input, _) = preceded(multispace0, tag(notation.close.as_str()))(input)?;
    Ok((input, Shape::Container(kids)))
}

fn container<'a>(input: &'a str, notation: &Notation, depth: usize) -> IResult<&'a str, Shape> {
    let start = input;
    let (input, _) = tag(notation.branch.as_str())(input)?;
    let (input, _) = ws(tag(notation.open.as_str()))(input)?;
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(start, ErrorKind::TooLarge)));
    }
    cut(|i: &'a str| container_body(i, notation, depth + 1))(input)
}

fn shape<'a>(input: &'a str, notation: &Notation, depth: usize) -> IResult<&'a str, Shape> {
    alt((
        |i: &'a str| container(i, notation, depth),
        |i: &'a str| leaf(i, notation),
    ))(input)
}

/// Parses a complete composite expression written in `notation`.
///
/// Containers nested deeper than [`MAX_NESTING`] are rejected.
#[instrument(level = "debug", skip(input, notation), fields(len = input.len()))]
pub fn parse_shape<'a>(input: &'a str, notation: &Notation) -> TreeResult<Shape> {
    notation.validate()?;
    match all_consuming(ws(|i: &'a str| shape(i, notation, 0)))(input) {
        Ok((_, parsed)) => Ok(parsed),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let offset = input.len() - e.input.len();
            debug!(offset, kind = ?e.code, "parse failed");
            let message = if e.code == ErrorKind::TooLarge {
                format!("containers nested deeper than {} levels", MAX_NESTING)
            } else if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else {
                let snippet: String = e.input.chars().take(16).collect();
                format!("unexpected input '{}'", snippet)
            };
            Err(DomainError::Parse { offset, message })
        }
        Err(nom::Err::Incomplete(_)) => Err(DomainError::Parse {
            offset: input.len(),
            message: "unexpected end of input".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf() {
        assert_eq!(parse_shape("Leaf", &Notation::default()), Ok(Shape::Leaf));
        assert_eq!(parse_shape("  Leaf \n", &Notation::default()), Ok(Shape::Leaf));
    }

    #[test]
    fn test_parse_empty_container() {
        assert_eq!(
            parse_shape("Branch()", &Notation::default()),
            Ok(Shape::Container(vec![]))
        );
        assert_eq!(
            parse_shape("Branch( )", &Notation::default()),
            Ok(Shape::Container(vec![]))
        );
    }

    #[test]
    fn test_parse_nested() {
        let parsed = parse_shape("Branch(Branch(Leaf Leaf) Leaf)", &Notation::default()).unwrap();
        assert_eq!(
            parsed,
            Shape::container([Shape::container([Shape::Leaf, Shape::Leaf]), Shape::Leaf])
        );
    }

    #[test]
    fn test_parse_missing_close_points_at_end() {
        let err = parse_shape("Branch(Leaf Leaf", &Notation::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::Parse {
                offset: 16,
                message: "unexpected end of input".to_string()
            }
        );
    }

    #[test]
    fn test_parse_bad_child_points_at_child() {
        let err = parse_shape("Branch(Leaf Lef)", &Notation::default()).unwrap_err();
        match err {
            DomainError::Parse { offset, .. } => assert_eq!(offset, 12),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_trailing_input() {
        let err = parse_shape("Leaf x", &Notation::default()).unwrap_err();
        assert!(matches!(err, DomainError::Parse { offset: 5, .. }));
    }

    #[test]
    fn test_parse_sibling_after_container_needs_separator() {
        assert_eq!(
            parse_shape("Branch(Branch() Leaf)", &Notation::default()),
            Ok(Shape::container([Shape::container([]), Shape::Leaf]))
        );
        assert!(parse_shape("Branch(Branch()Leaf)", &Notation::default()).is_err());
    }

    #[test]
    fn test_parse_empty_separator_allows_adjacent_children() {
        let notation = Notation {
            separator: "".into(),
            ..Notation::default()
        };
        assert_eq!(
            parse_shape("Branch(LeafBranch()Leaf)", &notation),
            Ok(Shape::container([Shape::Leaf, Shape::container([]), Shape::Leaf]))
        );
    }

    #[test]
    fn test_parse_nesting_limit() {
        let at_limit = format!("{}{}", "Branch(".repeat(MAX_NESTING), ")".repeat(MAX_NESTING));
        assert_eq!(
            parse_shape(&at_limit, &Notation::default()).unwrap().depth(),
            MAX_NESTING
        );

        let beyond = MAX_NESTING + 1;
        let too_deep = format!("{}{}", "Branch(".repeat(beyond), ")".repeat(beyond));
        let err = parse_shape(&too_deep, &Notation::default()).unwrap_err();
        assert_eq!(
            err,
            DomainError::Parse {
                offset: MAX_NESTING * "Branch(".len(),
                message: format!("containers nested deeper than {} levels", MAX_NESTING),
            }
        );
    }
}
