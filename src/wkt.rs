//! A small reader for the `LINESTRING` subset of WKT.
//!
//! ```text
//! linestring := "LINESTRING" ws* "(" pair ("," pair)* ")"
//! pair       := ws* number ws+ number (ws+ number)* ws*
//! ```
//!
//! Pairs that do not hold two finite numbers are skipped, the rest of the
//! string is still read. Extra ordinates (Z/M) are ignored.

use thiserror::Error;

use crate::shared::geo::Coordinate;

const KEYWORD: &str = "LINESTRING";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Geometry is not a LINESTRING: {0}")]
    NotLineString(String),
    #[error("LINESTRING is missing its opening parenthesis")]
    MissingOpen,
    #[error("LINESTRING is missing its closing parenthesis")]
    MissingClose,
}

/// Reads every well-formed coordinate pair out of a `LINESTRING(...)` string.
pub fn parse_linestring(input: &str) -> Result<Vec<Coordinate>, self::Error> {
    let body = linestring_body(input)?;
    Ok(body.split(',').filter_map(parse_pair).collect())
}

fn linestring_body(input: &str) -> Result<&str, self::Error> {
    let input = input.trim();
    let rest = input
        .strip_prefix(KEYWORD)
        .ok_or_else(|| self::Error::NotLineString(preview(input)))?;
    let rest = rest
        .trim_start()
        .strip_prefix('(')
        .ok_or(self::Error::MissingOpen)?;
    rest.strip_suffix(')').ok_or(self::Error::MissingClose)
}

fn parse_pair(pair: &str) -> Option<Coordinate> {
    let mut numbers = pair.split_whitespace();
    let longitude: f64 = numbers.next()?.parse().ok()?;
    let latitude: f64 = numbers.next()?.parse().ok()?;
    let coordinate = Coordinate::new(longitude, latitude);
    coordinate.is_finite().then_some(coordinate)
}

fn preview(input: &str) -> String {
    input.chars().take(32).collect()
}

#[test]
fn parse_simple_test() {
    let points = parse_linestring("LINESTRING(37.6 55.7, 37.61 55.71)").unwrap();
    assert_eq!(
        points,
        vec![Coordinate::new(37.6, 55.7), Coordinate::new(37.61, 55.71)]
    );
}

#[test]
fn parse_skips_bad_pairs_test() {
    let points = parse_linestring("LINESTRING(abc def, 37.6 55.7,37.7, 1 inf, 37.8 55.8)").unwrap();
    assert_eq!(
        points,
        vec![Coordinate::new(37.6, 55.7), Coordinate::new(37.8, 55.8)]
    );
}

#[test]
fn parse_ignores_extra_ordinates_test() {
    let points = parse_linestring("  LINESTRING (37.6  55.7 120.5)  ").unwrap();
    assert_eq!(points, vec![Coordinate::new(37.6, 55.7)]);
}

#[test]
fn parse_empty_body_test() {
    assert!(parse_linestring("LINESTRING()").unwrap().is_empty());
}

#[test]
fn parse_rejects_other_geometry_test() {
    assert!(matches!(
        parse_linestring("POINT(37.6 55.7)"),
        Err(Error::NotLineString(_))
    ));
    assert_eq!(parse_linestring("LINESTRING 37.6 55.7"), Err(Error::MissingOpen));
    assert_eq!(parse_linestring("LINESTRING(37.6 55.7"), Err(Error::MissingClose));
}
