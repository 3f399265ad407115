//! Object id specifications and lazy resolution.

use std::str::FromStr;

use crate::error::MetError;

/// One token of a comma-separated id specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSegment {
    /// A single object id
    Id(u64),
    /// An inclusive ascending range
    Range(u64, u64),
}

/// A specification of which object ids to query.
///
/// The shape is decided once at the boundary (CLI argument or caller
/// input); downstream code only ever sees the resolved [`IdStream`].
/// Resolved ids are always positive: zero tokens are rejected at parse
/// time, and the integer `0` (or an absent input) means [`IdSpec::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdSpec {
    /// Every object in the collection, `1..=total`
    All,
    /// Exactly one object
    Single(u64),
    /// An explicit list, emitted as given (order preserved, no dedup)
    List(Vec<u64>),
    /// Parsed comma/range tokens, emitted in token order
    Segments(Vec<IdSegment>),
}

impl IdSpec {
    /// Whether resolving this spec requires the collection total first.
    pub fn needs_total(&self) -> bool {
        matches!(self, IdSpec::All)
    }

    /// Resolve into a lazy stream of ids. `total` is consulted only for
    /// [`IdSpec::All`]; ranges are never materialized.
    pub fn resolve(&self, total: u64) -> IdStream {
        match self {
            IdSpec::All => IdStream::new(1..=total),
            IdSpec::Single(id) => IdStream::new(std::iter::once(*id)),
            IdSpec::List(ids) => IdStream::new(ids.clone().into_iter()),
            IdSpec::Segments(segments) => {
                IdStream::new(segments.clone().into_iter().flat_map(|segment| {
                    match segment {
                        IdSegment::Id(id) => id..=id,
                        IdSegment::Range(start, end) => start..=end,
                    }
                }))
            }
        }
    }
}

impl From<u64> for IdSpec {
    /// `0` is the whole-collection sentinel, anything else a single id.
    fn from(id: u64) -> Self {
        if id == 0 {
            IdSpec::All
        } else {
            IdSpec::Single(id)
        }
    }
}

impl From<Vec<u64>> for IdSpec {
    fn from(ids: Vec<u64>) -> Self {
        IdSpec::List(ids)
    }
}

impl FromStr for IdSpec {
    type Err = MetError;

    /// Parse a comma-separated specification: each token is either a
    /// plain id or an inclusive range `"a-b"`. `"0"` and `"all"` select
    /// the whole collection.
    fn from_str(s: &str) -> Result<Self, MetError> {
        let spec = s.trim();
        if spec.is_empty() {
            return Err(MetError::InvalidInput("empty id specification".to_string()));
        }
        if spec == "0" || spec.eq_ignore_ascii_case("all") {
            return Ok(IdSpec::All);
        }

        let mut segments = Vec::new();
        for token in spec.split(',') {
            let token = token.trim();
            match token.split_once('-') {
                Some((start, end)) => {
                    let start = parse_id(start)?;
                    let end = parse_id(end)?;
                    if start > end {
                        return Err(MetError::Parse(format!("reversed range: {:?}", token)));
                    }
                    segments.push(IdSegment::Range(start, end));
                }
                None => segments.push(IdSegment::Id(parse_id(token)?)),
            }
        }

        if let [IdSegment::Id(id)] = segments[..] {
            return Ok(IdSpec::Single(id));
        }
        Ok(IdSpec::Segments(segments))
    }
}

fn parse_id(token: &str) -> Result<u64, MetError> {
    let token = token.trim();
    let id = token
        .parse::<u64>()
        .map_err(|_| MetError::Parse(format!("not an object id: {:?}", token)))?;
    if id == 0 {
        return Err(MetError::Parse(format!(
            "object ids are positive: {:?}",
            token
        )));
    }
    Ok(id)
}

/// A lazy, ordered stream of resolved object ids.
pub struct IdStream(Box<dyn Iterator<Item = u64> + Send>);

impl IdStream {
    fn new(iter: impl Iterator<Item = u64> + Send + 'static) -> Self {
        IdStream(Box::new(iter))
    }
}

impl Iterator for IdStream {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.0.next()
    }
}
