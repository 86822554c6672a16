// Copyright (c) 2025 - Cowboy AI, Inc.
//! Combinator Trees
//!
//! A `CombinatorTree` describes how the two leaf inputs are combined. It is
//! plain data: built by wrapping existing subtrees, compared structurally,
//! serialized freely. Children are owned boxes, so a tree is always finite
//! and acyclic.
//!
//! # Pretty Form
//!
//! ```text
//! input1
//! merge(input1, input2)
//! zip(input1, chain(input2, input1))
//! combineLatest(input1, input2).adjacentPairs()
//! ```
//!
//! The pretty form parses back into the same tree; `adjacentPairs(x)`,
//! `first` and `second` are accepted as alternative spellings.
//!
//! # Examples
//!
//! ```rust,ignore
//! let tree = CombinatorTree::first()
//!     .zip(CombinatorTree::second())
//!     .adjacent_pairs();
//!
//! assert_eq!(tree.to_string(), "zip(input1, input2).adjacentPairs()");
//! assert_eq!(tree.to_string().parse::<CombinatorTree>()?, tree);
//! ```

use crate::errors::{StreamError, StreamResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two leaf inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    First,
    Second,
}

/// Recursive description of a combinator expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinatorTree {
    Input(Input),
    Merge(Box<CombinatorTree>, Box<CombinatorTree>),
    Chain(Box<CombinatorTree>, Box<CombinatorTree>),
    Zip(Box<CombinatorTree>, Box<CombinatorTree>),
    CombineLatest(Box<CombinatorTree>, Box<CombinatorTree>),
    AdjacentPairs(Box<CombinatorTree>),
}

impl CombinatorTree {
    /// Leaf over the first input
    pub fn first() -> Self {
        CombinatorTree::Input(Input::First)
    }

    /// Leaf over the second input
    pub fn second() -> Self {
        CombinatorTree::Input(Input::Second)
    }

    pub fn merge(self, other: CombinatorTree) -> Self {
        CombinatorTree::Merge(Box::new(self), Box::new(other))
    }

    pub fn chain(self, other: CombinatorTree) -> Self {
        CombinatorTree::Chain(Box::new(self), Box::new(other))
    }

    pub fn zip(self, other: CombinatorTree) -> Self {
        CombinatorTree::Zip(Box::new(self), Box::new(other))
    }

    pub fn combine_latest(self, other: CombinatorTree) -> Self {
        CombinatorTree::CombineLatest(Box::new(self), Box::new(other))
    }

    pub fn adjacent_pairs(self) -> Self {
        CombinatorTree::AdjacentPairs(Box::new(self))
    }

    /// Name of the node's combinator
    pub fn kind(&self) -> &'static str {
        match self {
            CombinatorTree::Input(Input::First) => "input1",
            CombinatorTree::Input(Input::Second) => "input2",
            CombinatorTree::Merge(..) => "merge",
            CombinatorTree::Chain(..) => "chain",
            CombinatorTree::Zip(..) => "zip",
            CombinatorTree::CombineLatest(..) => "combineLatest",
            CombinatorTree::AdjacentPairs(_) => "adjacentPairs",
        }
    }

    /// Longest path from this node to a leaf, counting nodes
    pub fn depth(&self) -> usize {
        match self {
            CombinatorTree::Input(_) => 1,
            CombinatorTree::AdjacentPairs(inner) => 1 + inner.depth(),
            CombinatorTree::Merge(l, r)
            | CombinatorTree::Chain(l, r)
            | CombinatorTree::Zip(l, r)
            | CombinatorTree::CombineLatest(l, r) => 1 + l.depth().max(r.depth()),
        }
    }
}

impl fmt::Display for CombinatorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombinatorTree::Input(_) => f.write_str(self.kind()),
            CombinatorTree::AdjacentPairs(inner) => write!(f, "{inner}.adjacentPairs()"),
            CombinatorTree::Merge(l, r)
            | CombinatorTree::Chain(l, r)
            | CombinatorTree::Zip(l, r)
            | CombinatorTree::CombineLatest(l, r) => write!(f, "{}({l}, {r})", self.kind()),
        }
    }
}

impl FromStr for CombinatorTree {
    type Err = StreamError;

    fn from_str(s: &str) -> StreamResult<Self> {
        let mut parser = Parser { src: s, pos: 0 };
        let tree = parser.expression()?;
        parser.skip_whitespace();
        if parser.pos < s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(tree)
    }
}

/// Recursive-descent parser over the pretty form
///
/// ```text
/// expression := primary ( "." "adjacentPairs" "(" ")" )*
/// primary    := "input1" | "input2" | "first" | "second"
///             | binary "(" expression "," expression ")"
///             | "adjacentPairs" "(" expression ")"
/// binary     := "merge" | "chain" | "zip" | "combineLatest"
/// ```
struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn expression(&mut self) -> StreamResult<CombinatorTree> {
        let mut tree = self.primary()?;
        loop {
            self.skip_whitespace();
            if !self.eat('.') {
                return Ok(tree);
            }
            let start = self.pos;
            let name = self.identifier()?;
            if name != "adjacentPairs" {
                self.pos = start;
                return Err(self.error(&format!("unknown method '{name}'")));
            }
            self.expect('(')?;
            self.expect(')')?;
            tree = tree.adjacent_pairs();
        }
    }

    fn primary(&mut self) -> StreamResult<CombinatorTree> {
        let start = self.pos;
        let name = self.identifier()?;
        let build: fn(CombinatorTree, CombinatorTree) -> CombinatorTree = match name {
            "input1" | "first" => return Ok(CombinatorTree::first()),
            "input2" | "second" => return Ok(CombinatorTree::second()),
            "adjacentPairs" => {
                self.expect('(')?;
                let inner = self.expression()?;
                self.expect(')')?;
                return Ok(inner.adjacent_pairs());
            }
            "merge" => CombinatorTree::merge,
            "chain" => CombinatorTree::chain,
            "zip" => CombinatorTree::zip,
            "combineLatest" => CombinatorTree::combine_latest,
            other => {
                self.pos = start;
                return Err(self.error(&format!("unknown stream '{other}'")));
            }
        };

        self.expect('(')?;
        let left = self.expression()?;
        self.expect(',')?;
        let right = self.expression()?;
        self.expect(')')?;
        Ok(build(left, right))
    }

    fn identifier(&mut self) -> StreamResult<&'a str> {
        self.skip_whitespace();
        let src = self.src;
        let rest = &src[self.pos..];
        let len = rest
            .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a stream name"));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&src[start..self.pos])
    }

    fn expect(&mut self, c: char) -> StreamResult<()> {
        self.skip_whitespace();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn eat(&mut self, c: char) -> bool {
        if self.src[self.pos..].starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn error(&self, message: &str) -> StreamError {
        StreamError::Parse {
            offset: self.pos,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn sample_tree() -> CombinatorTree {
        CombinatorTree::first()
            .merge(CombinatorTree::second())
            .zip(CombinatorTree::second().adjacent_pairs())
            .combine_latest(CombinatorTree::first().chain(CombinatorTree::second()))
    }

    #[test]
    fn test_display() {
        assert_eq!(
            sample_tree().to_string(),
            "combineLatest(zip(merge(input1, input2), input2.adjacentPairs()), chain(input1, input2))"
        );
    }

    #[test]
    fn test_display_parses_back() {
        let tree = sample_tree().adjacent_pairs();
        let parsed: CombinatorTree = tree.to_string().parse().unwrap();
        assert_eq!(parsed, tree);
    }

    #[test_case("input1", CombinatorTree::first() ; "leaf")]
    #[test_case("second", CombinatorTree::second() ; "leaf alias")]
    #[test_case(" merge ( input1 ,input2 ) ", CombinatorTree::first().merge(CombinatorTree::second()) ; "whitespace")]
    #[test_case("adjacentPairs(input1)", CombinatorTree::first().adjacent_pairs() ; "prefix adjacent pairs")]
    #[test_case("input2.adjacentPairs().adjacentPairs()", CombinatorTree::second().adjacent_pairs().adjacent_pairs() ; "chained methods")]
    #[test_case("zip(input1, combineLatest(input2, input1))", CombinatorTree::first().zip(CombinatorTree::second().combine_latest(CombinatorTree::first())) ; "nested")]
    fn test_parse(src: &str, expected: CombinatorTree) {
        assert_eq!(src.parse::<CombinatorTree>().unwrap(), expected);
    }

    #[test_case("", 0 ; "empty")]
    #[test_case("input3", 0 ; "unknown leaf")]
    #[test_case("merge(input1)", 12 ; "missing operand")]
    #[test_case("input1.reverse()", 7 ; "unknown method")]
    #[test_case("input1 input2", 7 ; "trailing input")]
    fn test_parse_errors(src: &str, expected_offset: usize) {
        match src.parse::<CombinatorTree>() {
            Err(StreamError::Parse { offset, .. }) => assert_eq!(offset, expected_offset),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_and_kind() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 4);
        assert_eq!(tree.kind(), "combineLatest");
        assert_eq!(CombinatorTree::first().depth(), 1);
    }

    #[test]
    fn test_serde_round_trip() {
        let tree = sample_tree();
        let json = serde_json::to_string(&tree).unwrap();
        let back: CombinatorTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
