// src/expect/mod.rs

//! Expectations registered on a [`CommandExpectation`](crate::CommandExpectation)
//! and the engine that evaluates them once the process has finished.
//!
//! - [`Expectation`] is the tagged record appended by each `expect*` call.
//! - [`Matcher`] decides how stream content is compared.
//! - [`evaluate`] walks the expectations in declaration order and stops at
//!   the first failure.

pub mod evaluate;

use regex::Regex;

use crate::types::Stream;

pub use evaluate::evaluate;

/// How the content of a captured stream is checked.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact string equality.
    Exact(String),
    /// Regular-expression match anywhere in the stream.
    Pattern(Regex),
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::Exact(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Matcher::Exact(s)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Matcher::Pattern(re)
    }
}

impl From<&Regex> for Matcher {
    fn from(re: &Regex) -> Self {
        Matcher::Pattern(re.clone())
    }
}

/// A single declared check against the completed process.
#[derive(Debug, Clone)]
pub enum Expectation {
    ExitCode(i32),
    Stream { stream: Stream, matcher: Matcher },
}

impl Expectation {
    pub fn exit_code(code: i32) -> Self {
        Expectation::ExitCode(code)
    }

    pub fn stream(stream: Stream, matcher: impl Into<Matcher>) -> Self {
        Expectation::Stream {
            stream,
            matcher: matcher.into(),
        }
    }

    /// Stream expectation addressed by name (`"stdout"` or `"stderr"`).
    pub fn named_stream(stream: &str, matcher: impl Into<Matcher>) -> Result<Self, String> {
        Ok(Expectation::stream(stream.parse()?, matcher))
    }
}

impl From<i32> for Expectation {
    fn from(code: i32) -> Self {
        Expectation::ExitCode(code)
    }
}

impl<M: Into<Matcher>> From<(Stream, M)> for Expectation {
    fn from((stream, matcher): (Stream, M)) -> Self {
        Expectation::stream(stream, matcher)
    }
}
