// src/expect/evaluate.rs

use tracing::debug;

use crate::errors::AssertionError;
use crate::exec::ProcessReport;
use crate::types::Stream;

use super::{Expectation, Matcher};

/// Check `expectations` against `report` in declaration order.
///
/// Evaluation is fail-fast: the first expectation that does not hold is
/// returned and the remaining ones are never looked at. An empty list always
/// passes, even when the report carries a process error.
pub fn evaluate(
    expectations: &[Expectation],
    report: &ProcessReport,
) -> Result<(), AssertionError> {
    expectations.iter().try_for_each(|expectation| {
        let res = check(expectation, report);
        debug!(?expectation, passed = res.is_ok(), "evaluated expectation");
        res
    })
}

fn check(expectation: &Expectation, report: &ProcessReport) -> Result<(), AssertionError> {
    match expectation {
        Expectation::ExitCode(expected) => {
            let actual = report.exit_code();
            if actual != *expected {
                return Err(AssertionError::ExitCode {
                    expected: *expected,
                    actual,
                });
            }
            Ok(())
        }
        Expectation::Stream { stream, matcher } => {
            check_stream(*stream, matcher, report.stream(*stream))
        }
    }
}

fn check_stream(stream: Stream, matcher: &Matcher, actual: &str) -> Result<(), AssertionError> {
    match matcher {
        Matcher::Pattern(re) if !re.is_match(actual) => Err(AssertionError::StreamMismatch {
            stream,
            pattern: re.as_str().to_string(),
            actual: actual.to_string(),
        }),
        Matcher::Exact(expected) if expected != actual => Err(AssertionError::StreamNotEqual {
            stream,
            expected: expected.clone(),
            actual: actual.to_string(),
        }),
        _ => Ok(()),
    }
}
