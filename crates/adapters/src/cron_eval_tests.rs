// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

use super::*;
use cronspine_core::test_support::utc;
use yare::parameterized;

#[test]
fn does_not_match_the_after_instant_itself() {
    let eval = SystemCronEvaluator;
    let after = utc(2020, 1, 1, 0, 1, 0);
    let next = eval.next_run_after("0 * * * * * *", after).unwrap();
    assert_eq!(next, utc(2020, 1, 1, 0, 2, 0));
}

#[test]
fn advances_to_next_matching_minute() {
    let eval = SystemCronEvaluator;
    let after = utc(2020, 1, 1, 0, 0, 30);
    let next = eval.next_run_after("0 * * * * * *", after).unwrap();
    assert_eq!(next, utc(2020, 1, 1, 0, 1, 0));
}

#[parameterized(
    garbage = { "not a schedule" },
    empty = { "" },
)]
fn rejects_invalid_expressions(expr: &str) {
    let eval = SystemCronEvaluator;
    let err = eval.next_run_after(expr, utc(2020, 1, 1, 0, 0, 0)).unwrap_err();
    assert!(matches!(err, CronError::InvalidExpression { .. }));
}
