// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

use super::*;
use chrono::NaiveDate;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

#[test]
fn fake_clock_advances_utc() {
    let clock = FakeClock::new(epoch());
    clock.advance(Duration::from_secs(60));
    assert_eq!(clock.utc_now(), epoch() + chrono::Duration::seconds(60));
}

#[test]
fn fake_clock_advances_instant_in_step_with_utc() {
    let clock = FakeClock::new(epoch());
    let before = clock.now();
    clock.advance(Duration::from_secs(5));
    assert!(clock.now() >= before + Duration::from_secs(5));
}

#[test]
fn set_utc_moves_instant_forward_only() {
    let clock = FakeClock::new(epoch());
    let before = clock.now();
    clock.set_utc(epoch() + chrono::Duration::seconds(30));
    assert!(clock.now() > before);
    assert_eq!(clock.utc_now(), epoch() + chrono::Duration::seconds(30));
}

#[test]
fn duration_until_future_instant_matches_the_gap() {
    let clock = FakeClock::new(epoch());
    assert_eq!(clock.duration_until(epoch() + chrono::Duration::seconds(90)), Duration::from_secs(90));
}

#[test]
fn duration_until_past_or_present_instant_is_zero() {
    let clock = FakeClock::new(epoch());
    assert_eq!(clock.duration_until(epoch()), Duration::ZERO);
    assert_eq!(clock.duration_until(epoch() - chrono::Duration::seconds(1)), Duration::ZERO);
}
