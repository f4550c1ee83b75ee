//! Property tests for the scan and lookup rules.
//!
//! - A burst with every gap under the inactivity window emits exactly one
//!   trimmed barcode.
//! - A gap at or above the window keeps only what was typed after it.
//! - However responses are ordered, the state reflects the last submission.

use std::time::{Duration, Instant};

use pricecheck_core::scanner::{aggregate, KeyInput};
use pricecheck_core::{
    Barcode, LookupOutcome, LookupState, LookupTracker, ProductPage, ProductRecord,
    DEFAULT_INACTIVITY_MS,
};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// Printable text with no surrounding whitespace.
fn code_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[!-~]([ -~]{0,30}[!-~])?").unwrap()
}

/// Spaces a scanner or a sloppy config may add around the code.
fn padding_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex(" {0,3}").unwrap()
}

/// Any printable text, possibly blank.
fn noise_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~]{1,20}").unwrap()
}

fn fast_gap_strategy() -> impl Strategy<Value = u64> {
    0..DEFAULT_INACTIVITY_MS
}

fn slow_gap_strategy() -> impl Strategy<Value = u64> {
    DEFAULT_INACTIVITY_MS..10 * DEFAULT_INACTIVITY_MS
}

fn outcome_strategy() -> impl Strategy<Value = LookupOutcome> {
    prop_oneof![
        "[A-Za-z][A-Za-z0-9 ]{0,20}".prop_map(|name| LookupOutcome::Answered(ProductPage {
            results: vec![ProductRecord {
                name: Some(name),
                ..Default::default()
            }],
            count: 1,
            total: 1,
        })),
        Just(LookupOutcome::Answered(ProductPage::default())),
        "[ -~]{0,30}".prop_map(LookupOutcome::Failed),
    ]
}

/// Stamps each char with the running sum of `gaps`, starting at `start`.
fn typed(text: &str, gaps: &[u64], start: Instant) -> (Vec<(KeyInput, Instant)>, Instant) {
    let mut at = start;
    let mut events = Vec::new();
    for (c, gap) in text.chars().zip(gaps.iter().cycle()) {
        at += Duration::from_millis(*gap);
        events.push((KeyInput::Char(c), at));
    }
    (events, at)
}

// =============================================================================
// AGGREGATOR PROPERTIES
// =============================================================================

mod aggregator_properties {
    use super::*;

    proptest! {
        /// Sub-threshold gaps: one barcode, equal to the trimmed text
        #[test]
        fn fast_burst_emits_trimmed_code_once(
            lead in padding_strategy(),
            code in code_strategy(),
            trail in padding_strategy(),
            gaps in prop::collection::vec(fast_gap_strategy(), 1..40),
        ) {
            let text = format!("{}{}{}", lead, code, trail);
            let t0 = Instant::now();
            let (mut events, last) = typed(&text, &gaps, t0);
            events.push((KeyInput::Enter, last + Duration::from_millis(gaps[0])));

            let codes = aggregate(events);
            prop_assert_eq!(codes, vec![Barcode::new(&code).unwrap()]);
        }

        /// A long pause drops everything typed before it
        #[test]
        fn gap_keeps_only_suffix(
            noise in noise_strategy(),
            code in code_strategy(),
            trail in padding_strategy(),
            noise_gaps in prop::collection::vec(fast_gap_strategy(), 1..10),
            code_gaps in prop::collection::vec(fast_gap_strategy(), 1..10),
            pause in slow_gap_strategy(),
        ) {
            let t0 = Instant::now();
            let (mut events, noise_end) = typed(&noise, &noise_gaps, t0);

            let suffix = format!("{}{}", code, trail);
            let resume = noise_end + Duration::from_millis(pause);
            let (rest, last) = typed(&suffix, &code_gaps, resume);
            events.extend(rest);
            events.push((KeyInput::Enter, last));

            let codes = aggregate(events);
            prop_assert_eq!(codes, vec![Barcode::new(&code).unwrap()]);
        }

        /// Non-printable keys never add to or break up a scan
        #[test]
        fn other_keys_are_transparent(
            code in code_strategy(),
            gaps in prop::collection::vec(fast_gap_strategy(), 1..20),
            noise_at in prop::collection::vec(any::<bool>(), 1..20),
        ) {
            let t0 = Instant::now();
            let (chars, last) = typed(&code, &gaps, t0);
            let mut events = Vec::new();
            for (i, (key, at)) in chars.into_iter().enumerate() {
                events.push((key, at));
                if noise_at[i % noise_at.len()] {
                    events.push((KeyInput::Other, at));
                }
            }
            events.push((KeyInput::Enter, last));

            let codes = aggregate(events);
            prop_assert_eq!(codes, vec![Barcode::new(&code).unwrap()]);
        }
    }
}

// =============================================================================
// TRACKER PROPERTIES
// =============================================================================

mod tracker_properties {
    use super::*;

    /// Outcomes for `n` submissions plus a completion order over them.
    fn submissions_strategy() -> impl Strategy<Value = (Vec<LookupOutcome>, Vec<usize>)> {
        (2usize..6).prop_flat_map(|n| {
            (
                prop::collection::vec(outcome_strategy(), n),
                Just((0..n).collect::<Vec<_>>()).prop_shuffle(),
            )
        })
    }

    proptest! {
        /// Whatever order responses arrive in, the latest submission wins
        #[test]
        fn last_submission_wins_in_any_order(
            (outcomes, order) in submissions_strategy(),
        ) {
            let mut tracker = LookupTracker::new();
            let tickets: Vec<_> = (0..outcomes.len())
                .map(|i| tracker.begin(Barcode::new(&format!("77020{:02}", i)).unwrap()))
                .collect();
            let latest = outcomes.len() - 1;

            for &i in &order {
                let applied = tracker.complete(&tickets[i], outcomes[i].clone());
                prop_assert_eq!(applied, i == latest);
            }

            let expected = outcomes[latest].clone().into_state();
            let latest_code = format!("77020{:02}", latest);
            prop_assert_eq!(tracker.state(), &expected);
            prop_assert_eq!(tracker.current_barcode().map(Barcode::as_str), Some(latest_code.as_str()));
        }

        /// After a reset nothing in flight can leave Idle
        #[test]
        fn reset_discards_every_pending_result(
            (outcomes, order) in submissions_strategy(),
        ) {
            let mut tracker = LookupTracker::new();
            let tickets: Vec<_> = (0..outcomes.len())
                .map(|i| tracker.begin(Barcode::new(&format!("{}", i + 1)).unwrap()))
                .collect();
            tracker.reset();

            for &i in &order {
                prop_assert!(!tracker.complete(&tickets[i], outcomes[i].clone()));
            }
            prop_assert_eq!(tracker.state(), &LookupState::Idle);
            prop_assert!(tracker.current_barcode().is_none());
        }
    }
}
