//! Event and contribution merging.
//!
//! A module for folding events that describe the same occurrence into a single
//! entry. Two events are merged iff their start and end dates are both equal;
//! their contribution lists are unioned, dropping near-duplicate contributions
//! (same last name, similar title).
//!
//! The title similarity rule is deliberately crude: the candidate title is
//! split into whitespace-delimited words and each word is tested for substring
//! membership in the reference title. The matched fraction must strictly
//! exceed [`TITLE_SIMILARITY_THRESHOLD`]. The comparison is case- and
//! punctuation-sensitive, and it will both over-merge titles sharing many
//! short words and under-merge reworded titles. Downstream data depends on
//! these quirks, so the rule must be preserved as-is.
//!
//! # Example
//!
//! ```
//! use confrep::{merge_events, sort_events_desc};
//!
//! # let events = Vec::new();
//! let merged = merge_events(sort_events_desc(events));
//! # let _: Vec<confrep::Event> = merged;
//! ```

use itertools::Itertools;
use tracing::info;

use crate::{Contribution, Event};

/// Fraction of candidate-title words that must appear in the reference title
/// for two titles to be considered the same (strict inequality).
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Sorts events by start date, most recent first.
///
/// The sort is stable: events with equal start dates keep their relative
/// order, which [`merge_events`] relies on to preserve the order of first
/// appearance.
#[must_use]
pub fn sort_events_desc(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .sorted_by(|a, b| b.start.cmp(&a.start))
        .collect()
}

/// Merges events that describe the same occurrence.
///
/// Single pass, order-preserving: each input event either joins the first
/// output event with an identical (start, end) pair, or is appended as a new
/// entry. When joining, contributions already present in the merged event
/// absorb their near-duplicates, which are dropped with an informational
/// diagnostic. With input sorted by start date descending the output stays
/// sorted, and no two output events share a (start, end) pair — running the
/// merge again on its own output is a no-op.
#[must_use]
pub fn merge_events(events: Vec<Event>) -> Vec<Event> {
    let mut merged: Vec<Event> = Vec::new();
    for event in events {
        fold_into(event, &mut merged);
    }
    merged
}

/// Folds one event into the merged list, appending it when no entry shares
/// its date range.
fn fold_into(event: Event, merged: &mut Vec<Event>) {
    for target in merged.iter_mut() {
        if target.is_same_occurrence(&event) {
            for contribution in event.contributions {
                if is_duplicated(&contribution, &target.contributions) {
                    info!(
                        conference = %target.conference,
                        lastname = %contribution.lastname,
                        title = %contribution.title,
                        "dropping duplicated contribution"
                    );
                } else {
                    target.contributions.push(contribution);
                }
            }
            return;
        }
    }
    merged.push(event);
}

/// Tests whether `contribution` duplicates any entry of `existing`.
///
/// A duplicate requires both last names to be non-empty and exactly equal,
/// and the titles to pass the similarity rule.
fn is_duplicated(contribution: &Contribution, existing: &[Contribution]) -> bool {
    existing.iter().any(|other| {
        !contribution.lastname.is_empty()
            && !other.lastname.is_empty()
            && contribution.lastname == other.lastname
            && titles_match(&contribution.title, &other.title)
    })
}

/// The title similarity rule.
///
/// Splits `title` into whitespace-delimited words and counts how many occur
/// as substrings of `reference` (not word-boundary-aware). True iff the
/// matched fraction strictly exceeds [`TITLE_SIMILARITY_THRESHOLD`].
pub(crate) fn titles_match(title: &str, reference: &str) -> bool {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.is_empty() {
        return false;
    }
    let found = words.iter().filter(|word| reference.contains(**word)).count();
    found as f64 / words.len() as f64 > TITLE_SIMILARITY_THRESHOLD
}
