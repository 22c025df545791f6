//! Post-merge consistency checks.
//!
//! Advisory only: checks emit diagnostics through `tracing` and never halt or
//! alter the merged output.

use tracing::warn;

use crate::Event;

/// Configuration options for the consistency checks.
#[derive(Debug, Default, Clone)]
pub struct CheckConfig {
    /// Also warn when two contributions of one event share a last name.
    /// Off by default; the similarity rule already drops near-duplicates,
    /// this cross-check only surfaces reworded leftovers for manual review.
    pub warn_duplicate_authors: bool,
}

/// Scans merged events for missing or suspicious information.
///
/// Every event without a URL gets a warning naming the conference.
pub fn check_events(events: &[Event], config: &CheckConfig) {
    for event in events {
        if event.url.as_deref().is_none_or(str::is_empty) {
            warn!(conference = %event.conference, "missing url");
        }
        if config.warn_duplicate_authors {
            warn_duplicate_authors(event);
        }
    }
}

fn warn_duplicate_authors(event: &Event) {
    let contributions = &event.contributions;
    for (i, first) in contributions.iter().enumerate() {
        if first.lastname.is_empty() {
            // Conference organization entries carry no presenter.
            continue;
        }
        for second in &contributions[i + 1..] {
            if second.lastname == first.lastname {
                warn!(
                    conference = %event.conference,
                    lastname = %first.lastname,
                    first_title = %first.title,
                    second_title = %second.title,
                    "possible duplicated contribution"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Contribution;
    use chrono::NaiveDate;

    fn event(url: Option<&str>) -> Event {
        Event {
            conference: "Foo".to_string(),
            alias: None,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
            venue: String::new(),
            audience: None,
            url: url.map(str::to_string),
            event_type: None,
            participants: None,
            contributions: Vec::new(),
        }
    }

    // The checks only log; these guard against panics and accidental mutation.

    #[test]
    fn test_check_events_leaves_output_untouched() {
        let events = vec![event(None), event(Some("http://foo.org"))];
        let before = events.clone();
        check_events(&events, &CheckConfig::default());
        assert_eq!(events, before);
    }

    #[test]
    fn test_cross_check_handles_empty_lastnames() {
        let mut e = event(Some("http://foo.org"));
        e.contributions = vec![
            Contribution::default(),
            Contribution {
                lastname: "Smith".to_string(),
                ..Default::default()
            },
            Contribution {
                lastname: "Smith".to_string(),
                ..Default::default()
            },
        ];
        let config = CheckConfig {
            warn_duplicate_authors: true,
        };
        check_events(&[e], &config);
    }
}
