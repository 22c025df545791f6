//! Supplemental info merging.
//!
//! Overlays hand-curated [`ExtraInfo`] records onto parsed events to fill the
//! fields the bibliographic source does not carry (url, type, participants,
//! alias, ...). A present value is never overwritten: when several records
//! match the same event they apply in sequence order, and a later record only
//! wins a field that every earlier application left empty.

use crate::{Event, ExtraInfo};

/// Backfills absent event fields from the matching supplemental records.
///
/// Records match events by exact string equality of the conference name. An
/// event may match zero, one, or several records; a record may match several
/// events.
pub fn apply_extra_infos(events: &mut [Event], infos: &[ExtraInfo]) {
    for info in infos {
        for event in events
            .iter_mut()
            .filter(|event| event.conference == info.conference)
        {
            fill(&mut event.alias, &info.alias);
            fill(&mut event.url, &info.url);
            fill(&mut event.event_type, &info.event_type);
            fill(&mut event.audience, &info.audience);
            if event.participants.is_none() {
                event.participants = info.participants;
            }
            if event.venue.is_empty() {
                if let Some(venue) = &info.venue {
                    event.venue = venue.clone();
                }
            }
        }
    }
}

/// Fills `slot` from `value` when the slot is absent or empty.
fn fill(slot: &mut Option<String>, value: &Option<String>) {
    let empty = slot.as_deref().is_none_or(str::is_empty);
    if empty && value.is_some() {
        *slot = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn event(conference: &str) -> Event {
        Event {
            conference: conference.to_string(),
            alias: None,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 3).unwrap(),
            venue: String::new(),
            audience: None,
            url: None,
            event_type: None,
            participants: None,
            contributions: Vec::new(),
        }
    }

    #[test]
    fn test_fills_missing_fields() {
        let mut events = vec![event("ICHEP")];
        let infos = vec![ExtraInfo {
            conference: "ICHEP".to_string(),
            url: Some("http://ichep.org".to_string()),
            event_type: Some("Attended".to_string()),
            participants: Some(800),
            venue: Some("Paris, France".to_string()),
            ..Default::default()
        }];

        apply_extra_infos(&mut events, &infos);

        assert_eq!(events[0].url, Some("http://ichep.org".to_string()));
        assert_eq!(events[0].event_type, Some("Attended".to_string()));
        assert_eq!(events[0].participants, Some(800));
        assert_eq!(events[0].venue, "Paris, France");
    }

    #[test]
    fn test_never_overwrites_present_value() {
        let mut events = vec![event("ICHEP")];
        events[0].url = Some("http://x".to_string());
        let infos = vec![ExtraInfo {
            conference: "ICHEP".to_string(),
            url: Some("http://y".to_string()),
            ..Default::default()
        }];

        apply_extra_infos(&mut events, &infos);

        assert_eq!(events[0].url, Some("http://x".to_string()));
    }

    #[test]
    fn test_empty_string_counts_as_absent() {
        let mut events = vec![event("ICHEP")];
        events[0].url = Some(String::new());
        let infos = vec![ExtraInfo {
            conference: "ICHEP".to_string(),
            url: Some("http://y".to_string()),
            ..Default::default()
        }];

        apply_extra_infos(&mut events, &infos);

        assert_eq!(events[0].url, Some("http://y".to_string()));
    }

    #[test]
    fn test_requires_exact_conference_match() {
        let mut events = vec![event("ICHEP 2020")];
        let infos = vec![ExtraInfo {
            conference: "ICHEP".to_string(),
            url: Some("http://ichep.org".to_string()),
            ..Default::default()
        }];

        apply_extra_infos(&mut events, &infos);

        assert_eq!(events[0].url, None);
    }

    #[test]
    fn test_first_matching_record_wins() {
        let mut events = vec![event("ICHEP")];
        let infos = vec![
            ExtraInfo {
                conference: "ICHEP".to_string(),
                url: Some("http://first".to_string()),
                ..Default::default()
            },
            ExtraInfo {
                conference: "ICHEP".to_string(),
                url: Some("http://second".to_string()),
                alias: Some("ICHEP'20".to_string()),
                ..Default::default()
            },
        ];

        apply_extra_infos(&mut events, &infos);

        // The first record filled url; the second only gets the still-empty alias.
        assert_eq!(events[0].url, Some("http://first".to_string()));
        assert_eq!(events[0].alias, Some("ICHEP'20".to_string()));
    }

    #[test]
    fn test_one_record_fills_several_events() {
        let mut events = vec![event("ICHEP"), event("ICHEP")];
        let infos = vec![ExtraInfo {
            conference: "ICHEP".to_string(),
            url: Some("http://ichep.org".to_string()),
            ..Default::default()
        }];

        apply_extra_infos(&mut events, &infos);

        assert!(events.iter().all(|e| e.url.is_some()));
    }
}
