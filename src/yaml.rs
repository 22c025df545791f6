//! YAML loading for locally authored events and supplemental records.
//!
//! Local files are multi-document YAML streams: one document per event (or
//! per supplemental record), empty documents skipped. Malformed syntax is
//! fatal for the whole file — partial ingestion could silently hide
//! conference records from the curator.
//!
//! # Example
//!
//! ```
//! use confrep::{EventParser, YamlParser};
//!
//! let input = r#"
//! conference: ICHEP
//! start: 2020-07-28
//! end: 2020-08-06
//! venue: Prague, Czech Republic
//! contributions:
//!   - title: An Example Talk
//!     firstname: John
//!     lastname: Smith
//! "#;
//!
//! let events = YamlParser::new().parse(input).unwrap();
//! assert_eq!(events[0].contributions[0].kind, "Talk");
//! ```

use serde::Deserialize;

use crate::{Error, Event, EventParser, ExtraInfo, Result};

/// Parser for multi-document YAML event files.
#[derive(Debug, Default, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventParser for YamlParser {
    fn parse(&self, input: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for document in serde_yaml::Deserializer::from_str(input) {
            let Some(event) = Option::<Event>::deserialize(document)? else {
                continue;
            };
            if event.start > event.end {
                return Err(Error::InvalidFieldValue {
                    field: "event dates".into(),
                    message: format!(
                        "'{}': start {} is after end {}",
                        event.conference, event.start, event.end
                    ),
                });
            }
            events.push(event);
        }
        Ok(events)
    }
}

/// Loads supplemental records from a multi-document YAML stream.
///
/// # Errors
///
/// Returns [`Error::Yaml`] on malformed syntax; the file is rejected as a
/// whole.
pub fn load_extra_infos(input: &str) -> Result<Vec<ExtraInfo>> {
    let mut infos = Vec::new();
    for document in serde_yaml::Deserializer::from_str(input) {
        if let Some(info) = Option::<ExtraInfo>::deserialize(document)? {
            infos.push(info);
        }
    }
    Ok(infos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_multi_document() {
        let input = r#"conference: ICHEP
start: 2020-07-28
end: 2020-08-06
venue: Prague, Czech Republic
url: http://ichep.org
type: Attended
---
conference: Quark Matter
start: 2020-01-01
end: 2020-01-03
venue: Wuhan, China
contributions:
  - type: Poster
    title: An Example Poster
    firstname: Jane
    lastname: Doe
    invited: false
"#;

        let events = YamlParser::new().parse(input).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].conference, "ICHEP");
        assert_eq!(events[0].event_type, Some("Attended".to_string()));
        assert_eq!(
            events[0].start,
            NaiveDate::from_ymd_opt(2020, 7, 28).unwrap()
        );
        assert!(events[0].contributions.is_empty());
        assert_eq!(events[1].contributions[0].kind, "Poster");
        assert_eq!(events[1].contributions[0].lastname, "Doe");
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let input = "---\n---\nconference: Foo\nstart: 2020-01-01\nend: 2020-01-03\n---\n";
        let events = YamlParser::new().parse(input).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].conference, "Foo");
    }

    #[test]
    fn test_contribution_kind_defaults_to_talk() {
        let input = r#"conference: Foo
start: 2020-01-01
end: 2020-01-03
contributions:
  - title: Untyped
    firstname: John
    lastname: Smith
"#;
        let events = YamlParser::new().parse(input).unwrap();
        assert_eq!(events[0].contributions[0].kind, "Talk");
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        let input = "conference: [unterminated\nstart: 2020-01-01\n";
        let result = YamlParser::new().parse(input);
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn test_start_after_end_is_fatal() {
        let input = "conference: Foo\nstart: 2020-01-05\nend: 2020-01-03\n";
        let result = YamlParser::new().parse(input);
        assert!(matches!(result, Err(Error::InvalidFieldValue { .. })));
    }

    #[test]
    fn test_load_extra_infos() {
        let input = r#"conference: ICHEP
url: http://ichep.org
type: Organized
participants: 500
---
conference: Quark Matter
alias: QM20
"#;
        let infos = load_extra_infos(input).unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].event_type, Some("Organized".to_string()));
        assert_eq!(infos[0].participants, Some(500));
        assert_eq!(infos[1].alias, Some("QM20".to_string()));
        assert_eq!(infos[1].url, None);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(YamlParser::new().parse("").unwrap().is_empty());
        assert!(load_extra_infos("").unwrap().is_empty());
    }
}
