//! TEI XML bibliography parser implementation.
//!
//! Provides functionality to parse the TEI-flavoured XML bibliographies served
//! by the HAL open archive, one [`Event`] per `biblFull` record.
//!
//! # Example
//!
//! ```
//! use confrep::{EventParser, TeiParser};
//!
//! let input = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><biblFull>
//! <biblStruct>
//! <analytic>
//!   <title>Example Talk</title>
//!   <author role="aut"><persName><forename>John</forename><surname>Smith</surname></persName></author>
//! </analytic>
//! <monogr><meeting>
//!   <title>Example Conference</title>
//!   <date type="start">2020-01-01</date>
//!   <date type="end">2020-01-03</date>
//!   <settlement>Paris</settlement>
//!   <country key="FR">France</country>
//! </meeting></monogr>
//! </biblStruct>
//! </biblFull></TEI>"#;
//!
//! let parser = TeiParser::new();
//! let events = parser.parse(input).unwrap();
//! assert_eq!(events[0].conference, "Example Conference");
//! assert_eq!(events[0].contributions[0].lastname, "Smith");
//! ```

use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use std::io::BufRead;
use tracing::info;

use crate::{Contribution, Error, Event, EventParser, Result};

/// Fixed resolver base prepended to DOIs to build proceedings URLs.
const DOI_RESOLVER: &str = "https://dx.doi.org/";

/// Parser for HAL TEI XML bibliographies.
///
/// Each `biblFull` record yields one [`Event`] carrying exactly one
/// [`Contribution`]: the first author tagged with the `aut` role. Entries
/// whose surname contains a blocklisted substring are skipped entirely, with
/// an informational diagnostic naming the author.
#[derive(Debug, Default, Clone)]
pub struct TeiParser {
    blocklist: Vec<String>,
}

impl TeiParser {
    /// Creates a new TEI parser with an empty blocklist.
    ///
    /// # Examples
    ///
    /// ```
    /// use confrep::TeiParser;
    /// let parser = TeiParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the surname blocklist.
    ///
    /// An entry whose extracted surname contains any of the given substrings
    /// is discarded instead of producing an [`Event`].
    #[must_use]
    pub fn with_blocklist<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocklist = names.into_iter().map(Into::into).collect();
        self
    }

    /// Extracts text content from XML events until the closing tag is found
    fn extract_text<B: BufRead>(
        reader: &mut Reader<B>,
        buf: &mut Vec<u8>,
        closing_tag: &[u8],
    ) -> Result<String> {
        let mut text = String::new();
        let closing_tag_str = String::from_utf8_lossy(closing_tag).into_owned();

        loop {
            match reader.read_event_into(buf) {
                Ok(XmlEvent::Text(e)) => {
                    text.push_str(&e.unescape().map_err(|e| {
                        Error::InvalidFormat(format!("Invalid XML text content: {}", e))
                    })?);
                }
                Ok(XmlEvent::End(e)) if e.name().as_ref() == closing_tag => break,
                Ok(XmlEvent::Eof) => {
                    return Err(Error::InvalidFormat(format!(
                        "Unexpected EOF while looking for closing tag '{}'",
                        closing_tag_str
                    )));
                }
                Err(e) => return Err(Error::from(e)),
                _ => continue,
            }
            buf.clear();
        }

        Ok(text.trim().to_string())
    }

    /// Reads the forename/surname pair out of an `author` element.
    fn parse_person<B: BufRead>(
        reader: &mut Reader<B>,
        buf: &mut Vec<u8>,
    ) -> Result<(Option<String>, Option<String>)> {
        let mut forename = None;
        let mut surname = None;

        loop {
            match reader.read_event_into(buf) {
                Ok(XmlEvent::Start(ref e)) => match e.name().as_ref() {
                    b"forename" if forename.is_none() => {
                        forename = Some(Self::extract_text(reader, buf, b"forename")?);
                    }
                    b"surname" if surname.is_none() => {
                        surname = Some(Self::extract_text(reader, buf, b"surname")?);
                    }
                    _ => (),
                },
                Ok(XmlEvent::End(ref e)) if e.name() == QName(b"author") => break,
                Ok(XmlEvent::Eof) => {
                    return Err(Error::InvalidFormat(
                        "Unexpected EOF inside author element".into(),
                    ));
                }
                Err(e) => return Err(Error::from(e)),
                _ => (),
            }
            buf.clear();
        }

        Ok((forename, surname))
    }

    /// Parse a single `biblFull` record into an Event.
    ///
    /// Returns `Ok(None)` when the record's author is blocklisted.
    fn parse_record<B: BufRead>(
        &self,
        reader: &mut Reader<B>,
        buf: &mut Vec<u8>,
    ) -> Result<Option<Event>> {
        let mut conference = None;
        let mut start = None;
        let mut end = None;
        let mut settlement = None;
        let mut country = None;
        let mut audience = None;
        let mut invited = false;
        let mut proceedings = None;
        let mut title = None;
        let mut author: Option<(Option<String>, Option<String>)> = None;

        let mut in_struct = false;
        let mut in_meeting = false;

        loop {
            match reader.read_event_into(buf) {
                Ok(XmlEvent::Start(ref e)) => {
                    let name = e.name().as_ref().to_vec();
                    let type_attr = attr_value(e, b"type")?;
                    let role_attr = attr_value(e, b"role")?;

                    match name.as_slice() {
                        b"biblStruct" => in_struct = true,
                        b"meeting" => in_meeting = true,
                        b"title" if in_meeting => {
                            let text = Self::extract_text(reader, buf, b"title")?;
                            if conference.is_none() {
                                conference = Some(text);
                            }
                        }
                        b"title" if in_struct => {
                            let text = Self::extract_text(reader, buf, b"title")?;
                            if title.is_none() {
                                title = Some(text);
                            }
                        }
                        b"settlement" if in_meeting => {
                            settlement = Some(Self::extract_text(reader, buf, b"settlement")?);
                        }
                        b"country" if in_meeting => {
                            country = Some(Self::extract_text(reader, buf, b"country")?);
                        }
                        b"author" if in_struct && role_attr.as_deref() == Some("aut") => {
                            let person = Self::parse_person(reader, buf)?;
                            if author.is_none() {
                                author = Some(person);
                            }
                        }
                        _ => match type_attr.as_deref() {
                            Some("start") if in_meeting => {
                                start =
                                    Some(parse_date(&Self::extract_text(reader, buf, &name)?)?);
                            }
                            Some("end") if in_meeting => {
                                end = Some(parse_date(&Self::extract_text(reader, buf, &name)?)?);
                            }
                            Some("audience") => {
                                audience = Some(Self::extract_text(reader, buf, &name)?);
                            }
                            Some("invited") => {
                                invited = Self::extract_text(reader, buf, &name)? == "Yes";
                            }
                            Some("doi") => {
                                let doi = Self::extract_text(reader, buf, &name)?;
                                proceedings = Some(format!("{}{}", DOI_RESOLVER, doi));
                            }
                            _ => (),
                        },
                    }
                }
                Ok(XmlEvent::End(ref e)) => match e.name().as_ref() {
                    b"biblFull" => break,
                    b"biblStruct" => in_struct = false,
                    b"meeting" => in_meeting = false,
                    _ => (),
                },
                Ok(XmlEvent::Eof) => {
                    return Err(Error::InvalidFormat(
                        "Unexpected EOF inside biblFull record".into(),
                    ));
                }
                Err(e) => return Err(Error::from(e)),
                _ => (),
            }
            buf.clear();
        }

        let conference = conference.ok_or_else(|| Error::XmlStructure("meeting title".into()))?;
        let start = start.ok_or_else(|| Error::XmlStructure("meeting start date".into()))?;
        let end = end.ok_or_else(|| Error::XmlStructure("meeting end date".into()))?;
        let settlement =
            settlement.ok_or_else(|| Error::XmlStructure("meeting settlement".into()))?;
        let country = country.ok_or_else(|| Error::XmlStructure("meeting country".into()))?;
        let title = title.ok_or_else(|| Error::XmlStructure("contribution title".into()))?;
        let (forename, surname) =
            author.ok_or_else(|| Error::XmlStructure("author with role aut".into()))?;
        let firstname = forename.ok_or_else(|| Error::XmlStructure("author forename".into()))?;
        let lastname = surname.ok_or_else(|| Error::XmlStructure("author surname".into()))?;

        if start > end {
            return Err(Error::InvalidFieldValue {
                field: "meeting dates".into(),
                message: format!("start {} is after end {}", start, end),
            });
        }

        if self.blocklist.iter().any(|b| lastname.contains(b.as_str())) {
            info!(author = %lastname, conference = %conference, "skipping contribution from excluded author");
            return Ok(None);
        }

        Ok(Some(Event {
            conference,
            alias: None,
            start,
            end,
            venue: format!("{}, {}", settlement, country),
            audience,
            url: None,
            event_type: None,
            participants: None,
            contributions: vec![Contribution {
                kind: "Talk".to_string(),
                title,
                firstname,
                lastname,
                invited,
                proceedings,
            }],
        }))
    }
}

impl EventParser for TeiParser {
    fn parse(&self, input: &str) -> Result<Vec<Event>> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut events = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(XmlEvent::Start(ref e)) if e.name() == QName(b"biblFull") => {
                    if let Some(event) = self.parse_record(&mut reader, &mut buf)? {
                        events.push(event);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => return Err(Error::from(e)),
                _ => (),
            }
            buf.clear();
        }

        Ok(events)
    }
}

/// Returns the unescaped value of the named attribute, if present.
fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(
                attr.unescape_value().map_err(Error::from)?.into_owned(),
            ));
        }
    }
    Ok(None)
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| Error::InvalidFieldValue {
        field: "meeting date".into(),
        message: format!("'{}': {}", text, e),
    })
}
