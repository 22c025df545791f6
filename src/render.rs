//! HTML report rendering.
//!
//! Serializes a year-grouped list of merged events into an HTML fragment:
//! one `<h3>` heading and one `<ul>` per year, one list item per event with a
//! nested list for its contributions.
//!
//! The output is byte-compatible with the report format this tool has been
//! publishing for years, quirks included (the stray semicolon after the
//! nested list's style attribute, the double space after the contribution
//! kind). Values are written verbatim, without HTML escaping. Do not "fix"
//! the format without also migrating the published reports.

use crate::{Contribution, Event};

/// Renders one year section: heading plus event list.
///
/// Events are expected in their final order (date descending); an empty slice
/// still renders the heading and an empty list.
#[must_use]
pub fn render_year(year: i32, events: &[Event]) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n<h3>{}</h3>\n", year));
    out.push_str("<ul style=\"list-style-type: circle;\">\n");
    for event in events {
        render_event(event, &mut out);
    }
    out.push_str("</ul>\n");
    out
}

fn render_event(event: &Event, out: &mut String) {
    out.push_str("  <li>");

    let name = event.alias.as_deref().unwrap_or(&event.conference);
    match event.url.as_deref() {
        Some(url) if !url.is_empty() => {
            out.push_str(&format!("<a href=\"{}\">{}</a>", url, name));
        }
        _ => out.push_str(name),
    }

    out.push_str(&format!(
        ", {}, {}.",
        event.start.format("%d/%m/%y"),
        event.venue
    ));
    if let Some(kind) = event.event_type.as_deref().filter(|k| !k.is_empty()) {
        out.push_str(&format!(" {}.", kind));
    }
    if let Some(participants) = event.participants.filter(|&n| n > 0) {
        out.push_str(&format!(" {} participants.", participants));
    }

    render_contributions(&event.contributions, out);
    out.push_str("  </li>\n");
}

fn render_contributions(contributions: &[Contribution], out: &mut String) {
    if contributions.is_empty() {
        return;
    }

    out.push_str("\n    <ul style=\"list-style-type: disc\";>\n");
    for contribution in contributions {
        out.push_str("      <li>");
        if contribution.invited {
            out.push_str("Invited ");
        }
        out.push_str(&contribution.kind);

        let mut details = String::new();
        if !contribution.title.is_empty() {
            details.push_str(&format!(" <em>{}</em>,", contribution.title));
        }
        if !contribution.firstname.is_empty() {
            details.push_str(&format!(
                " {} {}",
                contribution.firstname,
                contribution.lastname.to_uppercase()
            ));
        }
        if !details.is_empty() {
            out.push_str(": ");
            out.push_str(&details);
        }

        if let Some(proceedings) = contribution.proceedings.as_deref().filter(|p| !p.is_empty()) {
            out.push_str(&format!(
                ". Proceedings <a href=\"{}\">here</a>",
                proceedings
            ));
        }
        out.push_str("</li>\n");
    }
    out.push_str("    </ul>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn event() -> Event {
        Event {
            conference: "ICHEP".to_string(),
            alias: None,
            start: NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2021, 7, 8).unwrap(),
            venue: "Paris, France".to_string(),
            audience: None,
            url: Some("http://ichep.org".to_string()),
            event_type: None,
            participants: None,
            contributions: Vec::new(),
        }
    }

    #[test]
    fn test_render_event_without_contributions() {
        let html = render_year(2021, &[event()]);
        assert_eq!(
            html,
            "\n<h3>2021</h3>\n\
             <ul style=\"list-style-type: circle;\">\n\
             \x20\x20<li><a href=\"http://ichep.org\">ICHEP</a>, 01/07/21, Paris, France.  </li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_render_without_url_uses_plain_name() {
        let mut e = event();
        e.url = None;
        let html = render_year(2021, &[e]);
        assert!(html.contains("<li>ICHEP, 01/07/21, Paris, France."));
        assert!(!html.contains("<a href"));
    }

    #[test]
    fn test_render_alias_overrides_name() {
        let mut e = event();
        e.alias = Some("ICHEP 2021".to_string());
        let html = render_year(2021, &[e]);
        assert!(html.contains(">ICHEP 2021</a>"));
    }

    #[test]
    fn test_render_type_and_participants() {
        let mut e = event();
        e.event_type = Some("Organized".to_string());
        e.participants = Some(250);
        let html = render_year(2021, &[e]);
        assert!(html.contains("Paris, France. Organized. 250 participants."));
    }

    #[test]
    fn test_render_zero_participants_is_omitted() {
        let mut e = event();
        e.participants = Some(0);
        let html = render_year(2021, &[e]);
        assert!(!html.contains("participants"));
    }

    #[test]
    fn test_render_contribution() {
        let mut e = event();
        e.contributions = vec![Contribution {
            kind: "Talk".to_string(),
            title: "Heavy Ion Collisions".to_string(),
            firstname: "John".to_string(),
            lastname: "Smith".to_string(),
            invited: true,
            proceedings: Some("https://dx.doi.org/10.1000/x".to_string()),
        }];

        let html = render_year(2021, &[e]);

        assert!(html.contains("\n    <ul style=\"list-style-type: disc\";>\n"));
        assert!(html.contains(
            "      <li>Invited Talk:  <em>Heavy Ion Collisions</em>, John SMITH. \
             Proceedings <a href=\"https://dx.doi.org/10.1000/x\">here</a></li>\n"
        ));
        assert!(html.contains("    </ul>\n"));
    }

    #[test]
    fn test_render_contribution_without_presenter() {
        let mut e = event();
        e.contributions = vec![Contribution {
            kind: "Organization".to_string(),
            ..Default::default()
        }];
        let html = render_year(2021, &[e]);
        // No details: no colon after the kind.
        assert!(html.contains("      <li>Organization</li>\n"));
    }

    #[test]
    fn test_render_year_without_events() {
        let html = render_year(2019, &[]);
        assert_eq!(
            html,
            "\n<h3>2019</h3>\n<ul style=\"list-style-type: circle;\">\n</ul>\n"
        );
    }
}
