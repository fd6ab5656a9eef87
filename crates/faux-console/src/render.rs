//! Turns messages into sanitized, timestamped entries on a render surface

use chrono::{NaiveTime, Timelike};

use crate::message::Message;
use crate::surface::{LogEntry, RenderSurface};

/// Escape the characters that would otherwise be read as markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Zero-padded `HH:MM:SS`
pub fn format_timestamp(time: &impl Timelike) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Build the entry for already coerced message text
pub fn entry(text: &str, time: NaiveTime) -> LogEntry {
    LogEntry {
        timestamp: format_timestamp(&time),
        text: escape_html(text),
    }
}

/// Append `text` to the surface
///
/// If the surface was scrolled all the way down before the append it
/// follows the new entry, otherwise the scroll position is left alone.
pub fn render_text(surface: &mut RenderSurface, text: &str, time: NaiveTime) {
    let scroll_to_bottom = surface.scroll_top() == surface.scroll_top_max();

    surface.append(entry(text, time));

    if scroll_to_bottom {
        surface.scroll_to(surface.scroll_top_max());
    }
}

/// Coerce `message` to text and append it to the surface
pub fn render(surface: &mut RenderSurface, message: &Message, time: NaiveTime) {
    render_text(surface, &message.to_text(), time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("plain"), "plain");
        assert_eq!(
            escape_html("<b>Tom & Jerry</b>"),
            "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"
        );
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_timestamp_is_zero_padded() {
        let time = NaiveTime::from_hms_opt(7, 5, 9).unwrap();
        assert_eq!(format_timestamp(&time), "07:05:09");

        let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        assert_eq!(format_timestamp(&time), "23:59:59");
    }

    #[test]
    fn test_rendered_markup_has_no_raw_markup_characters() {
        let inputs = ["<script>alert(1)</script>", "a & b", ">>>", "&<>&<>"];

        for input in inputs {
            let mut surface = RenderSurface::new(10);
            render(&mut surface, &Message::from(input), noon());

            let html = surface.inner_html();
            let prefix = "<div class=\"log\"><span class=\"timestamp\">12:00:00</span> ";
            let body = html
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix("</div>"))
                .unwrap();

            assert!(!body.contains('<'), "{}", body);
            assert!(!body.contains('>'), "{}", body);
            let unescaped = body
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "");
            assert!(!unescaped.contains('&'), "{}", body);
        }
    }

    #[test]
    fn test_structured_values_are_escaped_too() {
        let mut surface = RenderSurface::new(10);
        render(&mut surface, &Message::from(json!({"tag": "<i>"})), noon());

        assert_eq!(
            surface.entries()[0].text,
            "{\n\t\"tag\": \"&lt;i&gt;\"\n}"
        );
    }

    #[test]
    fn test_append_preserves_prior_entries() {
        let mut surface = RenderSurface::new(10);
        render(&mut surface, &Message::from("first"), noon());
        render(&mut surface, &Message::from(2), noon());

        let texts: Vec<_> = surface.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["first", "2"]);
    }

    #[test]
    fn test_follows_new_entries_when_at_bottom() {
        let mut surface = RenderSurface::new(2);
        for i in 0..5 {
            render_text(&mut surface, &i.to_string(), noon());
        }

        assert_eq!(surface.scroll_top(), 3);
        assert_eq!(surface.scroll_top(), surface.scroll_top_max());
    }

    #[test]
    fn test_keeps_position_when_scrolled_up() {
        let mut surface = RenderSurface::new(2);
        for i in 0..5 {
            render_text(&mut surface, &i.to_string(), noon());
        }
        surface.scroll_to(1);

        render_text(&mut surface, "new", noon());

        assert_eq!(surface.scroll_top(), 1);
        assert_eq!(surface.scroll_top_max(), 4);
    }
}
