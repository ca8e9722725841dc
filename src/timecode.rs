//! Event timecode parsing.
//!
//! Event timestamps arrive as `MM:SS` text inside model output. They are
//! untrusted: a malformed timestamp must degrade to "this event has no
//! determinable visibility window", never to a panic in the playback path.

/// Parse a `MM:SS` timestamp into whole seconds.
///
/// Accepts exactly two colon-separated non-negative integer components and
/// returns `60 * MM + SS`. Any other shape (missing colon, more than two
/// components, non-numeric component) yields `None`.
pub fn parse_timestamp(text: &str) -> Option<u32> {
    let (minutes, seconds) = text.split_once(':')?;
    if seconds.contains(':') {
        return None;
    }
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_maps_minutes_and_seconds() {
        assert_eq!(parse_timestamp("02:30"), Some(150));
        assert_eq!(parse_timestamp("00:00"), Some(0));
        assert_eq!(parse_timestamp("10:05"), Some(605));
        assert_eq!(parse_timestamp("99:59"), Some(5999));
    }

    #[test]
    fn parse_timestamp_rejects_missing_colon() {
        assert_eq!(parse_timestamp("130"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn parse_timestamp_rejects_extra_components() {
        assert_eq!(parse_timestamp("2:3:5"), None);
        assert_eq!(parse_timestamp("1:2:"), None);
    }

    #[test]
    fn parse_timestamp_rejects_non_numeric_components() {
        assert_eq!(parse_timestamp("ab:cd"), None);
        assert_eq!(parse_timestamp("1.5:00"), None);
        assert_eq!(parse_timestamp("-1:30"), None);
        assert_eq!(parse_timestamp(" 02:30"), None);
        assert_eq!(parse_timestamp("02:30 "), None);
    }

    #[test]
    fn parse_timestamp_rejects_empty_components() {
        assert_eq!(parse_timestamp(":"), None);
        assert_eq!(parse_timestamp("1:"), None);
        assert_eq!(parse_timestamp(":1"), None);
    }

    #[test]
    fn parse_timestamp_survives_huge_minutes() {
        let text = format!("{}:00", u32::MAX);
        assert_eq!(parse_timestamp(&text), None);
    }
}
