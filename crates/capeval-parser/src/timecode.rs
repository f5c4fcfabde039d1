//! Timestamp parsing and formatting
//!
//! Three clock syntaxes occur in the supported formats:
//! `H:MM:SS.cc` (ASS, centiseconds), `HH:MM:SS,mmm` (SRT) and
//! `HH:MM:SS.mmm` (WebVTT and markdown transcripts, fractional part
//! optional). All parse to seconds from document start.

/// Parse a clock timestamp to seconds. Accepts `H:MM:SS` optionally
/// followed by `.` or `,` and a fractional part. The `MM:SS` short form
/// is rejected; every supported format writes hours.
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let s = s.trim();
    let (clock, frac) = match s.find(['.', ',']) {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: u32 = parts[0].parse().ok()?;
    let minutes: u32 = parts[1].parse().ok()?;
    let seconds: u32 = parts[2].parse().ok()?;
    if minutes >= 60 || seconds >= 60 || parts[1].is_empty() || parts[2].is_empty() {
        return None;
    }

    let fractional = match frac {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.parse::<f64>().ok()? / 10f64.powi(digits.len() as i32)
        }
        Some(_) => return None,
        None => 0.0,
    };

    Some(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds) + fractional)
}

/// Format seconds as `HH:MM:SS,mmm` (SRT convention).
pub fn format_srt(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        millis / 3_600_000,
        millis / 60_000 % 60,
        millis / 1000 % 60,
        millis % 1000
    )
}

/// Format seconds as `H:MM:SS.cc` (ASS convention, centiseconds).
pub fn format_ass(seconds: f64) -> String {
    let centis = (seconds * 100.0).round() as u64;
    format!(
        "{}:{:02}:{:02}.{:02}",
        centis / 360_000,
        centis / 6000 % 60,
        centis / 100 % 60,
        centis % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(parse_timestamp("00:00:01,500"), Some(1.5));
        assert_eq!(parse_timestamp("00:01:02.250"), Some(62.25));
        assert_eq!(parse_timestamp("0:00:05.20"), Some(5.2));
        assert_eq!(parse_timestamp("01:00:00"), Some(3600.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp("1:02"), None);
        assert_eq!(parse_timestamp("00:61:00"), None);
        assert_eq!(parse_timestamp("abc"), None);
        assert_eq!(parse_timestamp("00:00:01.x"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_format_round_trip() {
        for t in [0.0, 1.5, 62.25, 3599.999, 7325.04] {
            let srt = parse_timestamp(&format_srt(t)).unwrap();
            assert!((srt - t).abs() < 0.001, "srt {t}");
            let ass = parse_timestamp(&format_ass(t)).unwrap();
            assert!((ass - t).abs() < 0.01, "ass {t}");
        }
    }
}
