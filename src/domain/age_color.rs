// Age threshold to color bands
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeColorRange {
    pub threshold_secs: i64,
    pub color: String,
}

impl AgeColorRange {
    pub fn new(threshold_secs: i64, color: impl Into<String>) -> Self {
        Self {
            threshold_secs,
            color: color.into(),
        }
    }

    /// Parses `"1200:#550000,3600:#BB0000"` into bands ordered worst first
    /// (descending threshold). Malformed entries are skipped.
    pub fn parse_list(list: &str) -> Vec<AgeColorRange> {
        let mut bands: Vec<AgeColorRange> = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let parsed = entry.split_once(':').and_then(|(secs, color)| {
                    let secs = secs.trim().parse::<i64>().ok()?;
                    let color = color.trim();
                    (!color.is_empty()).then(|| AgeColorRange::new(secs, color))
                });
                if parsed.is_none() {
                    tracing::warn!("Ignoring malformed age color range entry: {}", entry);
                }
                parsed
            })
            .collect();
        bands.sort_by(|a, b| b.threshold_secs.cmp(&a.threshold_secs));
        bands
    }
}

/// Returns the first band, in the order supplied, whose threshold the age meets
/// or exceeds.
pub fn color_for_age(age_secs: i64, bands: &[AgeColorRange]) -> Option<&AgeColorRange> {
    bands.iter().find(|band| age_secs >= band.threshold_secs)
}

/// Band lookup for the age of `timestamp` relative to `now`.
pub fn color_for_timestamp(
    now: DateTime<Utc>,
    timestamp: i64,
    bands: &[AgeColorRange],
) -> Option<&AgeColorRange> {
    color_for_age(now.timestamp() - timestamp, bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> Vec<AgeColorRange> {
        vec![AgeColorRange::new(60, "red"), AgeColorRange::new(20, "yellow")]
    }

    #[test]
    fn test_color_for_age_worst_first() {
        let bands = bands();
        assert_eq!(color_for_age(90, &bands).map(|b| b.color.as_str()), Some("red"));
        assert_eq!(color_for_age(60, &bands).map(|b| b.color.as_str()), Some("red"));
        assert_eq!(color_for_age(30, &bands).map(|b| b.color.as_str()), Some("yellow"));
        assert_eq!(color_for_age(5, &bands), None);
    }

    #[test]
    fn test_supplied_order_wins() {
        // Ascending order means the lowest threshold always matches first.
        let ascending = vec![AgeColorRange::new(20, "yellow"), AgeColorRange::new(60, "red")];
        assert_eq!(color_for_age(90, &ascending).map(|b| b.color.as_str()), Some("yellow"));
    }

    #[test]
    fn test_parse_list_sorts_descending() {
        let bands = AgeColorRange::parse_list("1200:#550000, 3600:#BB0000");
        assert_eq!(
            bands,
            vec![
                AgeColorRange::new(3600, "#BB0000"),
                AgeColorRange::new(1200, "#550000"),
            ]
        );
    }

    #[test]
    fn test_parse_list_skips_malformed_entries() {
        let bands = AgeColorRange::parse_list("abc:red,,600:,300:blue,nocolon");
        assert_eq!(bands, vec![AgeColorRange::new(300, "blue")]);
        assert!(AgeColorRange::parse_list("").is_empty());
    }

    #[test]
    fn test_color_for_timestamp() {
        let now = DateTime::from_timestamp(10_000, 0).unwrap();
        let bands = bands();
        let band = color_for_timestamp(now, 10_000 - 45, &bands);
        assert_eq!(band.map(|b| b.color.as_str()), Some("yellow"));
    }
}
