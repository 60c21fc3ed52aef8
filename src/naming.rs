use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static::lazy_static! {
    // Greedy prefix: with several date-like runs in one name, the last one is the timestamp.
    static ref TIMESTAMP_NAME: Regex = Regex::new(
        r"^(?P<prefix>.*)(?P<day>[0-9]{2})_(?P<month>[0-9]{2})_(?P<year>[0-9]{4}) (?P<hour>[0-9]{2})_(?P<minute>[0-9]{2})_(?P<second>[0-9]{2})(?P<extension>.*)$"
    )
    .expect("timestamp pattern is valid");
}

/// Decomposition of a file name matching `<prefix><dd>_<mm>_<yyyy> <hh>_<mm>_<ss><extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePatternMatch<'a> {
    pub prefix: &'a str,
    pub day: &'a str,
    pub month: &'a str,
    pub year: &'a str,
    pub hour: &'a str,
    pub minute: &'a str,
    pub second: &'a str,
    pub extension: &'a str,
}

impl<'a> NamePatternMatch<'a> {
    fn from_captures(caps: &Captures<'a>) -> Self {
        let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        Self {
            prefix: field("prefix"),
            day: field("day"),
            month: field("month"),
            year: field("year"),
            hour: field("hour"),
            minute: field("minute"),
            second: field("second"),
            extension: field("extension"),
        }
    }

    /// Render as `<prefix><yyyy>-<mm>-<dd> <hh>-<mm>-<ss><extension>`.
    pub fn sortable_name(&self) -> String {
        format!(
            "{}{}-{}-{} {}-{}-{}{}",
            self.prefix,
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.extension
        )
    }
}

/// Split a file name into its timestamp fields, or `None` when it doesn't carry one.
pub fn parse(name: &str) -> Option<NamePatternMatch<'_>> {
    TIMESTAMP_NAME
        .captures(name)
        .map(|caps| NamePatternMatch::from_captures(&caps))
}

/// Map an old file name to its sortable form. Names that don't match come back untouched.
pub fn transform(name: &str) -> Cow<'_, str> {
    match parse(name) {
        Some(parsed) => Cow::Owned(parsed.sortable_name()),
        None => Cow::Borrowed(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_reorders_date_and_time() {
        assert_eq!(
            transform("Genshin 05_01_2024 13_20_00.png"),
            "Genshin 2024-01-05 13-20-00.png"
        );
    }

    #[test]
    fn test_transform_does_not_rematch_own_output() {
        let once = transform("Genshin 05_01_2024 13_20_00.png").into_owned();
        let twice = transform(&once);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice, once);
    }

    #[test]
    fn test_transform_leaves_non_matching_names() {
        assert_eq!(transform("readme.txt"), "readme.txt");
        assert_eq!(transform("5_01_2024 13_20_00.png"), "5_01_2024 13_20_00.png");
        assert_eq!(transform("05_01_2024_13_20_00.png"), "05_01_2024_13_20_00.png");
        assert_eq!(transform(""), "");
    }

    #[test]
    fn test_transform_without_prefix_or_extension() {
        assert_eq!(transform("31_12_1999 23_59_59"), "1999-12-31 23-59-59");
    }

    #[test]
    fn test_transform_rejects_non_ascii_digits() {
        // Arabic-Indic digits would satisfy \d but not the fixed pattern.
        let name = "shot \u{0660}5_01_2024 13_20_00.png";
        assert_eq!(transform(name), name);
    }

    #[test]
    fn test_last_timestamp_in_name_wins() {
        let parsed = parse("01_02_2023 09_00_00 copy 05_01_2024 13_20_00.png").unwrap();
        assert_eq!(parsed.prefix, "01_02_2023 09_00_00 copy ");
        assert_eq!(parsed.year, "2024");
        assert_eq!(parsed.extension, ".png");
        assert_eq!(
            transform("01_02_2023 09_00_00 copy 05_01_2024 13_20_00.png"),
            "01_02_2023 09_00_00 copy 2024-01-05 13-20-00.png"
        );
    }

    #[test]
    fn test_parse_exposes_fields() {
        let parsed = parse("shot 01_02_2023 09_00_00.png").unwrap();
        assert_eq!(
            parsed,
            NamePatternMatch {
                prefix: "shot ",
                day: "01",
                month: "02",
                year: "2023",
                hour: "09",
                minute: "00",
                second: "00",
                extension: ".png",
            }
        );
    }
}
