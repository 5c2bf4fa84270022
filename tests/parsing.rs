use chronovec::parse::{FormatSpec, TemporalKind, TemporalParser};
use chronovec::source::Locale;

const MAR_15_2021: f64 = 18701.0; // days from 1970-01-01 to 2021-03-15
const MAR_15_2021_102030: f64 = 1_615_803_630.0; // seconds to 2021-03-15T10:20:30Z

fn parser() -> TemporalParser {
    TemporalParser::new(Locale::default())
}

fn parse_date(raw: &str, format: &FormatSpec) -> Option<f64> {
    parser().parse(raw, format, TemporalKind::Date)
}

fn parse_datetime(raw: &str, format: &FormatSpec) -> Option<f64> {
    parser().parse(raw, format, TemporalKind::DateTime)
}

#[test]
fn invalid_calendar_value_is_missing() {
    assert_eq!(parse_date("2021-02-30", &FormatSpec::Default), None);
    assert_eq!(parse_date("2021-13-01", &FormatSpec::Default), None);
    assert_eq!(parse_date("2021-00-10", &FormatSpec::Default), None);
    // leap rules apply
    assert_eq!(parse_date("2021-02-29", &FormatSpec::Default), None);
    assert_eq!(parse_date("2020-02-29", &FormatSpec::Default), Some(18321.0));
}

#[test]
fn explicit_day_month_year_pattern() {
    let format = FormatSpec::Pattern(String::from("%d/%m/%Y"));
    assert_eq!(parse_date("15/03/2021", &format), Some(MAR_15_2021));
    // month and day transposed past their ranges
    assert_eq!(parse_date("03/15/2021", &format), None);
    assert_eq!(parse_date("32/01/2021", &format), None);
}

#[test]
fn default_datetime_grammar_is_iso() {
    assert_eq!(
        parse_datetime("2021-03-15T10:20:30Z", &FormatSpec::Default),
        Some(MAR_15_2021_102030)
    );
    // space separator and missing designator are tolerated
    assert_eq!(
        parse_datetime("2021-03-15 10:20:30", &FormatSpec::Default),
        Some(MAR_15_2021_102030)
    );
    // an offset names the same instant
    assert_eq!(
        parse_datetime("2021-03-15T12:20:30+02:00", &FormatSpec::Default),
        Some(MAR_15_2021_102030)
    );
    // a bare date is midnight
    assert_eq!(
        parse_datetime("2021-03-15", &FormatSpec::Default),
        Some(MAR_15_2021 * 86_400.0)
    );
}

#[test]
fn fractional_seconds_are_kept() {
    assert_eq!(
        parse_datetime("2021-03-15T10:20:30.5Z", &FormatSpec::Default),
        Some(MAR_15_2021_102030 + 0.5)
    );
}

#[test]
fn flexible_date_separators() {
    assert_eq!(parse_date("2021-03-15", &FormatSpec::Default), Some(MAR_15_2021));
    assert_eq!(parse_date("2021/03/15", &FormatSpec::Default), Some(MAR_15_2021));
    assert_eq!(parse_date("2021/3/15", &FormatSpec::Default), Some(MAR_15_2021));
}

#[test]
fn epoch_boundaries() {
    assert_eq!(parse_date("1970-01-01", &FormatSpec::Default), Some(0.0));
    assert_eq!(parse_date("1969-12-31", &FormatSpec::Default), Some(-1.0));
    assert_eq!(
        parse_datetime("1970-01-01T00:00:00Z", &FormatSpec::Default),
        Some(0.0)
    );
}

#[test]
fn garbage_is_missing_not_fatal() {
    for raw in ["", "   ", "soon", "15-03-2021", "2021-03-15T25:00:00Z"] {
        assert_eq!(parse_date(raw, &FormatSpec::Default), None, "date {raw:?}");
        assert_eq!(
            parse_datetime(raw, &FormatSpec::Default),
            None,
            "datetime {raw:?}"
        );
    }
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(parse_date("  2021-03-15  ", &FormatSpec::Default), Some(MAR_15_2021));
}

#[test]
fn locale_date_format_drives_default_grammar() {
    let locale = Locale::new(String::from("%d.%m.%Y"), String::from("UTC"));
    let mut parser = TemporalParser::new(locale);
    assert_eq!(
        parser.parse("15.03.2021", &FormatSpec::Default, TemporalKind::Date),
        Some(MAR_15_2021)
    );
    // the flexible numeric form still works as fallback
    assert_eq!(
        parser.parse("2021-03-15", &FormatSpec::Default, TemporalKind::Date),
        Some(MAR_15_2021)
    );
}

#[test]
fn explicit_pattern_with_offset() {
    let format = FormatSpec::Pattern(String::from("%Y-%m-%d %H:%M:%S %z"));
    assert_eq!(
        parse_datetime("2021-03-15 12:20:30 +0200", &format),
        Some(MAR_15_2021_102030)
    );
}

#[test]
fn empty_pattern_means_default() {
    assert_eq!(FormatSpec::from(""), FormatSpec::Default);
    assert_eq!(
        FormatSpec::from("%d/%m/%Y"),
        FormatSpec::Pattern(String::from("%d/%m/%Y"))
    );
}

#[test]
fn parser_reuse_across_formats() {
    let mut parser = parser();
    let dmy = FormatSpec::Pattern(String::from("%d/%m/%Y"));
    let named = FormatSpec::Pattern(String::from("%d %b %Y"));
    for _ in 0..3 {
        assert_eq!(
            parser.parse("15/03/2021", &dmy, TemporalKind::Date),
            Some(MAR_15_2021)
        );
        assert_eq!(
            parser.parse("15 Mar 2021", &named, TemporalKind::Date),
            Some(MAR_15_2021)
        );
    }
}
