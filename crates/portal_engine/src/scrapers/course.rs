use std::sync::LazyLock;

use portal_core::{attr, field, Find, ScrapeError, ScrapeFn};
use regex::Regex;

use crate::Course;

// "<name> <format or -> ... (<lecturers>)", e.g. "Databases ILV (Doe, Roe)".
static COURSE_INFO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[- ]*(?<name>.+) ((?<format>[A-Z]{2,3})|-).*\((?<lecturers>.*)\)")
        .expect("course-info pattern is valid")
});

/// One course entry: the first link below the context element.
pub fn course() -> ScrapeFn<Course> {
    Find::context()
        .next(Find::first_matching("a"))
        .compound_scrape_first((
            field("id", attr("href").and_then(parse_course_id)),
            field("name", attr("title").and_then(parse_course_name)),
        ))
        .map(|(id, name)| Course { id, name })
}

/// Course id from a link like `.../course/view.php?id=4711`.
///
/// Reads the digits right after the first `=`.
pub fn parse_course_id(href: String) -> Result<u64, ScrapeError> {
    let id_text = href.split_once('=').map(|(_, rest)| rest).unwrap_or("");
    let digits: String = id_text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits
        .parse()
        .map_err(|_| ScrapeError::new(format!("Could not parse course-id \"{id_text}\".")))
}

pub fn parse_course_name(info: String) -> Result<String, ScrapeError> {
    COURSE_INFO
        .captures(&info)
        .and_then(|caps| caps.name("name"))
        .map(|name| name.as_str().to_string())
        .ok_or_else(|| ScrapeError::new(format!("Could not parse course-info from \"{info}\".")))
}
