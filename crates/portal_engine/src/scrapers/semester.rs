use std::sync::LazyLock;

use portal_core::{field, text, Find, ScrapeError, ScrapeFn};
use regex::Regex;

use super::course;
use crate::{Season, Semester, SemesterCourses};

/// Semester blocks in the navigation sidebar.
pub const SEMESTER_SELECTOR: &str =
    ".block_navigation>.card-body>.card-text>ul>li>ul>li:nth-child(3)>ul>li:nth-child(n+3)";

static SEMESTER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?<season>WS|SS)(?<year>\d{4})").expect("semester-id pattern is valid")
});

pub fn parse_semester(label: String) -> Result<Semester, ScrapeError> {
    let invalid = || ScrapeError::new(format!("Could not parse semester from \"{label}\""));
    let caps = SEMESTER_ID.captures(&label).ok_or_else(invalid)?;
    let season = Season::from_code(&caps["season"]).ok_or_else(invalid)?;
    let year = caps["year"].parse().map_err(|_| invalid())?;
    Ok(Semester { year, season })
}

/// One semester block: its label plus every course listed below it.
pub fn semester() -> ScrapeFn<SemesterCourses> {
    let label = Find::first_matching("p span").scrape_first(text().and_then(parse_semester));
    let courses = Find::first_matching("ul")
        .children()
        .scrape_each(course());
    Find::context()
        .compound_scrape_first((field("semester", label), field("courses", courses)))
        .map(|(semester, courses)| SemesterCourses { semester, courses })
}

pub fn semester_list() -> ScrapeFn<Vec<SemesterCourses>> {
    Find::context()
        .next(Find::all_matching(SEMESTER_SELECTOR, false))
        .scrape_each(semester())
}
