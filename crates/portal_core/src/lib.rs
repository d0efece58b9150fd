//! Portal core: two-track result algebra, deferred operations and the
//! DOM-search combinator engine. Pure, no IO.
mod find;
mod operation;
mod scrape_error;

pub mod outcome;
pub mod seq;

pub use find::{attr, field, inner_html, text, Field, FieldSet, Find, ScrapeFn};
pub use operation::Operation;
pub use outcome::{collect, collect_fields, combine_two, from_nullable, Fields};
pub use scrape_error::ScrapeError;

/// Re-exported so callers can parse documents without naming `scraper` directly.
pub use scraper::{ElementRef, Html};
