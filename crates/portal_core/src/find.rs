//! Declarative DOM search.
//!
//! A [`Find`] is a reusable rule from a context element to an ordered list of
//! matched elements. Rules compose by value: `next` narrows the context,
//! `children` steps one level down, and the `scrape_*` family turns a rule
//! into a [`ScrapeFn`] that extracts a typed value. Zero matches is an error
//! unless a rule explicitly allows it.

use std::sync::Arc;

use portal_logging::portal_debug;
use scraper::{ElementRef, Html, Selector};

use crate::{outcome, seq, ScrapeError};

type SearchResult<'a> = Result<Vec<ElementRef<'a>>, ScrapeError>;
type SearchFn = dyn for<'a> Fn(ElementRef<'a>) -> SearchResult<'a> + Send + Sync;
type ExtractFn<V> = dyn for<'a> Fn(ElementRef<'a>) -> Result<V, ScrapeError> + Send + Sync;

/// A composable search rule.
#[derive(Clone)]
pub struct Find {
    search: Arc<SearchFn>,
}

impl Find {
    /// Wraps an arbitrary search function.
    pub fn using<F>(search: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>) -> SearchResult<'a> + Send + Sync + 'static,
    {
        Self {
            search: Arc::new(search),
        }
    }

    /// Identity: the context element itself. Never fails.
    pub fn context() -> Self {
        Self::using(|ctx| Ok(seq::singleton(ctx)))
    }

    /// First descendant matching `selector`.
    pub fn first_matching(selector: &str) -> Self {
        let parsed = parse_selector(selector);
        let selector = selector.to_owned();
        Self::using(move |ctx| {
            let parsed = parsed.as_ref().map_err(Clone::clone)?;
            ctx.select(parsed).next().map(seq::singleton).ok_or_else(|| {
                ScrapeError::new(format!(
                    "Could not find any element with selector \"{selector}\"."
                ))
            })
        })
    }

    /// Every descendant matching `selector`, in document order.
    pub fn all_matching(selector: &str, allow_empty: bool) -> Self {
        let parsed = parse_selector(selector);
        let selector = selector.to_owned();
        Self::using(move |ctx| {
            let parsed = parsed.as_ref().map_err(Clone::clone)?;
            let elements: Vec<_> = ctx.select(parsed).collect();
            if elements.is_empty() && !allow_empty {
                return Err(ScrapeError::new(format!(
                    "Found no elements with selector \"{selector}\"."
                )));
            }
            Ok(elements)
        })
    }

    pub fn body() -> Self {
        Self::first_matching("body")
    }

    /// Evaluates the rule against `ctx`.
    pub fn search_in<'a>(&self, ctx: ElementRef<'a>) -> SearchResult<'a> {
        (self.search)(ctx)
    }

    /// Runs `other` against every element this rule matches and concatenates
    /// the results in order. The first failing sub-search aborts the whole
    /// search.
    pub fn next(&self, other: Find) -> Find {
        let this = self.clone();
        Find::using(move |ctx| {
            let elements = this.search_in(ctx)?;
            let groups = outcome::collect(elements.into_iter().map(|e| other.search_in(e)))?;
            Ok(seq::flatten(groups))
        })
    }

    /// Direct element children of every match, flattened in order.
    ///
    /// A match without children contributes nothing; that is not an error.
    pub fn children(&self) -> Find {
        let this = self.clone();
        Find::using(move |ctx| {
            let elements = this.search_in(ctx)?;
            Ok(elements
                .into_iter()
                .flat_map(|e| e.children().filter_map(ElementRef::wrap))
                .collect())
        })
    }

    /// Applies `scrape` to the first match.
    pub fn scrape_first<V: 'static>(&self, scrape: ScrapeFn<V>) -> ScrapeFn<V> {
        let this = self.clone();
        ScrapeFn::new(move |ctx| {
            let elements = this.search_in(ctx)?;
            match elements.first() {
                Some(first) => scrape.scrape(*first),
                None => Err(ScrapeError::new("No element to scrape")),
            }
        })
    }

    /// Applies `scrape` to every match. The first failure, left to right, wins.
    pub fn scrape_each<V: 'static>(&self, scrape: ScrapeFn<V>) -> ScrapeFn<Vec<V>> {
        let this = self.clone();
        ScrapeFn::new(move |ctx| {
            let elements = this.search_in(ctx)?;
            outcome::collect(elements.into_iter().map(|e| scrape.scrape(e)))
        })
    }

    /// Applies every field of `fields` to the same first match.
    ///
    /// Fields run in declaration order and the first failing field's error is
    /// returned as is.
    pub fn compound_scrape_first<S>(&self, fields: S) -> ScrapeFn<S::Output>
    where
        S: FieldSet,
        S::Output: 'static,
    {
        let this = self.clone();
        ScrapeFn::new(move |ctx| {
            let elements = this.search_in(ctx)?;
            let first = elements
                .first()
                .copied()
                .ok_or_else(|| ScrapeError::new("No elements to compound-scrape"))?;
            fields.scrape_fields(first)
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|err| {
        ScrapeError::with_cause(
            format!("Invalid selector \"{selector}\"."),
            ScrapeError::new(err.to_string()),
        )
    })
}

/// A reusable rule from an element to a typed value.
pub struct ScrapeFn<V> {
    extract: Arc<ExtractFn<V>>,
}

impl<V> Clone for ScrapeFn<V> {
    fn clone(&self) -> Self {
        Self {
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<V: 'static> ScrapeFn<V> {
    pub fn new<F>(extract: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>) -> Result<V, ScrapeError> + Send + Sync + 'static,
    {
        Self {
            extract: Arc::new(extract),
        }
    }

    pub fn scrape(&self, element: ElementRef<'_>) -> Result<V, ScrapeError> {
        (self.extract)(element)
    }

    /// Scrapes starting from the document's root (`<html>`) element.
    pub fn scrape_document(&self, document: &Html) -> Result<V, ScrapeError> {
        self.scrape(document.root_element())
    }

    pub fn map<U, F>(self, map: F) -> ScrapeFn<U>
    where
        U: 'static,
        F: Fn(V) -> U + Send + Sync + 'static,
    {
        ScrapeFn::new(move |element| self.scrape(element).map(&map))
    }

    /// Chains a fallible conversion of the scraped value.
    pub fn and_then<U, F>(self, parse: F) -> ScrapeFn<U>
    where
        U: 'static,
        F: Fn(V) -> Result<U, ScrapeError> + Send + Sync + 'static,
    {
        ScrapeFn::new(move |element| self.scrape(element).and_then(&parse))
    }
}

/// Value of attribute `name`; an absent attribute is an error.
pub fn attr(name: &str) -> ScrapeFn<String> {
    let name = name.to_owned();
    ScrapeFn::new(move |element| {
        element
            .value()
            .attr(&name)
            .map(str::to_owned)
            .ok_or_else(|| {
                ScrapeError::new(format!(
                    "Element <{}> has no attribute \"{name}\".",
                    element.value().name()
                ))
            })
    })
}

/// Trimmed text content of the element and its descendants.
pub fn text() -> ScrapeFn<String> {
    ScrapeFn::new(|element| Ok(element.text().collect::<String>().trim().to_owned()))
}

pub fn inner_html() -> ScrapeFn<String> {
    ScrapeFn::new(|element| Ok(element.inner_html()))
}

/// One named field of a compound scrape.
pub struct Field<V> {
    name: String,
    scrape: ScrapeFn<V>,
}

pub fn field<V>(name: impl Into<String>, scrape: ScrapeFn<V>) -> Field<V> {
    Field {
        name: name.into(),
        scrape,
    }
}

impl<V: 'static> Field<V> {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn scrape(&self, element: ElementRef<'_>) -> Result<V, ScrapeError> {
        self.scrape.scrape(element).inspect_err(|err| {
            portal_debug!("compound field `{}` failed: {}", self.name, err);
        })
    }
}

/// A set of named fields scraped from one element as a single unit.
///
/// Implemented for `Vec<Field<V>>`, which yields a [`outcome::Fields`] map, and
/// for tuples of two to four fields with independent value types, which yield
/// the tuple of values.
pub trait FieldSet: Send + Sync + 'static {
    type Output;

    fn scrape_fields(&self, element: ElementRef<'_>) -> Result<Self::Output, ScrapeError>;
}

impl<V: 'static> FieldSet for Vec<Field<V>> {
    type Output = outcome::Fields<V>;

    fn scrape_fields(&self, element: ElementRef<'_>) -> Result<Self::Output, ScrapeError> {
        outcome::collect_fields(
            self.iter()
                .map(|field| (field.name.as_str(), field.scrape(element))),
        )
    }
}

macro_rules! tuple_field_set {
    ($($field:ident: $value:ident),+) => {
        impl<$($value: 'static),+> FieldSet for ($(Field<$value>,)+) {
            type Output = ($($value,)+);

            fn scrape_fields(&self, element: ElementRef<'_>) -> Result<Self::Output, ScrapeError> {
                let ($($field,)+) = self;
                Ok(($($field.scrape(element)?,)+))
            }
        }
    };
}

tuple_field_set!(a: A, b: B);
tuple_field_set!(a: A, b: B, c: C);
tuple_field_set!(a: A, b: B, c: C, d: D);
