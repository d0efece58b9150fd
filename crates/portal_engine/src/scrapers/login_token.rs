use portal_core::{attr, Find, ScrapeFn};

/// The anti-forgery token of the login form.
pub fn login_token() -> ScrapeFn<String> {
    Find::context()
        .next(Find::body())
        .next(Find::first_matching("form"))
        .next(Find::first_matching("input[name='logintoken']"))
        .scrape_first(attr("value"))
}
