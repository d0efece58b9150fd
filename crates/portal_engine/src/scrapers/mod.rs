//! Rules tied to the portal's markup. Everything selector- or regex-specific
//! lives here so a markup change touches only this module.
mod course;
mod login_token;
mod semester;

pub use course::{course, parse_course_id, parse_course_name};
pub use login_token::login_token;
pub use semester::{parse_semester, semester, semester_list, SEMESTER_SELECTOR};
