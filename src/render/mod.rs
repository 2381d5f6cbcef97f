pub mod html;

pub use html::{report_subject, HtmlRenderer};
