#![forbid(unsafe_code)]

pub mod cmi;
pub mod content_url;
pub mod model;

pub use cmi::{Scorm12Element, Scorm2004Element, ScormVersion};
pub use content_url::{ContentKind, ContentUrlError, rewrite_content_url};
