//! Utility modules shared by the resolver and the sanitizer.

pub mod html;
pub mod url;
