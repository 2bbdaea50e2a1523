//! The request/response pipeline shared by all endpoints.
//!
//! Query parameters are parsed into [`params::FormatOptions`], the version and
//! species path segments are checked by [`validate`], and results are turned
//! into responses by [`render::ResponseRenderer`].  Every failure ends in one
//! of the in-band error responses from [`error`].

pub mod error;
pub mod params;
pub mod render;
pub mod validate;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_XML: &str = "text/xml";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
