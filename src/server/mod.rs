//! REST API server and its schema.

pub mod response;
pub mod run;
pub mod schema;
