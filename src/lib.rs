//! CellBase web services library main entry point.

pub mod common;
pub mod db;
pub mod reference;
pub mod server;
