//! Domain types and pure logic shared by the database and API crates.

pub mod error;
pub mod reference;
pub mod text;
pub mod time_report;
pub mod types;
