pub mod csv_export;
pub mod json;

pub use csv_export::{parse_csv, parse_csv_reader};
pub use json::{parse_json, parse_json_str};
