pub mod backend;
pub mod size_table;

pub use backend::HttpBackendAdapter;
pub use size_table::{load_size_table, parse_size_table, SizeTableLoadError};
