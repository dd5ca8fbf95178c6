pub mod config;
pub mod data;
pub mod logging;

pub use data::column_stats::{column_stats, try_parse_number, ColumnStats};
pub use data::csv_exporter::CsvExporter;
pub use data::csv_loader::{CsvLoader, CsvOptions};
pub use data::error::{SchemaError, StatsError, TreeError, WriteError};
pub use data::join::{join, merge, JoinMode};
pub use data::json_bridge::{from_tree, to_tree};
pub use data::query_engine::{filter, group, sort, sort_numeric, Group, Groups};
pub use data::record::{Header, Record};
pub use data::store::Store;
pub use data::text_encoding::TextEncoding;
