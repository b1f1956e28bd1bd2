// Keyintent Configuration Module
// JSON parsing for the key filter table, the blast table and source snapshots

pub mod parser;

pub use parser::{
    parse_blast_table, parse_blast_table_path, parse_key, parse_key_table, parse_key_table_path,
    parse_sources_path, ConfigError,
};
