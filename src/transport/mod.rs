//! Transport layer: wire-format details (path templates and query strings).

pub mod path;
mod query;

pub use query::{encode_logs_query, encode_send_options, with_query};
