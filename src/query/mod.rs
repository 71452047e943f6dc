//! Query execution lifecycle.
//!
//! Normalization, submission, polling, and decoding are kept in separate
//! modules; `QueryExecutor` composes them.

pub mod decoder;
pub mod executor;
pub mod poller;
pub mod request;
pub mod results;
pub mod submit;

pub use decoder::{decode_page, extract_statistics, DecodedPage};
pub use executor::{execute_query, QueryExecutor};
pub use poller::{PollOutcome, StatusPoller, POLL_INTERVAL};
pub use request::QueryRequest;
pub use results::{Column, QueryResults, QueryStatistics, QueryStatus, Row};
pub use submit::submit_execution;
