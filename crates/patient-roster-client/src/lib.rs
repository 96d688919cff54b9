//! Remote client for the patient roster.
//!
//! Drives the same list view as the core crate, but against a backend that
//! owns the records and does the filtering, sorting and paging itself.
//!
//! - [`query`]: view state to `GET /patients` parameters
//! - [`transport`]: the backend seam and its reqwest implementation
//! - [`remote`]: remote-mode controller
//! - [`config`]: YAML configuration with env/flag overrides

pub mod config;
pub mod error;
pub mod query;
pub mod remote;
pub mod transport;

pub use config::{ClientConfig, ConfigFile};
pub use error::{ClientError, ClientResult};
pub use query::QueryParams;
pub use remote::{fetch_all_pages, RemoteRoster, STATS_PAGE_SIZE};
pub use transport::{HttpTransport, Transport};
