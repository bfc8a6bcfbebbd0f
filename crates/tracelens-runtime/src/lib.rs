pub mod config;
pub mod error;
pub mod live;
pub mod store;
pub mod tail;

pub use config::Config;
pub use error::{Error, Result};
pub use live::LiveTrace;
pub use store::{RunEntry, RunStore};
pub use tail::poll;
