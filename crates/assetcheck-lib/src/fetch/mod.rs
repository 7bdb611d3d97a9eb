mod engine;
mod types;

pub use engine::fetch_and_check_all;
pub use types::{FetchItem, FetchOptions};
