pub mod http;
pub mod memory;

pub use http::HttpNewsApi;
pub use memory::InMemoryNewsApi;
