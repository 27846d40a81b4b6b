pub mod access_log;
pub mod request_id;

pub use access_log::access_log_middleware;
pub use request_id::{request_id_middleware, request_span};
