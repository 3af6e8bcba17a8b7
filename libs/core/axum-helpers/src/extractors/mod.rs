//! Extractors that reject malformed input with the shared
//! [`ErrorResponse`](crate::ErrorResponse) body.

pub mod id_path;
pub mod json_body;
pub mod query_params;

pub use id_path::IdPath;
pub use json_body::JsonBody;
pub use query_params::QueryParams;
