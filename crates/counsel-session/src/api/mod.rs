pub(crate) mod auth_api;
pub(crate) mod error;
pub(crate) mod http_transport;
pub(crate) mod transport;

pub use auth_api::AuthApi;
pub use error::{ApiError, Result as ApiResult};
pub use http_transport::HttpTransport;
pub use transport::AuthTransport;
