pub mod csrf;
pub mod dto;
pub mod http_client;

pub use csrf::{CsrfToken, CSRF_HEADER};
pub use http_client::HttpImportJobService;
