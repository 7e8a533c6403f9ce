//! API client module for the Dayflow backend

pub mod attendance;
pub mod client;
pub mod employees;
pub mod error;
pub mod profile;
pub mod refresh;
pub mod request;
pub mod timeoff;

pub use client::{ApiClient, ApiClientBuilder, ApiResponse, LogRedirect, SignInRedirect, LOGIN_PATH};
pub use error::{to_message, ApiError, FALLBACK_MESSAGE};
pub use refresh::RefreshCoordinator;
pub use request::{ApiRequest, Attachment, MultipartBody, RequestBody};
