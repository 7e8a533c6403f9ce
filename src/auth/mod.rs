//! Authentication for the Dayflow API
//!
//! Sign-in and admin sign-up issue an access/refresh token pair which is kept
//! in a [`TokenStore`]. Refreshing an expired access token is handled by the
//! API client.

pub mod session;
pub mod tokens;

pub use session::{current_user, is_authenticated, signin, signout, signup};
pub use tokens::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
