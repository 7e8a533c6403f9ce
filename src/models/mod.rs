//! Data models for Dayflow entities

mod attendance;
mod employee;
mod profile;
mod timeoff;
mod user;

pub use attendance::*;
pub use employee::*;
pub use profile::*;
pub use timeoff::*;
pub use user::*;
