//! Bearer-token identity: JWT issuance/validation, password hashing, and
//! the request extractors that resolve the acting user.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use middleware::{AuthUser, ManagerUser};
