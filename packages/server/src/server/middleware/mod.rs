pub mod cookie_auth;

pub use cookie_auth::{cookie_auth_middleware, AuthUser};
