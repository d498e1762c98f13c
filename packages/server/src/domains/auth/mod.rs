//! Authentication domain: users, session tokens, and auth endpoints.

pub mod jwt;
pub mod routes;
pub mod users;

pub use jwt::{Claims, JwtService};
pub use users::{MemoryUserStore, PgUserStore, User, UserStore, UserStoreError};
