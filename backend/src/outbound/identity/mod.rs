//! Identity provider adapters.

mod jwt;

pub use jwt::JwtIdentityProvider;
