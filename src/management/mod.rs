mod auth;

pub use auth::TokenCache;
