pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;
pub mod keys;

pub use claims::Claims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use issuer::AccessToken;
pub use issuer::TokenIssuer;
pub use issuer::TokenLifetimes;
pub use keys::KeyRing;
