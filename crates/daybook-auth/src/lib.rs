pub mod cognito;
pub mod error;
pub mod provider;
pub mod verifier;

pub use cognito::CognitoIdentityProvider;
pub use error::AuthError;
pub use provider::{IdentityProvider, Registration, StaticIdentityProvider, TokenSet};
pub use verifier::{Claims, JwtVerifier, TokenVerifier};
