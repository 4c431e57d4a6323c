pub mod claims;
pub mod errors;
pub mod manager;

pub use claims::Claims;
pub use claims::TokenKind;
pub use errors::TokenError;
pub use manager::TokenConfig;
pub use manager::TokenManager;
pub use manager::TokenPair;
