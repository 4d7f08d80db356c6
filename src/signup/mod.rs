// Signup tokens correlate a billing checkout session with the pending signup
// that started it. The token travels as an opaque client reference id.

pub mod error;
pub mod token;

pub use error::SignupTokenError;
pub use token::{SignupPayload, SignupTokenSigner};
