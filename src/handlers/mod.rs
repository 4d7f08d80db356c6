// Route handlers. Each handler validates its body, delegates to a service,
// and wraps the result in the `{ success, data }` envelope.

pub mod products;
pub mod signup_token;
pub mod system;

pub use products::products_view_post;
pub use signup_token::{signup_token_post, signup_token_verify};
pub use system::{health, not_found, root};
