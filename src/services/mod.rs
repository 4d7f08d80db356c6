pub mod product_view;
pub mod signup_service;

pub use product_view::{ProductView, ProductViewError, ProductViewRequest, ProductViewService};
pub use signup_service::SignupService;
