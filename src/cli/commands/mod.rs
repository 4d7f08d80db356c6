pub mod products;
pub mod serve;
pub mod token;
