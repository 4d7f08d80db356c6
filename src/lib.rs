pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod matching;
pub mod middleware;
pub mod products;
pub mod services;
pub mod signup;
