pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod model;
pub mod output;
pub mod session;
pub mod source;
pub mod utils;

#[cfg(test)]
mod tests;
