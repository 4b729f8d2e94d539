pub mod api;
pub mod app;
pub mod browse;
pub mod cli;
pub mod config;
pub mod output;
pub mod pager;
pub mod view;

#[cfg(test)]
mod tests;
