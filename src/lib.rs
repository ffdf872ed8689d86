pub mod analyzers;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod live;
pub mod output;
pub mod parser;
pub mod policies;
pub mod readings;
pub mod session;
