pub mod cache;
pub mod dashboard;
pub mod holding;
pub mod quote;
pub mod settings;
pub mod valuation;
