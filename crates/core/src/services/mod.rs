pub mod aggregation_service;
pub mod fx_service;
pub mod holdings_service;
pub mod quote_service;
pub mod valuation_service;
