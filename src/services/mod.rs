pub mod position_service;
pub mod recommendation;
pub mod screener_service;
pub mod user_service;
pub mod valuation_service;
