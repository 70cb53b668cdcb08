pub mod constituents;
pub mod quote_gateway;
pub mod quote_provider;
pub mod yahoo;
