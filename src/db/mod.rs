pub mod lot_queries;
pub mod user_queries;
