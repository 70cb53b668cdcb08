pub mod lot;
pub mod market;
pub mod position;
pub mod screener;
pub mod user;
pub mod valuation;

pub use lot::*;
pub use market::*;
pub use position::*;
pub use screener::*;
pub use user::*;
pub use valuation::*;
