pub mod export;
pub mod models;
pub mod store;

pub use export::*;
pub use models::*;
pub use store::*;
