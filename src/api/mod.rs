pub mod backend;
pub mod models;

pub use backend::*;
pub use models::*;
