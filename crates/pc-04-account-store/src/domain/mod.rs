pub mod balance;
pub mod entities;
pub mod errors;

pub use balance::*;
pub use entities::*;
pub use errors::*;
