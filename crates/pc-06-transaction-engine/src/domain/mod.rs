pub mod appendages;
pub mod attachments;
pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod transaction_types;

pub use appendages::*;
pub use attachments::*;
pub use entities::*;
pub use errors::*;
pub use lifecycle::*;
pub use transaction_types::*;
