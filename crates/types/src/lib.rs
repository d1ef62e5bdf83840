pub mod action;
pub mod allocation;
pub mod auth;
pub mod block;
pub mod registry;
pub mod result;
pub mod transaction;

pub use action::*;
pub use allocation::*;
pub use auth::*;
pub use block::*;
pub use registry::*;
pub use result::*;
pub use transaction::*;
