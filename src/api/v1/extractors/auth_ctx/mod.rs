//! Who is calling and with which permission: `AuthCtx`, as left by the route guard.

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;
