//! Identity written by the access middleware, read back by handlers.
//!
//! Two ways to read it:
//! - `read_identity(&Extensions)` never fails; it yields `NO_IDENTITY` (-1) when
//!   nothing was attached, so callers must check before using the id.
//! - `AuthCtxExtractor` is the strict form for protected handlers and rejects
//!   with 403 when the identity is missing.

mod core;
mod types;

pub use self::core::{AuthCtxExtractor, read_identity};
pub use self::types::{AuthCtx, NO_IDENTITY};
