#![deny(missing_docs)]
#![deny(unreachable_pub)]

//! # Questline Utils
//!
//! Definitions shared by the Questline program and its clients.

/// Seeds and capacity constants.
pub mod constants;

/// PDA derivation.
pub mod pda;

/// User identifier.
pub mod user_id;

/// Flags.
pub mod flags;

pub use bitmaps;
pub use paste;

pub use crate::{
    flags::{RewardFlag, UserFlag},
    user_id::{UserId, UserIdError},
};
