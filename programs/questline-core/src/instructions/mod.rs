mod config;
mod referral;
mod soulbound;
mod user;

pub use config::*;
pub use referral::*;
pub use soulbound::*;
pub use user::*;
