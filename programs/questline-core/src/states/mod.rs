/// Global config.
pub mod config;

/// User asset data.
pub mod user;

/// Referral history.
pub mod referral;

use anchor_lang::{prelude::*, Owner, ZeroCopy};
use std::cell::RefMut;

use crate::CoreError;

pub use self::{
    config::{Config, RewardTable, RewardTableParams},
    referral::{ReferralEntry, ReferralHistory},
    user::UserAssetData,
};

/// Load an account created by `init_if_needed` for initialization.
///
/// Fails with [`CoreError::AlreadyInitialized`] if the account has already
/// been initialized.
pub(crate) fn load_uninitialized<'a, 'info, T>(
    loader: &'a AccountLoader<'info, T>,
) -> Result<RefMut<'a, T>>
where
    T: ZeroCopy + Owner,
{
    loader
        .load_init()
        .map_err(|_| error!(CoreError::AlreadyInitialized))
}
