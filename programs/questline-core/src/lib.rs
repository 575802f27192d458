#![warn(missing_docs)]

//! # Questline Core
//!
//! On-chain state machine of Questline: per-user progression, referral
//! chains and one-time soulbound asset issuance with cascading rewards.
//!
//! ## Instructions
//! - [`initialize`](questline_core::initialize): create the global config.
//! - [`update_config`](questline_core::update_config): replace the admin and the reward table.
//! - [`initialize_user_asset_data`](questline_core::initialize_user_asset_data): create the
//!   user asset data of a user id.
//! - [`update_user_asset_data`](questline_core::update_user_asset_data): update the stats of a user.
//! - [`apply_referral`](questline_core::apply_referral): link a user under a referrer.
//! - [`mint_soulbound_nft`](questline_core::mint_soulbound_nft): issue the soulbound asset
//!   of a user and pay the supplied referrers.
//! - [`update_soulbound_nft`](questline_core::update_soulbound_nft): update the metadata uri
//!   of an issued asset.

use anchor_lang::prelude::*;

/// Instructions.
pub mod instructions;

/// States.
pub mod states;

/// Operations.
pub mod ops;

/// Events.
pub mod events;

/// Error.
pub mod error;

mod internal;

mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use self::error::CoreError;
pub use instructions::*;
pub use questline_utils::constants;

use self::states::RewardTableParams;

declare_id!("ByPm5qSvyvTLTs86mUE2UixbPh35c7icpbVBBkdDkybk");

/// Questline core program.
#[program]
pub mod questline_core {
    use super::*;

    /// Initialize the global config. The signer becomes the admin.
    ///
    /// # Errors
    /// - [`AlreadyInitialized`](CoreError::AlreadyInitialized) if the config exists.
    /// - [`InvalidRewardTable`](CoreError::InvalidRewardTable) if the reward table is invalid.
    pub fn initialize(ctx: Context<Initialize>, reward_table: RewardTableParams) -> Result<()> {
        Initialize::invoke(ctx, reward_table)
    }

    /// Replace the admin and the reward table.
    #[access_control(internal::Authenticate::only_admin(&ctx))]
    pub fn update_config(
        ctx: Context<UpdateConfig>,
        new_admin: Pubkey,
        reward_table: RewardTableParams,
    ) -> Result<()> {
        UpdateConfig::invoke_unchecked(ctx, new_admin, reward_table)
    }

    /// Initialize the user asset data of the given user id.
    ///
    /// # Errors
    /// - [`Unauthorized`](CoreError::Unauthorized) if the signer is not the admin.
    /// - [`InvalidUserId`](CoreError::InvalidUserId) if the user id is empty or longer
    ///   than a seed.
    /// - [`InvalidAccountDerivation`](CoreError::InvalidAccountDerivation) if the user asset
    ///   data is not at the address derived from the user id.
    /// - [`AlreadyInitialized`](CoreError::AlreadyInitialized) if the user id is taken.
    #[access_control(internal::Authenticate::only_admin(&ctx))]
    pub fn initialize_user_asset_data(
        ctx: Context<InitializeUserAssetData>,
        user_id: String,
        xp: u64,
        level: u8,
        luck: u8,
    ) -> Result<()> {
        InitializeUserAssetData::invoke_unchecked(ctx, &user_id, xp, level, luck)
    }

    /// Update the stats of a user. XP can only grow.
    #[access_control(internal::Authenticate::only_admin(&ctx))]
    pub fn update_user_asset_data(
        ctx: Context<UpdateUserAssetData>,
        user_id: String,
        xp: u64,
        level: u8,
        luck: u8,
    ) -> Result<()> {
        UpdateUserAssetData::invoke_unchecked(ctx, &user_id, xp, level, luck)
    }

    /// Link a user under its direct referrer and pay the direct referral bonus.
    ///
    /// # Errors
    /// - [`Unauthorized`](CoreError::Unauthorized) if the signer is not the admin.
    /// - [`AlreadyReferred`](CoreError::AlreadyReferred) if the user has been referred.
    /// - [`SelfReferral`](CoreError::SelfReferral) if the user would be in its own chain.
    #[access_control(internal::Authenticate::only_admin(&ctx))]
    pub fn apply_referral(ctx: Context<ApplyReferral>) -> Result<()> {
        ApplyReferral::invoke_unchecked(ctx)
    }

    /// Mint the soulbound asset of a user, paying the referrers supplied as
    /// remaining accounts.
    ///
    /// # Errors
    /// - [`AlreadyMinted`](CoreError::AlreadyMinted) if the asset has been issued.
    /// - [`Unauthorized`](CoreError::Unauthorized) if the signer is neither the owner nor the admin.
    /// - [`ReferrerMismatch`](CoreError::ReferrerMismatch) if a supplied referrer is not in
    ///   the history at its claimed level.
    pub fn mint_soulbound_nft<'info>(
        ctx: Context<'_, '_, 'info, 'info, MintSoulboundNft<'info>>,
        args: MintSoulboundNftArgs,
    ) -> Result<()> {
        MintSoulboundNft::invoke(ctx, args)
    }

    /// Update the metadata uri of an issued soulbound asset.
    pub fn update_soulbound_nft(
        ctx: Context<UpdateSoulboundNft>,
        args: UpdateSoulboundNftArgs,
    ) -> Result<()> {
        UpdateSoulboundNft::invoke(ctx, args)
    }
}
