use anchor_lang::prelude::*;
use questline_utils::constants::CONFIG_SEED;

use crate::{
    events::ReferralApplied,
    internal,
    states::{Config, UserAssetData},
    CoreError,
};

/// The accounts definition for [`apply_referral`](crate::questline_core::apply_referral).
#[derive(Accounts)]
pub struct ApplyReferral<'info> {
    /// The admin.
    pub authority: Signer<'info>,
    /// Config.
    #[account(seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
    /// The referee.
    #[account(
        mut,
        constraint = user_asset_data.key() != referrer_asset_data.key() @ CoreError::SelfReferral,
    )]
    pub user_asset_data: AccountLoader<'info, UserAssetData>,
    /// The direct referrer.
    #[account(mut)]
    pub referrer_asset_data: AccountLoader<'info, UserAssetData>,
}

impl ApplyReferral<'_> {
    /// CHECK: only the admin is allowed to use this instruction.
    pub(crate) fn invoke_unchecked(ctx: Context<Self>) -> Result<()> {
        let accounts = &ctx.accounts;
        let user_address = accounts.user_asset_data.key();
        let referrer_address = accounts.referrer_asset_data.key();

        let config = accounts.config.load()?;
        let mut user = accounts.user_asset_data.load_mut()?;
        let mut referrer = accounts.referrer_asset_data.load_mut()?;
        user.validate_address(&user_address)?;
        referrer.validate_address(&referrer_address)?;

        let bonus = user.apply_referral(&mut referrer, &config.reward_table)?;
        let depth = user.referral_history().len() as u8;

        msg!(
            "[Referral] {} referred by {}, depth: {}",
            user.owner,
            referrer.owner,
            depth
        );
        emit!(ReferralApplied {
            user_asset_data: user_address,
            referrer_asset_data: referrer_address,
            depth,
            bonus,
        });
        Ok(())
    }
}

impl<'info> internal::Authentication<'info> for ApplyReferral<'info> {
    fn authority(&self) -> &Signer<'info> {
        &self.authority
    }

    fn config(&self) -> &AccountLoader<'info, Config> {
        &self.config
    }
}
