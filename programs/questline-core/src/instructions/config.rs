use anchor_lang::prelude::*;
use questline_utils::constants::CONFIG_SEED;

use crate::{
    events::ConfigUpdated,
    internal,
    states::{load_uninitialized, Config, RewardTable, RewardTableParams},
};

/// The accounts definition for [`initialize`](crate::questline_core::initialize).
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The admin, which also pays for the config.
    #[account(mut)]
    pub admin: Signer<'info>,
    /// The config to create.
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump,
    )]
    pub config: AccountLoader<'info, Config>,
    /// The system program.
    pub system_program: Program<'info, System>,
}

impl Initialize<'_> {
    pub(crate) fn invoke(ctx: Context<Self>, reward_table: RewardTableParams) -> Result<()> {
        let table = RewardTable::try_from(&reward_table)?;
        let admin = ctx.accounts.admin.key();
        let mut config = load_uninitialized(&ctx.accounts.config)?;
        config.init(ctx.bumps.config, admin, table);

        msg!("[Config] initialized with admin: {}", admin);
        emit!(ConfigUpdated {
            admin,
            direct_referral_bonus: table.direct_referral_bonus,
            self_mint_bonus: table.self_mint_bonus,
            max_depth: table.max_depth(),
        });
        Ok(())
    }
}

/// The accounts definition for [`update_config`](crate::questline_core::update_config).
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    /// The current admin.
    pub authority: Signer<'info>,
    /// The config to update.
    #[account(mut, seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
}

impl UpdateConfig<'_> {
    /// CHECK: only the admin is allowed to use this instruction.
    pub(crate) fn invoke_unchecked(
        ctx: Context<Self>,
        new_admin: Pubkey,
        reward_table: RewardTableParams,
    ) -> Result<()> {
        let table = RewardTable::try_from(&reward_table)?;
        ctx.accounts.config.load_mut()?.update(new_admin, table);

        msg!("[Config] updated, admin: {}", new_admin);
        emit!(ConfigUpdated {
            admin: new_admin,
            direct_referral_bonus: table.direct_referral_bonus,
            self_mint_bonus: table.self_mint_bonus,
            max_depth: table.max_depth(),
        });
        Ok(())
    }
}

impl<'info> internal::Authentication<'info> for UpdateConfig<'info> {
    fn authority(&self) -> &Signer<'info> {
        &self.authority
    }

    fn config(&self) -> &AccountLoader<'info, Config> {
        &self.config
    }
}
