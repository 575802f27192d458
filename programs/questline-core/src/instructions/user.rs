use anchor_lang::{prelude::*, Discriminator};
use questline_utils::{
    constants::{CONFIG_SEED, USER_ASSET_DATA_SEED},
    pda::find_user_asset_data_address,
    UserId,
};

use crate::{
    events::{UserInitialized, UserStatsUpdated},
    internal,
    states::{Config, UserAssetData},
    utils::create_or_allocate_account,
    CoreError,
};

/// The accounts definition for
/// [`initialize_user_asset_data`](crate::questline_core::initialize_user_asset_data).
#[derive(Accounts)]
pub struct InitializeUserAssetData<'info> {
    /// The admin, which also pays for the user asset data.
    #[account(mut)]
    pub admin: Signer<'info>,
    /// Config.
    #[account(seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
    /// The wallet of the user.
    /// CHECK: only the address is used.
    pub user: UncheckedAccount<'info>,
    /// The user asset data to create.
    /// CHECK: derived from the validated user id and created by the handler.
    #[account(mut)]
    pub user_asset_data: UncheckedAccount<'info>,
    /// The system program.
    pub system_program: Program<'info, System>,
}

impl InitializeUserAssetData<'_> {
    /// CHECK: only the admin is allowed to use this instruction.
    pub(crate) fn invoke_unchecked(
        ctx: Context<Self>,
        user_id: &str,
        xp: u64,
        level: u8,
        luck: u8,
    ) -> Result<()> {
        // The user id must be validated before it is used as a seed.
        let user_id = UserId::new(user_id).map_err(CoreError::from)?;
        let accounts = &ctx.accounts;
        let (address, bump) = find_user_asset_data_address(&user_id, &crate::ID);
        require_keys_eq!(
            address,
            accounts.user_asset_data.key(),
            CoreError::InvalidAccountDerivation
        );
        require_keys_neq!(
            *accounts.user_asset_data.owner,
            crate::ID,
            CoreError::AlreadyInitialized
        );

        let bump_bytes = [bump];
        let seeds: &[&[u8]] = &[
            USER_ASSET_DATA_SEED,
            user_id.as_bytes(),
            crate::ID.as_ref(),
            &bump_bytes,
        ];
        create_or_allocate_account(
            &crate::ID,
            accounts.admin.to_account_info(),
            accounts.system_program.to_account_info(),
            accounts.user_asset_data.to_account_info(),
            seeds,
            8 + UserAssetData::INIT_SPACE,
        )?;

        let xp = accounts.config.load()?.reward_table.initial_xp(xp);
        let owner = accounts.user.key();
        {
            let mut data = accounts.user_asset_data.try_borrow_mut_data()?;
            let (discriminator, data) = data.split_at_mut(8);
            require!(
                discriminator.iter().all(|byte| *byte == 0),
                CoreError::AlreadyInitialized
            );
            discriminator.copy_from_slice(UserAssetData::DISCRIMINATOR);
            let user: &mut UserAssetData =
                bytemuck::try_from_bytes_mut(&mut data[..UserAssetData::INIT_SPACE])
                    .map_err(|_| error!(ErrorCode::AccountDidNotDeserialize))?;
            user.init(bump, owner, &user_id, xp, level, luck);
        }

        msg!("[User] initialized `{}` for {}", user_id, owner);
        emit!(UserInitialized {
            user_asset_data: address,
            owner,
            xp,
            level,
            luck,
        });
        Ok(())
    }
}

impl<'info> internal::Authentication<'info> for InitializeUserAssetData<'info> {
    fn authority(&self) -> &Signer<'info> {
        &self.admin
    }

    fn config(&self) -> &AccountLoader<'info, Config> {
        &self.config
    }
}

/// The accounts definition for
/// [`update_user_asset_data`](crate::questline_core::update_user_asset_data).
#[derive(Accounts)]
#[instruction(user_id: String)]
pub struct UpdateUserAssetData<'info> {
    /// The admin.
    pub admin: Signer<'info>,
    /// Config.
    #[account(seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
    /// The user asset data to update.
    #[account(
        mut,
        seeds = [USER_ASSET_DATA_SEED, user_id.as_bytes(), crate::ID.as_ref()],
        bump = user_asset_data.load()?.bump,
    )]
    pub user_asset_data: AccountLoader<'info, UserAssetData>,
}

impl UpdateUserAssetData<'_> {
    /// CHECK: only the admin is allowed to use this instruction.
    pub(crate) fn invoke_unchecked(
        ctx: Context<Self>,
        user_id: &str,
        xp: u64,
        level: u8,
        luck: u8,
    ) -> Result<()> {
        ctx.accounts
            .user_asset_data
            .load_mut()?
            .update_stats(xp, level, luck)?;

        msg!(
            "[User] stats of `{}` updated: xp={} level={} luck={}",
            user_id,
            xp,
            level,
            luck
        );
        emit!(UserStatsUpdated {
            user_asset_data: ctx.accounts.user_asset_data.key(),
            xp,
            level,
            luck,
        });
        Ok(())
    }
}

impl<'info> internal::Authentication<'info> for UpdateUserAssetData<'info> {
    fn authority(&self) -> &Signer<'info> {
        &self.admin
    }

    fn config(&self) -> &AccountLoader<'info, Config> {
        &self.config
    }
}
