use std::collections::HashSet;

use anchor_lang::{prelude::*, Id};
use anchor_spl::{
    associated_token::{get_associated_token_address, AssociatedToken},
    metadata::Metadata,
    token::Token,
};
use questline_utils::{
    constants::CONFIG_SEED,
    pda::{
        find_asset_authority_address, find_master_edition_address, find_metadata_address,
        find_soulbound_asset_address,
    },
    UserId,
};

use crate::{
    events::{CascadeRewardPaid, SoulboundMinted, SoulboundUpdated},
    ops::{
        issuance::{update_metadata_uri, TokenMetadataIssuer},
        mint::MintSoulbound,
    },
    states::{Config, UserAssetData},
    CoreError,
};

/// Arguments of [`mint_soulbound_nft`](crate::questline_core::mint_soulbound_nft).
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct MintSoulboundNftArgs {
    /// Metadata uri.
    pub uri: String,
    /// User id.
    pub user_id: String,
    /// The level claimed for each remaining account, in order.
    pub referrer_levels: Vec<u8>,
}

/// The accounts definition for [`mint_soulbound_nft`](crate::questline_core::mint_soulbound_nft).
///
/// Remaining accounts expected by this instruction:
///
///   - 0..N. `[writable]` N user asset data accounts of referrers to reward,
///     where N is the length of `referrer_levels`.
#[derive(Accounts)]
pub struct MintSoulboundNft<'info> {
    /// The owner of the user asset data or the admin. Pays for the asset.
    #[account(mut)]
    pub authority: Signer<'info>,
    /// Config.
    #[account(seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
    /// The user asset data.
    #[account(mut)]
    pub user_asset_data: AccountLoader<'info, UserAssetData>,
    /// The wallet of the user.
    /// CHECK: checked against the owner of the user asset data.
    pub user: UncheckedAccount<'info>,
    /// The asset mint to create.
    /// CHECK: checked against its derivation and created by the issuer.
    #[account(mut)]
    pub asset: UncheckedAccount<'info>,
    /// The mint, freeze and update authority of the asset.
    /// CHECK: checked against its derivation.
    pub asset_authority: UncheckedAccount<'info>,
    /// The associated token account of the user.
    /// CHECK: checked against its derivation and created by the issuer.
    #[account(mut)]
    pub user_token_account: UncheckedAccount<'info>,
    /// Metadata of the asset.
    /// CHECK: checked against its derivation and created by the metadata program.
    #[account(mut)]
    pub metadata: UncheckedAccount<'info>,
    /// Master edition of the asset.
    /// CHECK: checked against its derivation and created by the metadata program.
    #[account(mut)]
    pub master_edition: UncheckedAccount<'info>,
    /// The token program.
    pub token_program: Program<'info, Token>,
    /// The associated token program.
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// The token metadata program.
    pub token_metadata_program: Program<'info, Metadata>,
    /// The system program.
    pub system_program: Program<'info, System>,
    /// The rent sysvar.
    pub rent: Sysvar<'info, Rent>,
}

/// Bumps of the asset accounts.
struct AssetBumps {
    asset: u8,
    asset_authority: u8,
}

impl<'info> MintSoulboundNft<'info> {
    pub(crate) fn invoke(
        ctx: Context<'_, '_, 'info, 'info, Self>,
        args: MintSoulboundNftArgs,
    ) -> Result<()> {
        let bumps = ctx.accounts.validate(&args)?;
        let now = Clock::get()?.unix_timestamp;
        let user_address = ctx.accounts.user_asset_data.key();

        let loaders = ctx
            .remaining_accounts
            .iter()
            .map(|info| {
                require!(info.is_writable, CoreError::AccountNotWritable);
                AccountLoader::<UserAssetData>::try_from(info)
            })
            .collect::<Result<Vec<_>>>()?;

        // Borrowing the same account twice would fail with a runtime error.
        let mut seen = HashSet::with_capacity(loaders.len());
        for loader in loaders.iter() {
            require_keys_neq!(loader.key(), user_address, CoreError::ReferrerMismatch);
            require!(seen.insert(loader.key()), CoreError::DuplicateReferrer);
        }

        let mut referrers = loaders
            .iter()
            .map(|loader| Ok((loader.key(), loader.load_mut()?)))
            .collect::<Result<Vec<_>>>()?;

        let issuer = ctx.accounts.issuer(&bumps);
        let config = ctx.accounts.config.load()?;
        let mut user = ctx.accounts.user_asset_data.load_mut()?;
        let report = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&config.reward_table)
            .uri(&args.uri)
            .now(now)
            .build()
            .execute(
                &user_address,
                &mut user,
                &mut referrers,
                &args.referrer_levels,
            )?;

        msg!(
            "[Soulbound] minted {} for {}, referrers paid: {}",
            report.asset,
            user.owner,
            report.payouts.len()
        );
        for payout in report.payouts.iter() {
            emit!(CascadeRewardPaid {
                user_asset_data: user_address,
                referrer_asset_data: payout.address,
                level: payout.level,
                amount: payout.amount,
                xp: payout.xp_after,
            });
        }
        emit!(SoulboundMinted {
            user_asset_data: user_address,
            owner: user.owner,
            asset: report.asset,
            self_reward: report.self_reward,
            referrers_paid: report.payouts.len() as u8,
            ts: now,
        });
        Ok(())
    }

    fn validate(&self, args: &MintSoulboundNftArgs) -> Result<AssetBumps> {
        let user = self.user_asset_data.load()?;
        require!(!user.is_minted(), CoreError::AlreadyMinted);
        self.config
            .load()?
            .validate_admin_or_owner(self.authority.key, &user.owner)?;
        require_keys_eq!(self.user.key(), user.owner, CoreError::OwnerMismatch);

        user.validate_address(&self.user_asset_data.key())?;
        let user_id = UserId::new(&args.user_id).map_err(CoreError::from)?;
        require!(
            user.user_id_bytes() == user_id.as_bytes(),
            CoreError::InvalidAccountDerivation
        );

        let (asset, asset_bump) = find_soulbound_asset_address(&user_id, &crate::ID);
        require_keys_eq!(asset, self.asset.key(), CoreError::InvalidAccountDerivation);
        let (asset_authority, asset_authority_bump) =
            find_asset_authority_address(&asset, &crate::ID);
        require_keys_eq!(
            asset_authority,
            self.asset_authority.key(),
            CoreError::InvalidAccountDerivation
        );
        require_keys_eq!(
            get_associated_token_address(&user.owner, &asset),
            self.user_token_account.key(),
            CoreError::InvalidAccountDerivation
        );
        require_keys_eq!(
            find_metadata_address(&asset, &Metadata::id()).0,
            self.metadata.key(),
            CoreError::InvalidAccountDerivation
        );
        require_keys_eq!(
            find_master_edition_address(&asset, &Metadata::id()).0,
            self.master_edition.key(),
            CoreError::InvalidAccountDerivation
        );

        Ok(AssetBumps {
            asset: asset_bump,
            asset_authority: asset_authority_bump,
        })
    }

    fn issuer(&self, bumps: &AssetBumps) -> TokenMetadataIssuer<'info> {
        TokenMetadataIssuer {
            payer: self.authority.to_account_info(),
            owner: self.user.to_account_info(),
            asset: self.asset.to_account_info(),
            asset_bump: bumps.asset,
            asset_authority: self.asset_authority.to_account_info(),
            asset_authority_bump: bumps.asset_authority,
            token_account: self.user_token_account.to_account_info(),
            metadata: self.metadata.to_account_info(),
            master_edition: self.master_edition.to_account_info(),
            token_program: self.token_program.to_account_info(),
            associated_token_program: self.associated_token_program.to_account_info(),
            token_metadata_program: self.token_metadata_program.to_account_info(),
            system_program: self.system_program.to_account_info(),
            rent: self.rent.to_account_info(),
        }
    }
}

/// Arguments of [`update_soulbound_nft`](crate::questline_core::update_soulbound_nft).
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct UpdateSoulboundNftArgs {
    /// User id.
    pub user_id: String,
    /// The new metadata uri.
    pub uri: String,
}

/// The accounts definition for [`update_soulbound_nft`](crate::questline_core::update_soulbound_nft).
#[derive(Accounts)]
pub struct UpdateSoulboundNft<'info> {
    /// The owner of the user asset data or the admin.
    pub authority: Signer<'info>,
    /// Config.
    #[account(seeds = [CONFIG_SEED], bump = config.load()?.bump)]
    pub config: AccountLoader<'info, Config>,
    /// The user asset data.
    pub user_asset_data: AccountLoader<'info, UserAssetData>,
    /// The update authority of the asset.
    /// CHECK: checked against its derivation.
    pub asset_authority: UncheckedAccount<'info>,
    /// Metadata of the asset.
    /// CHECK: checked against its derivation.
    #[account(mut)]
    pub metadata: UncheckedAccount<'info>,
    /// The token metadata program.
    pub token_metadata_program: Program<'info, Metadata>,
}

impl UpdateSoulboundNft<'_> {
    pub(crate) fn invoke(ctx: Context<Self>, args: UpdateSoulboundNftArgs) -> Result<()> {
        let accounts = &ctx.accounts;
        let (asset, asset_authority_bump) = {
            let user = accounts.user_asset_data.load()?;
            accounts
                .config
                .load()?
                .validate_admin_or_owner(accounts.authority.key, &user.owner)?;
            user.validate_address(&accounts.user_asset_data.key())?;
            require!(
                user.user_id_bytes() == args.user_id.as_bytes(),
                CoreError::InvalidAccountDerivation
            );
            let asset = *user.asset().ok_or_else(|| error!(CoreError::NotMinted))?;

            let (asset_authority, bump) = find_asset_authority_address(&asset, &crate::ID);
            require_keys_eq!(
                asset_authority,
                accounts.asset_authority.key(),
                CoreError::InvalidAccountDerivation
            );
            require_keys_eq!(
                find_metadata_address(&asset, &Metadata::id()).0,
                accounts.metadata.key(),
                CoreError::InvalidAccountDerivation
            );
            (asset, bump)
        };

        update_metadata_uri(
            accounts.token_metadata_program.to_account_info(),
            accounts.metadata.to_account_info(),
            &asset,
            accounts.asset_authority.to_account_info(),
            asset_authority_bump,
            &args.uri,
        )?;

        msg!("[Soulbound] updated uri of {}", asset);
        emit!(SoulboundUpdated {
            asset,
            uri: args.uri,
        });
        Ok(())
    }
}
