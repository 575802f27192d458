use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::{self, Create},
    metadata::{
        self, mpl_token_metadata::types::DataV2, CreateMasterEditionV3,
        CreateMetadataAccountsV3, UpdateMetadataAccountsV2,
    },
    token::{self, FreezeAccount, InitializeMint2, Mint, MintTo},
};
use questline_utils::{
    constants::{ASSET_AUTHORITY_SEED, SOULBOUND_ASSET_SEED, SOULBOUND_NAME, SOULBOUND_SYMBOL},
    UserId,
};

use crate::{utils::create_or_allocate_account, CoreError};

/// A request to issue a soulbound asset.
#[derive(Debug, Clone, Copy)]
pub struct IssueRequest<'a> {
    /// The wallet the asset is bound to.
    pub owner: &'a Pubkey,
    /// The user id the asset address is derived from.
    pub user_id: UserId<'a>,
    /// Metadata uri.
    pub uri: &'a str,
}

/// Issuer of non-transferable assets.
pub trait AssetIssuer {
    /// Issue an asset bound to the owner of the request, returning its address.
    ///
    /// Any error aborts the whole mint.
    fn issue(&self, request: &IssueRequest<'_>) -> Result<Pubkey>;
}

/// Issues soulbound assets as frozen Token Metadata master editions.
///
/// The asset mint and its authority are PDAs of this program. One token is
/// minted to the owner's associated token account, which is frozen before the
/// master edition takes over the mint and freeze authorities, so it can never
/// be moved.
pub struct TokenMetadataIssuer<'info> {
    pub(crate) payer: AccountInfo<'info>,
    pub(crate) owner: AccountInfo<'info>,
    pub(crate) asset: AccountInfo<'info>,
    pub(crate) asset_bump: u8,
    pub(crate) asset_authority: AccountInfo<'info>,
    pub(crate) asset_authority_bump: u8,
    pub(crate) token_account: AccountInfo<'info>,
    pub(crate) metadata: AccountInfo<'info>,
    pub(crate) master_edition: AccountInfo<'info>,
    pub(crate) token_program: AccountInfo<'info>,
    pub(crate) associated_token_program: AccountInfo<'info>,
    pub(crate) token_metadata_program: AccountInfo<'info>,
    pub(crate) system_program: AccountInfo<'info>,
    pub(crate) rent: AccountInfo<'info>,
}

impl<'info> TokenMetadataIssuer<'info> {
    fn create_mint(&self, user_id: &UserId<'_>, authority: &Pubkey) -> Result<()> {
        let bump = [self.asset_bump];
        let asset_seeds: &[&[u8]] = &[
            SOULBOUND_ASSET_SEED,
            user_id.as_bytes(),
            crate::ID.as_ref(),
            &bump,
        ];
        create_or_allocate_account(
            self.token_program.key,
            self.payer.clone(),
            self.system_program.clone(),
            self.asset.clone(),
            asset_seeds,
            Mint::LEN,
        )?;
        token::initialize_mint2(
            CpiContext::new(
                self.token_program.clone(),
                InitializeMint2 {
                    mint: self.asset.clone(),
                },
            ),
            0,
            authority,
            Some(authority),
        )?;
        Ok(())
    }

    fn mint_frozen_token(&self, authority_seeds: &[&[u8]]) -> Result<()> {
        associated_token::create(CpiContext::new(
            self.associated_token_program.clone(),
            Create {
                payer: self.payer.clone(),
                associated_token: self.token_account.clone(),
                authority: self.owner.clone(),
                mint: self.asset.clone(),
                system_program: self.system_program.clone(),
                token_program: self.token_program.clone(),
            },
        ))?;
        token::mint_to(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                MintTo {
                    mint: self.asset.clone(),
                    to: self.token_account.clone(),
                    authority: self.asset_authority.clone(),
                },
                &[authority_seeds],
            ),
            1,
        )?;
        token::freeze_account(CpiContext::new_with_signer(
            self.token_program.clone(),
            FreezeAccount {
                account: self.token_account.clone(),
                mint: self.asset.clone(),
                authority: self.asset_authority.clone(),
            },
            &[authority_seeds],
        ))?;
        Ok(())
    }

    fn create_master_edition(&self, uri: &str, authority_seeds: &[&[u8]]) -> Result<()> {
        metadata::create_metadata_accounts_v3(
            CpiContext::new_with_signer(
                self.token_metadata_program.clone(),
                CreateMetadataAccountsV3 {
                    metadata: self.metadata.clone(),
                    mint: self.asset.clone(),
                    mint_authority: self.asset_authority.clone(),
                    payer: self.payer.clone(),
                    update_authority: self.asset_authority.clone(),
                    system_program: self.system_program.clone(),
                    rent: self.rent.clone(),
                },
                &[authority_seeds],
            ),
            soulbound_data(uri),
            true,
            true,
            None,
        )?;
        metadata::create_master_edition_v3(
            CpiContext::new_with_signer(
                self.token_metadata_program.clone(),
                CreateMasterEditionV3 {
                    edition: self.master_edition.clone(),
                    mint: self.asset.clone(),
                    update_authority: self.asset_authority.clone(),
                    mint_authority: self.asset_authority.clone(),
                    payer: self.payer.clone(),
                    metadata: self.metadata.clone(),
                    token_program: self.token_program.clone(),
                    system_program: self.system_program.clone(),
                    rent: self.rent.clone(),
                },
                &[authority_seeds],
            ),
            Some(0),
        )?;
        Ok(())
    }
}

impl AssetIssuer for TokenMetadataIssuer<'_> {
    fn issue(&self, request: &IssueRequest<'_>) -> Result<Pubkey> {
        require_keys_eq!(self.owner.key(), *request.owner, CoreError::OwnerMismatch);

        let asset = self.asset.key();
        let authority = self.asset_authority.key();
        let bump = [self.asset_authority_bump];
        let authority_seeds: &[&[u8]] = &[
            ASSET_AUTHORITY_SEED,
            crate::ID.as_ref(),
            asset.as_ref(),
            &bump,
        ];

        self.create_mint(&request.user_id, &authority)?;
        self.mint_frozen_token(authority_seeds)?;
        self.create_master_edition(request.uri, authority_seeds)?;

        #[cfg(feature = "debug-msg")]
        msg!(
            "[Issuance] issued {} to {} with uri {}",
            asset,
            request.owner,
            request.uri
        );
        Ok(asset)
    }
}

/// Replace the uri of an issued soulbound asset.
pub(crate) fn update_metadata_uri<'info>(
    token_metadata_program: AccountInfo<'info>,
    metadata: AccountInfo<'info>,
    asset: &Pubkey,
    asset_authority: AccountInfo<'info>,
    asset_authority_bump: u8,
    uri: &str,
) -> Result<()> {
    let bump = [asset_authority_bump];
    let authority_seeds: &[&[u8]] = &[
        ASSET_AUTHORITY_SEED,
        crate::ID.as_ref(),
        asset.as_ref(),
        &bump,
    ];
    metadata::update_metadata_accounts_v2(
        CpiContext::new_with_signer(
            token_metadata_program,
            UpdateMetadataAccountsV2 {
                metadata,
                update_authority: asset_authority,
            },
            &[authority_seeds],
        ),
        None,
        Some(soulbound_data(uri)),
        None,
        None,
    )
}

fn soulbound_data(uri: &str) -> DataV2 {
    DataV2 {
        name: SOULBOUND_NAME.to_string(),
        symbol: SOULBOUND_SYMBOL.to_string(),
        uri: uri.to_string(),
        seller_fee_basis_points: 0,
        creators: None,
        collection: None,
        uses: None,
    }
}
