use anchor_lang::prelude::*;
use bytemuck::Zeroable;
use questline_utils::{
    constants::{MAX_USER_FLAGS, MAX_USER_ID_LEN, USER_ASSET_DATA_SEED},
    UserFlag, UserId,
};

use crate::CoreError;

use super::{ReferralHistory, RewardTable};

questline_utils::flags!(UserFlag, MAX_USER_FLAGS, u8);

/// Progression state of a user.
#[account(zero_copy)]
#[cfg_attr(feature = "debug", derive(derive_more::Debug))]
pub struct UserAssetData {
    pub(crate) bump: u8,
    flags: UserFlagContainer,
    /// Level.
    pub level: u8,
    /// Luck.
    pub luck: u8,
    user_id_len: u8,
    #[cfg_attr(feature = "debug", debug(skip))]
    padding_0: [u8; 3],
    xp: u64,
    minted_at: i64,
    /// The wallet of the user.
    pub owner: Pubkey,
    asset: Pubkey,
    user_id: [u8; MAX_USER_ID_LEN],
    referral_history: ReferralHistory,
    #[cfg_attr(feature = "debug", debug(skip))]
    reserved: [u8; 64],
}

static_assertions::const_assert_eq!(
    std::mem::size_of::<UserAssetData>(),
    UserAssetData::INIT_SPACE
);

impl Default for UserAssetData {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl UserAssetData {
    /// Init space.
    pub const INIT_SPACE: usize = 512;

    /// Initialize the user asset data.
    pub fn init(
        &mut self,
        bump: u8,
        owner: Pubkey,
        user_id: &UserId<'_>,
        xp: u64,
        level: u8,
        luck: u8,
    ) {
        let (user_id, user_id_len) = user_id.to_padded();
        self.bump = bump;
        self.owner = owner;
        self.user_id = user_id;
        self.user_id_len = user_id_len;
        self.xp = xp;
        self.level = level;
        self.luck = luck;
    }

    /// Get the bump.
    pub fn bump(&self) -> u8 {
        self.bump
    }

    /// Get the xp.
    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Get the raw user id.
    pub fn user_id_bytes(&self) -> &[u8] {
        &self.user_id[..usize::from(self.user_id_len).min(MAX_USER_ID_LEN)]
    }

    /// Get the user id.
    pub fn user_id(&self) -> Result<UserId<'_>> {
        let id = std::str::from_utf8(self.user_id_bytes())
            .map_err(|_| error!(CoreError::InvalidUserId))?;
        UserId::new(id).map_err(|err| error!(CoreError::from(err)))
    }

    /// Get the referral history.
    pub fn referral_history(&self) -> &ReferralHistory {
        &self.referral_history
    }

    /// Returns whether the user has been referred.
    pub fn is_referred(&self) -> bool {
        !self.referral_history.is_empty()
    }

    /// Returns whether the soulbound asset has been issued.
    pub fn is_minted(&self) -> bool {
        self.flags.get_flag(UserFlag::Minted)
    }

    /// Get the issued asset.
    pub fn asset(&self) -> Option<&Pubkey> {
        self.is_minted().then_some(&self.asset)
    }

    /// Get the issuance timestamp.
    pub fn minted_at(&self) -> Option<i64> {
        self.is_minted().then_some(self.minted_at)
    }

    /// Get the expected address of this account.
    pub fn expected_address(&self, program_id: &Pubkey) -> Result<Pubkey> {
        Pubkey::create_program_address(
            &[
                USER_ASSET_DATA_SEED,
                self.user_id_bytes(),
                program_id.as_ref(),
                &[self.bump],
            ],
            program_id,
        )
        .map_err(|_| error!(CoreError::InvalidAccountDerivation))
    }

    /// Validate that this account lives at its derived address.
    pub fn validate_address(&self, address: &Pubkey) -> Result<()> {
        require_keys_eq!(
            self.expected_address(&crate::ID)?,
            *address,
            CoreError::InvalidAccountDerivation
        );
        Ok(())
    }

    /// Get the xp after crediting `amount`.
    pub fn checked_xp_after(&self, amount: u64) -> Result<u64> {
        self.xp
            .checked_add(amount)
            .ok_or_else(|| error!(CoreError::ArithmeticOverflow))
    }

    /// Credit xp.
    pub fn credit_xp(&mut self, amount: u64) -> Result<u64> {
        self.xp = self.checked_xp_after(amount)?;
        Ok(self.xp)
    }

    /// Update the stats. The xp can only grow.
    pub fn update_stats(&mut self, xp: u64, level: u8, luck: u8) -> Result<()> {
        require_gte!(xp, self.xp, CoreError::XpDecrease);
        self.xp = xp;
        self.level = level;
        self.luck = luck;
        Ok(())
    }

    /// Link this user under `referrer` and pay the direct referral bonus.
    ///
    /// Returns the credited bonus. Nothing is written unless every check passes.
    pub fn apply_referral(&mut self, referrer: &mut Self, table: &RewardTable) -> Result<u64> {
        require!(!self.is_referred(), CoreError::AlreadyReferred);
        require!(
            referrer.owner != self.owner && !referrer.referral_history.contains(&self.owner),
            CoreError::SelfReferral
        );

        let history =
            ReferralHistory::derive(&referrer.referral_history, &referrer.owner, table.max_depth())?;
        let bonus = table.direct_referral_bonus;
        let referrer_xp = referrer.checked_xp_after(bonus)?;

        self.referral_history = history;
        referrer.xp = referrer_xp;
        Ok(bonus)
    }

    /// Mark the soulbound asset as issued.
    pub fn mark_minted(&mut self, asset: Pubkey, now: i64) -> Result<()> {
        require!(!self.is_minted(), CoreError::AlreadyMinted);
        self.flags.set_flag(UserFlag::Minted, true);
        self.asset = asset;
        self.minted_at = now;
        Ok(())
    }
}
