use std::collections::HashSet;

use anchor_lang::prelude::*;

use crate::{
    states::{RewardTable, UserAssetData},
    CoreError,
};

/// A referrer account supplied by the caller, together with its claimed level.
#[derive(Clone, Copy)]
pub struct SuppliedReferrer<'a> {
    /// Address of the referrer's user asset data.
    pub address: Pubkey,
    /// The referrer's user asset data.
    pub record: &'a UserAssetData,
    /// Claimed level in the referee's history.
    pub level: u8,
}

/// A validated cascade payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadePayout {
    /// Address of the referrer's user asset data.
    pub address: Pubkey,
    /// Level of the referrer.
    pub level: u8,
    /// XP to credit.
    pub amount: u64,
    /// XP of the referrer after crediting.
    pub xp_after: u64,
}

/// Iterator validating each supplied referrer against the referee's history.
///
/// A referrer is matched by identity and level, never by position.
pub struct ValidatedCascade<'a, I> {
    referee_address: &'a Pubkey,
    referee: &'a UserAssetData,
    table: &'a RewardTable,
    supplied: I,
    seen_addresses: HashSet<Pubkey>,
    seen_owners: HashSet<Pubkey>,
}

/// Validate the supplied referrers of `referee`.
pub fn validate_cascade<'a, 'b, I>(
    referee_address: &'a Pubkey,
    referee: &'a UserAssetData,
    table: &'a RewardTable,
    supplied: I,
) -> ValidatedCascade<'a, I::IntoIter>
where
    I: IntoIterator<Item = SuppliedReferrer<'b>>,
{
    ValidatedCascade {
        referee_address,
        referee,
        table,
        supplied: supplied.into_iter(),
        seen_addresses: HashSet::default(),
        seen_owners: HashSet::default(),
    }
}

impl<'b, I> ValidatedCascade<'_, I>
where
    I: Iterator<Item = SuppliedReferrer<'b>>,
{
    fn validate(&mut self, supplied: SuppliedReferrer<'b>) -> Result<CascadePayout> {
        require_keys_neq!(
            supplied.address,
            *self.referee_address,
            CoreError::ReferrerMismatch
        );
        require!(
            self.seen_addresses.insert(supplied.address),
            CoreError::DuplicateReferrer
        );
        supplied.record.validate_address(&supplied.address)?;

        let owner = supplied.record.owner;
        require!(
            self.seen_owners.insert(owner),
            CoreError::DuplicateReferrer
        );

        let level = self
            .referee
            .referral_history()
            .level_of(&owner)
            .ok_or_else(|| error!(CoreError::ReferrerMismatch))?;
        require_eq!(level, supplied.level, CoreError::ReferrerMismatch);

        let amount = self.table.cascade_bonus(level);
        let xp_after = supplied.record.checked_xp_after(amount)?;
        Ok(CascadePayout {
            address: supplied.address,
            level,
            amount,
            xp_after,
        })
    }
}

impl<'b, I> Iterator for ValidatedCascade<'_, I>
where
    I: Iterator<Item = SuppliedReferrer<'b>>,
{
    type Item = Result<CascadePayout>;

    fn next(&mut self) -> Option<Self::Item> {
        let supplied = self.supplied.next()?;
        Some(self.validate(supplied))
    }
}
