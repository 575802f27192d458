use anchor_lang::prelude::Pubkey;

use crate::{
    constants::{
        ASSET_AUTHORITY_SEED, CONFIG_SEED, EDITION_SEED, METADATA_SEED, SOULBOUND_ASSET_SEED,
        USER_ASSET_DATA_SEED,
    },
    UserId,
};

/// Find PDA for the config account.
pub fn find_config_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CONFIG_SEED], program_id)
}

/// Find PDA for the user asset data account of the given user id.
///
/// The program id is part of the seeds as well as the deriving program.
/// Taking a validated [`UserId`] keeps every seed within the seed length limit.
pub fn find_user_asset_data_address(user_id: &UserId<'_>, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[USER_ASSET_DATA_SEED, user_id.as_bytes(), program_id.as_ref()],
        program_id,
    )
}

/// Find PDA for the soulbound asset mint of the given user id.
pub fn find_soulbound_asset_address(user_id: &UserId<'_>, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[SOULBOUND_ASSET_SEED, user_id.as_bytes(), program_id.as_ref()],
        program_id,
    )
}

/// Find PDA for the mint, freeze and update authority of the given asset.
pub fn find_asset_authority_address(asset: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[ASSET_AUTHORITY_SEED, program_id.as_ref(), asset.as_ref()],
        program_id,
    )
}

/// Find the metadata account of the given mint.
pub fn find_metadata_address(mint: &Pubkey, metadata_program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[METADATA_SEED, metadata_program_id.as_ref(), mint.as_ref()],
        metadata_program_id,
    )
}

/// Find the master edition account of the given mint.
pub fn find_master_edition_address(mint: &Pubkey, metadata_program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            metadata_program_id.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        metadata_program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_id(id: &str) -> UserId<'_> {
        UserId::new(id).unwrap()
    }

    #[test]
    fn user_scoped_addresses_are_distinct() {
        let program_id = Pubkey::new_unique();
        let (a, _) = find_user_asset_data_address(&user_id("alice"), &program_id);
        let (b, _) = find_user_asset_data_address(&user_id("bob"), &program_id);
        let (asset, _) = find_soulbound_asset_address(&user_id("alice"), &program_id);
        assert_ne!(a, b);
        assert_ne!(a, asset);
        assert_eq!(
            a,
            find_user_asset_data_address(&user_id("alice"), &program_id).0
        );
    }

    #[test]
    fn longest_user_id_derives() {
        let program_id = Pubkey::new_unique();
        let max = "u".repeat(crate::constants::MAX_USER_ID_LEN);
        let (user, _) = find_user_asset_data_address(&user_id(&max), &program_id);
        let (asset, _) = find_soulbound_asset_address(&user_id(&max), &program_id);
        assert_ne!(user, asset);
    }

    #[test]
    fn derivation_depends_on_program_id() {
        let (a, _) = find_config_address(&Pubkey::new_unique());
        let (b, _) = find_config_address(&Pubkey::new_unique());
        assert_ne!(a, b);
    }
}
