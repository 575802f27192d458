use anchor_lang::prelude::*;
use questline_utils::UserIdError;

/// Core Error.
#[error_code]
pub enum CoreError {
    /// Unauthorized.
    #[msg("Unauthorized")]
    Unauthorized,
    /// Already initialized.
    #[msg("Already initialized")]
    AlreadyInitialized,
    /// Already referred.
    #[msg("User has already been referred")]
    AlreadyReferred,
    /// Already minted.
    #[msg("Soulbound asset has already been minted")]
    AlreadyMinted,
    /// Referrer mismatch.
    #[msg("Referrer does not match the referral history")]
    ReferrerMismatch,
    /// Invalid account derivation.
    #[msg("Account does not match its derived address")]
    InvalidAccountDerivation,
    /// Self referral.
    #[msg("A user cannot appear in its own referral chain")]
    SelfReferral,
    /// Duplicate referrer.
    #[msg("Duplicate referrer")]
    DuplicateReferrer,
    /// Account not writable.
    #[msg("Account is not writable")]
    AccountNotWritable,
    /// Owner mismatch.
    #[msg("User does not match the owner of the user asset data")]
    OwnerMismatch,
    /// Invalid user id.
    #[msg("Invalid user id")]
    InvalidUserId,
    /// Invalid reward table.
    #[msg("Invalid reward table")]
    InvalidRewardTable,
    /// XP decrease.
    #[msg("XP cannot decrease")]
    XpDecrease,
    /// Not minted.
    #[msg("Soulbound asset has not been minted")]
    NotMinted,
    /// Arithmetic overflow.
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<UserIdError> for CoreError {
    fn from(err: UserIdError) -> Self {
        msg!("[Questline] invalid user id: {}", err);
        Self::InvalidUserId
    }
}
