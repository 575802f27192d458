use anchor_lang::prelude::*;

/// Config updated event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct ConfigUpdated {
    /// Admin.
    pub admin: Pubkey,
    /// Direct referral bonus.
    pub direct_referral_bonus: u64,
    /// Self mint bonus.
    pub self_mint_bonus: u64,
    /// Max depth.
    pub max_depth: u8,
}

/// User initialized event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct UserInitialized {
    /// User asset data.
    pub user_asset_data: Pubkey,
    /// Owner.
    pub owner: Pubkey,
    /// Starting xp.
    pub xp: u64,
    /// Level.
    pub level: u8,
    /// Luck.
    pub luck: u8,
}

/// User stats updated event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct UserStatsUpdated {
    /// User asset data.
    pub user_asset_data: Pubkey,
    /// XP.
    pub xp: u64,
    /// Level.
    pub level: u8,
    /// Luck.
    pub luck: u8,
}

/// Referral applied event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct ReferralApplied {
    /// The referee.
    pub user_asset_data: Pubkey,
    /// The direct referrer.
    pub referrer_asset_data: Pubkey,
    /// Length of the derived referral history.
    pub depth: u8,
    /// XP credited to the direct referrer.
    pub bonus: u64,
}

/// Soulbound asset minted event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct SoulboundMinted {
    /// User asset data.
    pub user_asset_data: Pubkey,
    /// Owner.
    pub owner: Pubkey,
    /// Asset.
    pub asset: Pubkey,
    /// XP credited to the user.
    pub self_reward: u64,
    /// Number of referrers paid.
    pub referrers_paid: u8,
    /// Timestamp.
    pub ts: i64,
}

/// XP credited to a referrer at mint time.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct CascadeRewardPaid {
    /// The user asset data of the minter.
    pub user_asset_data: Pubkey,
    /// The user asset data of the referrer.
    pub referrer_asset_data: Pubkey,
    /// Level of the referrer.
    pub level: u8,
    /// Amount.
    pub amount: u64,
    /// XP after.
    pub xp: u64,
}

/// Soulbound metadata updated event.
#[event]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct SoulboundUpdated {
    /// Asset.
    pub asset: Pubkey,
    /// New uri.
    pub uri: String,
}
