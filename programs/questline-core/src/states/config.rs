use anchor_lang::prelude::*;
use bytemuck::Zeroable;
use questline_utils::{
    constants::{MAX_REFERRAL_DEPTH, MAX_REWARD_FLAGS},
    RewardFlag,
};

use crate::CoreError;

/// Global config.
#[account(zero_copy)]
#[cfg_attr(feature = "debug", derive(derive_more::Debug))]
pub struct Config {
    pub(crate) bump: u8,
    #[cfg_attr(feature = "debug", debug(skip))]
    padding_0: [u8; 7],
    /// The admin.
    pub admin: Pubkey,
    /// Reward parameters.
    pub reward_table: RewardTable,
    #[cfg_attr(feature = "debug", debug(skip))]
    reserved: [u8; 128],
}

static_assertions::const_assert_eq!(std::mem::size_of::<Config>(), Config::INIT_SPACE);

impl Default for Config {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl Config {
    /// Init space.
    pub const INIT_SPACE: usize = 256;

    /// Get the bump.
    pub fn bump(&self) -> u8 {
        self.bump
    }

    /// Initialize the config.
    pub fn init(&mut self, bump: u8, admin: Pubkey, reward_table: RewardTable) {
        self.bump = bump;
        self.admin = admin;
        self.reward_table = reward_table;
    }

    /// Replace the admin and the reward table.
    pub fn update(&mut self, admin: Pubkey, reward_table: RewardTable) {
        self.admin = admin;
        self.reward_table = reward_table;
    }

    /// Returns whether the given address is the admin.
    pub fn is_admin(&self, address: &Pubkey) -> bool {
        self.admin == *address
    }

    /// Validate that the given address is the admin.
    pub fn validate_admin(&self, address: &Pubkey) -> Result<()> {
        require_keys_eq!(*address, self.admin, CoreError::Unauthorized);
        Ok(())
    }

    /// Validate that the given address is either the admin or `owner`.
    pub fn validate_admin_or_owner(&self, address: &Pubkey, owner: &Pubkey) -> Result<()> {
        require!(
            address == owner || self.is_admin(address),
            CoreError::Unauthorized
        );
        Ok(())
    }
}

questline_utils::flags!(RewardFlag, MAX_REWARD_FLAGS, u8);

/// Reward parameters.
#[zero_copy]
#[cfg_attr(feature = "debug", derive(derive_more::Debug))]
pub struct RewardTable {
    /// XP paid to the direct referrer when a referral is applied.
    pub direct_referral_bonus: u64,
    /// XP paid to the user when the soulbound asset is minted.
    pub self_mint_bonus: u64,
    /// XP paid to a supplied referrer at mint time, indexed by `level - 1`.
    cascade_bonus: [u64; MAX_REFERRAL_DEPTH],
    max_depth: u8,
    flags: RewardFlagContainer,
    #[cfg_attr(feature = "debug", debug(skip))]
    padding_0: [u8; 6],
}

impl Default for RewardTable {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl RewardTable {
    /// Get the max number of retained referral levels.
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Get the cascade bonus of the given level.
    ///
    /// Levels outside the table receive nothing.
    pub fn cascade_bonus(&self, level: u8) -> u64 {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.cascade_bonus.get(idx))
            .copied()
            .unwrap_or(0)
    }

    /// Get the flag.
    pub fn flag(&self, flag: RewardFlag) -> bool {
        self.flags.get_flag(flag)
    }

    /// Get the starting xp of a new user given the seed value.
    pub fn initial_xp(&self, seed: u64) -> u64 {
        if self.flag(RewardFlag::KeepInitialXp) {
            seed
        } else {
            0
        }
    }
}

/// Reward table parameters.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Default)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub struct RewardTableParams {
    /// XP paid to the direct referrer when a referral is applied.
    pub direct_referral_bonus: u64,
    /// XP paid to the user when the soulbound asset is minted.
    pub self_mint_bonus: u64,
    /// Cascade bonuses starting from level `1`.
    pub cascade_bonus: Vec<u64>,
    /// Max number of retained referral levels.
    pub max_depth: u8,
    /// Whether to keep the seed xp at user initialization.
    pub keep_initial_xp: bool,
}

impl TryFrom<&RewardTableParams> for RewardTable {
    type Error = anchor_lang::error::Error;

    fn try_from(params: &RewardTableParams) -> Result<Self> {
        let max_depth = usize::from(params.max_depth);
        require!(
            max_depth != 0 && max_depth <= MAX_REFERRAL_DEPTH,
            CoreError::InvalidRewardTable
        );
        require_gte!(
            MAX_REFERRAL_DEPTH,
            params.cascade_bonus.len(),
            CoreError::InvalidRewardTable
        );

        let mut table = Self {
            direct_referral_bonus: params.direct_referral_bonus,
            self_mint_bonus: params.self_mint_bonus,
            max_depth: params.max_depth,
            ..Default::default()
        };
        table.cascade_bonus[..params.cascade_bonus.len()].copy_from_slice(&params.cascade_bonus);
        table
            .flags
            .set_flag(RewardFlag::KeepInitialXp, params.keep_initial_xp);
        Ok(table)
    }
}
