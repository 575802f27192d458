/// Seed of the config account.
pub const CONFIG_SEED: &[u8] = b"config";

/// Seed of user asset data accounts.
pub const USER_ASSET_DATA_SEED: &[u8] = b"user_asset_data";

/// Seed of soulbound asset mints.
pub const SOULBOUND_ASSET_SEED: &[u8] = b"soulbound_asset";

/// Seed of the asset authority.
pub const ASSET_AUTHORITY_SEED: &[u8] = b"asset_authority";

/// Seed prefix used by the token metadata program.
pub const METADATA_SEED: &[u8] = b"metadata";

/// Seed suffix of master edition accounts.
pub const EDITION_SEED: &[u8] = b"edition";

/// Capacity of a referral history, and the upper bound of the configurable depth.
pub const MAX_REFERRAL_DEPTH: usize = 8;

/// Max length in bytes of a user id. A user id is used as a PDA seed.
pub const MAX_USER_ID_LEN: usize = 32;

/// Max number of user flags.
pub const MAX_USER_FLAGS: usize = 8;

/// Max number of reward flags.
pub const MAX_REWARD_FLAGS: usize = 8;

/// Name of soulbound assets.
pub const SOULBOUND_NAME: &str = "Questline Soulbound";

/// Symbol of soulbound assets.
pub const SOULBOUND_SYMBOL: &str = "QSBT";
