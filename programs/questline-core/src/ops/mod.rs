/// Validation of caller-supplied referrers.
pub mod cascade;

/// Asset issuance.
pub mod issuance;

/// Soulbound minting.
pub mod mint;
