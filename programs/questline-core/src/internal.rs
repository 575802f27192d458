use anchor_lang::{prelude::*, Bumps};

use crate::states::Config;

/// Accounts that are authenticated against the config.
pub(crate) trait Authentication<'info> {
    /// Get the authority.
    fn authority(&self) -> &Signer<'info>;

    /// Get the config.
    fn config(&self) -> &AccountLoader<'info, Config>;
}

/// Access control helpers.
pub(crate) struct Authenticate;

impl Authenticate {
    /// Check that the authority is the admin.
    pub(crate) fn only_admin<'info, T>(ctx: &Context<T>) -> Result<()>
    where
        T: Authentication<'info> + Bumps,
    {
        let accounts = &ctx.accounts;
        accounts
            .config()
            .load()?
            .validate_admin(accounts.authority().key)?;
        Ok(())
    }
}
