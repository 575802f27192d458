use anchor_lang::{
    prelude::*,
    system_program::{self, Allocate, Assign, CreateAccount, Transfer},
};

/// How a PDA is brought to life.
///
/// Anyone can send lamports to a PDA before it is created, and the system
/// program refuses to `create_account` at an address holding lamports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccountCreation {
    /// The address holds no lamports.
    Create {
        /// Lamports to fund the account with.
        lamports: u64,
    },
    /// The address has been funded already.
    Allocate {
        /// Lamports missing for rent exemption.
        top_up: u64,
    },
}

impl AccountCreation {
    pub(crate) fn new(current_lamports: u64, minimum_balance: u64) -> Self {
        if current_lamports == 0 {
            Self::Create {
                lamports: minimum_balance,
            }
        } else {
            Self::Allocate {
                top_up: minimum_balance.max(1).saturating_sub(current_lamports),
            }
        }
    }
}

/// Create a PDA of `space` bytes owned by `owner`, whether or not it has
/// been funded beforehand.
pub(crate) fn create_or_allocate_account<'info>(
    owner: &Pubkey,
    payer: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
    target: AccountInfo<'info>,
    signer_seeds: &[&[u8]],
    space: usize,
) -> Result<()> {
    let minimum_balance = Rent::get()?.minimum_balance(space);
    let space = space as u64;
    match AccountCreation::new(target.lamports(), minimum_balance) {
        AccountCreation::Create { lamports } => {
            system_program::create_account(
                CpiContext::new_with_signer(
                    system_program,
                    CreateAccount { from: payer, to: target },
                    &[signer_seeds],
                ),
                lamports,
                space,
                owner,
            )?;
        }
        AccountCreation::Allocate { top_up } => {
            if top_up > 0 {
                system_program::transfer(
                    CpiContext::new(
                        system_program.clone(),
                        Transfer {
                            from: payer,
                            to: target.clone(),
                        },
                    ),
                    top_up,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    system_program.clone(),
                    Allocate {
                        account_to_allocate: target.clone(),
                    },
                    &[signer_seeds],
                ),
                space,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    system_program,
                    Assign {
                        account_to_assign: target,
                    },
                    &[signer_seeds],
                ),
                owner,
            )?;
        }
    }
    Ok(())
}
