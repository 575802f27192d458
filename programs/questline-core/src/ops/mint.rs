use std::ops::DerefMut;

use anchor_lang::prelude::*;
use typed_builder::TypedBuilder;

use crate::{
    ops::{
        cascade::{validate_cascade, CascadePayout, SuppliedReferrer},
        issuance::{AssetIssuer, IssueRequest},
    },
    states::{RewardTable, UserAssetData},
    CoreError,
};

/// Outcome of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReport {
    /// The issued asset.
    pub asset: Pubkey,
    /// XP credited to the user.
    pub self_reward: u64,
    /// Cascade payouts, in the order the referrers were supplied.
    pub payouts: Vec<CascadePayout>,
}

/// Mint the soulbound asset of a user and pay the cascade rewards.
#[derive(TypedBuilder)]
pub struct MintSoulbound<'a, I> {
    issuer: &'a I,
    table: &'a RewardTable,
    uri: &'a str,
    /// Issuance timestamp.
    now: i64,
}

impl<I: AssetIssuer> MintSoulbound<'_, I> {
    /// Execute.
    ///
    /// `referrers` pairs each supplied user asset data with its address, and
    /// `levels[i]` is the level claimed for `referrers[i]`. Every check runs
    /// before the issuer is called, and nothing is written if it fails.
    pub fn execute<R>(
        self,
        user_address: &Pubkey,
        user: &mut UserAssetData,
        referrers: &mut [(Pubkey, R)],
        levels: &[u8],
    ) -> Result<MintReport>
    where
        R: DerefMut<Target = UserAssetData>,
    {
        require!(!user.is_minted(), CoreError::AlreadyMinted);
        require_eq!(referrers.len(), levels.len(), CoreError::ReferrerMismatch);

        let payouts = validate_cascade(
            user_address,
            &*user,
            self.table,
            referrers
                .iter()
                .zip(levels)
                .map(|((address, record), level)| SuppliedReferrer {
                    address: *address,
                    record: &**record,
                    level: *level,
                }),
        )
        .collect::<Result<Vec<_>>>()?;

        let self_reward = self.table.self_mint_bonus;
        user.checked_xp_after(self_reward)?;

        let asset = self.issuer.issue(&IssueRequest {
            owner: &user.owner,
            user_id: user.user_id()?,
            uri: self.uri,
        })?;

        user.mark_minted(asset, self.now)?;
        user.credit_xp(self_reward)?;
        for ((_, record), payout) in referrers.iter_mut().zip(&payouts) {
            record.credit_xp(payout.amount)?;
        }

        Ok(MintReport {
            asset,
            self_reward,
            payouts,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::{
        states::user::tests::{new_user, reward_table},
        test_utils::assert_core_error,
    };

    #[derive(Default)]
    struct MockIssuer {
        fail: bool,
        issued: RefCell<Vec<(Pubkey, String, String)>>,
        calls: Cell<usize>,
    }

    impl AssetIssuer for MockIssuer {
        fn issue(&self, request: &IssueRequest<'_>) -> Result<Pubkey> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ProgramError::InvalidAccountData.into());
            }
            self.issued.borrow_mut().push((
                *request.owner,
                request.user_id.to_string(),
                request.uri.to_string(),
            ));
            Ok(Pubkey::new_unique())
        }
    }

    struct Users {
        table: RewardTable,
        a: (Pubkey, UserAssetData),
        b: (Pubkey, UserAssetData),
        c: (Pubkey, UserAssetData),
    }

    /// `A <- B <- C`, seeded with 500 xp but starting from a zero baseline.
    fn users() -> Users {
        let table = reward_table(4);
        let seed = table.initial_xp(500);
        let mut a = new_user("userA", seed);
        let mut b = new_user("userB", seed);
        let mut c = new_user("userC", seed);
        b.1.apply_referral(&mut a.1, &table).unwrap();
        c.1.apply_referral(&mut b.1, &table).unwrap();
        Users { table, a, b, c }
    }

    #[test]
    fn end_to_end_rewards() {
        let Users {
            table,
            a,
            mut b,
            mut c,
        } = users();
        let issuer = MockIssuer::default();

        let report = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(&c.0, &mut c.1, &mut [(b.0, &mut b.1)], &[1])
            .unwrap();

        assert_eq!(a.1.xp(), 100);
        assert_eq!(b.1.xp(), 150);
        assert_eq!(c.1.xp(), 150);
        assert_eq!(report.self_reward, 150);
        assert_eq!(report.payouts.len(), 1);
        assert_eq!(c.1.asset(), Some(&report.asset));
        assert_eq!(c.1.minted_at(), Some(1));

        let issued = issuer.issued.borrow();
        assert_eq!(
            issued.as_slice(),
            &[(c.1.owner, "userC".to_string(), "ipfs://mock".to_string())]
        );

        // A is retained at level 2 but was not supplied.
        assert_eq!(c.1.referral_history().level_of(&a.1.owner), Some(2));
    }

    #[test]
    fn mint_is_exactly_once() {
        let Users {
            table, mut b, mut c, ..
        } = users();
        let issuer = MockIssuer::default();
        MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(&c.0, &mut c.1, &mut [(b.0, &mut b.1)], &[1])
            .unwrap();

        let err = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(2)
            .build()
            .execute(&c.0, &mut c.1, &mut [(b.0, &mut b.1)], &[1])
            .unwrap_err();
        assert_core_error(err, CoreError::AlreadyMinted);
        assert_eq!(issuer.calls.get(), 1);
        assert_eq!(b.1.xp(), 150);
        assert_eq!(c.1.xp(), 150);
        assert_eq!(c.1.minted_at(), Some(1));
    }

    #[test]
    fn level_mismatch_changes_nothing() {
        let Users {
            table,
            mut a,
            mut b,
            mut c,
        } = users();
        let issuer = MockIssuer::default();
        let err = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(
                &c.0,
                &mut c.1,
                &mut [(b.0, &mut b.1), (a.0, &mut a.1)],
                &[1, 3],
            )
            .unwrap_err();
        assert_core_error(err, CoreError::ReferrerMismatch);
        assert_eq!(issuer.calls.get(), 0);
        assert!(!c.1.is_minted());
        assert_eq!((a.1.xp(), b.1.xp(), c.1.xp()), (100, 100, 0));
    }

    #[test]
    fn level_count_must_match_accounts() {
        let Users {
            table, mut b, mut c, ..
        } = users();
        let issuer = MockIssuer::default();
        let err = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(&c.0, &mut c.1, &mut [(b.0, &mut b.1)], &[])
            .unwrap_err();
        assert_core_error(err, CoreError::ReferrerMismatch);
        assert!(!c.1.is_minted());
    }

    #[test]
    fn issuer_failure_rolls_back() {
        let Users {
            table, mut b, mut c, ..
        } = users();
        let issuer = MockIssuer {
            fail: true,
            ..Default::default()
        };
        let err = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(&c.0, &mut c.1, &mut [(b.0, &mut b.1)], &[1])
            .unwrap_err();
        assert!(matches!(err, anchor_lang::error::Error::ProgramError(_)));
        assert_eq!(issuer.calls.get(), 1);
        assert!(!c.1.is_minted());
        assert_eq!((b.1.xp(), c.1.xp()), (100, 0));
    }

    #[test]
    fn pays_every_supplied_ancestor() {
        let Users {
            table,
            mut a,
            mut b,
            mut c,
        } = users();
        let issuer = MockIssuer::default();
        let report = MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://mock")
            .now(1)
            .build()
            .execute(
                &c.0,
                &mut c.1,
                &mut [(a.0, &mut a.1), (b.0, &mut b.1)],
                &[2, 1],
            )
            .unwrap();
        assert_eq!(report.payouts.len(), 2);
        assert_eq!((a.1.xp(), b.1.xp(), c.1.xp()), (125, 150, 150));
    }

    #[test]
    fn mint_without_referrers() {
        let Users { table, mut a, .. } = users();
        let issuer = MockIssuer::default();
        let mut none: [(Pubkey, &mut UserAssetData); 0] = [];
        MintSoulbound::builder()
            .issuer(&issuer)
            .table(&table)
            .uri("ipfs://root")
            .now(1)
            .build()
            .execute(&a.0, &mut a.1, &mut none, &[])
            .unwrap();
        assert_eq!(a.1.xp(), 250);
        assert!(a.1.is_minted());
    }
}
