use std::{cell::Cell, sync::Once};

use anchor_lang::prelude::*;
use questline_core::{
    ops::{
        issuance::{AssetIssuer, IssueRequest},
        mint::MintSoulbound,
    },
    states::{RewardTable, RewardTableParams, UserAssetData},
};
use questline_utils::{
    pda::{find_soulbound_asset_address, find_user_asset_data_address},
    UserId,
};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Issues the asset at its derived address without touching any token program.
#[derive(Default)]
struct DerivedIssuer {
    issued: Cell<usize>,
}

impl AssetIssuer for DerivedIssuer {
    fn issue(&self, request: &IssueRequest<'_>) -> Result<Pubkey> {
        self.issued.set(self.issued.get() + 1);
        let (asset, _) = find_soulbound_asset_address(&request.user_id, &questline_core::ID);
        tracing::debug!(%asset, owner = %request.owner, "issued");
        Ok(asset)
    }
}

struct User {
    address: Pubkey,
    data: UserAssetData,
}

impl User {
    fn new(user_id: &str, table: &RewardTable, seed_xp: u64) -> eyre::Result<Self> {
        let user_id = UserId::new(user_id)?;
        let (address, bump) = find_user_asset_data_address(&user_id, &questline_core::ID);
        let mut data = UserAssetData::default();
        data.init(
            bump,
            Pubkey::new_unique(),
            &user_id,
            table.initial_xp(seed_xp),
            1,
            7,
        );
        Ok(Self { address, data })
    }
}

fn table(max_depth: u8, keep_initial_xp: bool) -> eyre::Result<RewardTable> {
    RewardTable::try_from(&RewardTableParams {
        direct_referral_bonus: 100,
        self_mint_bonus: 150,
        cascade_bonus: vec![50, 25],
        max_depth,
        keep_initial_xp,
    })
    .map_err(|err| eyre::eyre!("invalid reward table: {err}"))
}

#[test]
fn referral_chain_and_mint() -> eyre::Result<()> {
    init_tracing();

    let table = table(4, false)?;
    let mut a = User::new("userA", &table, 500)?;
    let mut b = User::new("userB", &table, 500)?;
    let mut c = User::new("userC", &table, 500)?;
    assert_eq!((a.data.xp(), b.data.xp(), c.data.xp()), (0, 0, 0));

    b.data
        .apply_referral(&mut a.data, &table)
        .map_err(|err| eyre::eyre!("{err}"))?;
    c.data
        .apply_referral(&mut b.data, &table)
        .map_err(|err| eyre::eyre!("{err}"))?;

    let history = c.data.referral_history();
    let entries = history
        .entries()
        .iter()
        .map(|entry| (entry.referrer, entry.level))
        .collect::<Vec<_>>();
    assert_eq!(entries, [(a.data.owner, 2), (b.data.owner, 1)]);

    let issuer = DerivedIssuer::default();
    let report = MintSoulbound::builder()
        .issuer(&issuer)
        .table(&table)
        .uri("ipfs://userC")
        .now(1_700_000_000)
        .build()
        .execute(
            &c.address,
            &mut c.data,
            &mut [(b.address, &mut b.data)],
            &[1],
        )
        .map_err(|err| eyre::eyre!("{err}"))?;
    tracing::info!(?report.asset, payouts = report.payouts.len(), "minted");

    assert_eq!(a.data.xp(), 100);
    assert_eq!(b.data.xp(), 150);
    assert_eq!(c.data.xp(), 150);
    assert_eq!(
        c.data.asset(),
        Some(&find_soulbound_asset_address(&UserId::new("userC")?, &questline_core::ID).0)
    );
    assert_eq!(issuer.issued.get(), 1);
    Ok(())
}

#[test]
fn deep_chain_is_truncated_and_xp_only_grows() -> eyre::Result<()> {
    init_tracing();

    let table = table(3, true)?;
    let mut users = (0..6)
        .map(|idx| User::new(&format!("user{idx}"), &table, 10))
        .collect::<eyre::Result<Vec<_>>>()?;

    let mut last_xp = users.iter().map(|user| user.data.xp()).collect::<Vec<_>>();
    assert!(last_xp.iter().all(|xp| *xp == 10));

    for idx in 1..users.len() {
        let (uplink, rest) = users.split_at_mut(idx);
        let referrer = &mut uplink[idx - 1];
        rest[0]
            .data
            .apply_referral(&mut referrer.data, &table)
            .map_err(|err| eyre::eyre!("{err}"))?;

        for (user, last) in users.iter().zip(last_xp.iter_mut()) {
            assert!(user.data.xp() >= *last);
            *last = user.data.xp();
        }
    }

    let deepest = &users[5].data;
    let history = deepest.referral_history();
    assert_eq!(history.len(), 3);
    assert!(history.is_well_formed());
    assert!(!history.contains(&users[1].data.owner));
    assert_eq!(history.level_of(&users[2].data.owner), Some(3));
    assert_eq!(history.level_of(&users[4].data.owner), Some(1));

    let issuer = DerivedIssuer::default();
    let (uplink, rest) = users.split_at_mut(5);
    let user = &mut rest[0];
    let (far, near) = uplink.split_at_mut(4);
    let level_2 = &mut far[3];
    let level_1 = &mut near[0];
    MintSoulbound::builder()
        .issuer(&issuer)
        .table(&table)
        .uri("ipfs://user5")
        .now(1)
        .build()
        .execute(
            &user.address,
            &mut user.data,
            &mut [
                (level_1.address, &mut level_1.data),
                (level_2.address, &mut level_2.data),
            ],
            &[1, 2],
        )
        .map_err(|err| eyre::eyre!("{err}"))?;

    assert_eq!(users[4].data.xp(), 110 + 50);
    assert_eq!(users[3].data.xp(), 110 + 25);
    assert_eq!(users[5].data.xp(), 10 + 150);
    Ok(())
}
