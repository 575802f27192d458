use anchor_lang::prelude::*;
use bytemuck::Zeroable;
use questline_utils::constants::MAX_REFERRAL_DEPTH;

use crate::CoreError;

/// Referral Entry.
#[zero_copy]
#[cfg_attr(feature = "debug", derive(derive_more::Debug))]
pub struct ReferralEntry {
    /// The wallet of the referrer.
    pub referrer: Pubkey,
    /// Hops from the referee. The direct referrer is at level `1`.
    pub level: u8,
    #[cfg_attr(feature = "debug", debug(skip))]
    padding_0: [u8; 7],
}

impl ReferralEntry {
    fn new(referrer: Pubkey, level: u8) -> Self {
        Self {
            referrer,
            level,
            padding_0: [0; 7],
        }
    }
}

/// Bounded referral chain stored inline.
///
/// Entries are ordered from the deepest retained ancestor to the direct
/// referrer, so the entry at index `i` of a history of length `n` is at
/// level `n - i`.
#[zero_copy]
#[cfg_attr(feature = "debug", derive(derive_more::Debug))]
pub struct ReferralHistory {
    len: u8,
    #[cfg_attr(feature = "debug", debug(skip))]
    padding_0: [u8; 7],
    entries: [ReferralEntry; MAX_REFERRAL_DEPTH],
}

static_assertions::const_assert_eq!(std::mem::size_of::<ReferralEntry>(), 40);

impl Default for ReferralHistory {
    fn default() -> Self {
        Zeroable::zeroed()
    }
}

impl ReferralHistory {
    /// Capacity.
    pub const CAPACITY: usize = MAX_REFERRAL_DEPTH;

    /// Get the number of retained entries.
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Returns whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the retained entries, deepest ancestor first.
    pub fn entries(&self) -> &[ReferralEntry] {
        &self.entries[..self.len()]
    }

    /// Get the direct referrer.
    pub fn direct_referrer(&self) -> Option<&Pubkey> {
        self.entries().last().map(|entry| &entry.referrer)
    }

    /// Get the level of the given referrer, if retained.
    pub fn level_of(&self, referrer: &Pubkey) -> Option<u8> {
        self.entries()
            .iter()
            .find(|entry| entry.referrer == *referrer)
            .map(|entry| entry.level)
    }

    /// Returns whether the given referrer is retained in the history.
    pub fn contains(&self, referrer: &Pubkey) -> bool {
        self.level_of(referrer).is_some()
    }

    /// Returns whether the levels are contiguous and end with the direct referrer.
    pub fn is_well_formed(&self) -> bool {
        let len = self.len();
        len <= Self::CAPACITY
            && self
                .entries()
                .iter()
                .enumerate()
                .all(|(idx, entry)| usize::from(entry.level) == len - idx)
    }

    /// Derive the history of a new referee of `referrer`, whose own history is `parent`.
    ///
    /// Every retained ancestor moves one level up, the referrer is appended at
    /// level `1`, and the deepest entries beyond `max_depth` are dropped.
    pub fn derive(parent: &Self, referrer: &Pubkey, max_depth: u8) -> Result<Self> {
        let max_depth = usize::from(max_depth);
        require!(
            max_depth != 0 && max_depth <= Self::CAPACITY,
            CoreError::InvalidRewardTable
        );

        let total = parent.len() + 1;
        let retained = total.min(max_depth);
        let skip = total - retained;

        let shifted = parent.entries().iter().map(|entry| {
            let level = entry
                .level
                .checked_add(1)
                .ok_or_else(|| error!(CoreError::ArithmeticOverflow))?;
            Ok::<_, Error>((entry.referrer, level))
        });
        let direct = std::iter::once(Ok((*referrer, 1)));

        let mut history = Self::default();
        for (slot, item) in history
            .entries
            .iter_mut()
            .zip(shifted.chain(direct).skip(skip))
        {
            let (referrer, level) = item?;
            *slot = ReferralEntry::new(referrer, level);
        }
        history.len = retained as u8;

        debug_assert!(history.is_well_formed());
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(max_depth: u8, referrers: &[Pubkey]) -> ReferralHistory {
        // `referrers[0]` is the root; each next one is referred by the previous.
        let mut history = ReferralHistory::default();
        for referrer in referrers {
            history = ReferralHistory::derive(&history, referrer, max_depth).unwrap();
        }
        history
    }

    #[test]
    fn direct_referral_from_root() {
        let a = Pubkey::new_unique();
        let history = ReferralHistory::derive(&ReferralHistory::default(), &a, 4).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.direct_referrer(), Some(&a));
        assert_eq!(history.level_of(&a), Some(1));
    }

    #[test]
    fn ancestors_shift_one_level_up() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let history = chain(4, &[a, b]);
        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].referrer, a);
        assert_eq!(entries[0].level, 2);
        assert_eq!(entries[1].referrer, b);
        assert_eq!(entries[1].level, 1);
        assert!(history.is_well_formed());
    }

    #[test]
    fn truncates_deepest_ancestors() {
        let keys = (0..5).map(|_| Pubkey::new_unique()).collect::<Vec<_>>();
        let history = chain(3, &keys);
        assert_eq!(history.len(), 3);
        assert!(!history.contains(&keys[0]));
        assert!(!history.contains(&keys[1]));
        assert_eq!(history.level_of(&keys[2]), Some(3));
        assert_eq!(history.level_of(&keys[4]), Some(1));
        assert!(history.is_well_formed());
    }

    #[test]
    fn never_exceeds_capacity() {
        let keys = (0..(ReferralHistory::CAPACITY + 3))
            .map(|_| Pubkey::new_unique())
            .collect::<Vec<_>>();
        let history = chain(ReferralHistory::CAPACITY as u8, &keys);
        assert_eq!(history.len(), ReferralHistory::CAPACITY);
        assert!(history.is_well_formed());
    }

    #[test]
    fn rejects_invalid_depth() {
        let a = Pubkey::new_unique();
        let parent = ReferralHistory::default();
        assert!(ReferralHistory::derive(&parent, &a, 0).is_err());
        assert!(
            ReferralHistory::derive(&parent, &a, ReferralHistory::CAPACITY as u8 + 1).is_err()
        );
    }
}
