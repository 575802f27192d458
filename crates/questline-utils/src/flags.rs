/// Define a zero-copy flag container `<Flag>Container` for the given flag
/// enum, backed by a [`Bitmap`](bitmaps::Bitmap) of `$len` bits stored in
/// `$storage`.
///
/// The flag enum must convert into `u8` and have at most `$len` variants.
#[macro_export]
macro_rules! flags {
    ($flags:ty, $len:expr, $storage:ty) => {
        $crate::paste::paste! {
            #[doc = concat!("Flags container of [`", stringify!($flags), "`].")]
            #[anchor_lang::zero_copy]
            #[derive(Default)]
            #[cfg_attr(feature = "debug", derive(derive_more::Debug))]
            pub struct [<$flags Container>] {
                value: $storage,
            }

            type [<$flags Map>] = $crate::bitmaps::Bitmap<{ $len }>;

            impl [<$flags Container>] {
                /// Get the value of the flag.
                pub fn get_flag(&self, flag: $flags) -> bool {
                    let index = u8::from(flag);
                    [<$flags Map>]::from_value(self.value).get(usize::from(index))
                }

                /// Set the value of the flag, returning the previous value.
                pub fn set_flag(&mut self, flag: $flags, value: bool) -> bool {
                    let index = u8::from(flag);
                    let mut map = [<$flags Map>]::from_value(self.value);
                    let previous = map.set(usize::from(index), value);
                    self.value = map.into_value();
                    previous
                }

                /// Returns whether no flag is set.
                pub fn is_empty(&self) -> bool {
                    [<$flags Map>]::from_value(self.value).is_empty()
                }
            }
        }
    };
}

/// Flags of a user asset data account.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    num_enum::IntoPrimitive,
    num_enum::TryFromPrimitive,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "enum-iter", derive(strum::EnumIter))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
#[repr(u8)]
pub enum UserFlag {
    /// The soulbound asset has been issued.
    Minted,
    // CHECK: Cannot have more than `MAX_USER_FLAGS` flags.
}

/// Flags of the reward table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    num_enum::IntoPrimitive,
    num_enum::TryFromPrimitive,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "enum-iter", derive(strum::EnumIter))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
#[repr(u8)]
pub enum RewardFlag {
    /// Keep the xp passed at user initialization as the starting balance
    /// instead of starting from zero.
    KeepInitialXp,
    // CHECK: Cannot have more than `MAX_REWARD_FLAGS` flags.
}
