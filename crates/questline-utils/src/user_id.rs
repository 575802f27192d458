use crate::constants::MAX_USER_ID_LEN;

/// User id error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// Empty.
    #[error("user id is empty")]
    Empty,
    /// Exceeds the seed length limit.
    #[error("user id is too long: {0} bytes")]
    TooLong(usize),
}

/// A validated user id.
///
/// A user id is used verbatim as a PDA seed, so it must be non-empty and
/// fit in a single seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId<'a>(&'a str);

impl<'a> UserId<'a> {
    /// Validate the given user id.
    pub fn new(id: &'a str) -> Result<Self, UserIdError> {
        if id.is_empty() {
            return Err(UserIdError::Empty);
        }
        if id.len() > MAX_USER_ID_LEN {
            return Err(UserIdError::TooLong(id.len()));
        }
        Ok(Self(id))
    }

    /// Get as str.
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    /// Get the seed bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0.as_bytes()
    }

    /// Returns the zero-padded fixed-size representation and its length.
    pub fn to_padded(&self) -> ([u8; MAX_USER_ID_LEN], u8) {
        let mut bytes = [0; MAX_USER_ID_LEN];
        let len = self.0.len();
        bytes[..len].copy_from_slice(self.as_bytes());
        // `len <= MAX_USER_ID_LEN` is guaranteed by the constructor.
        (bytes, len as u8)
    }
}

impl<'a> TryFrom<&'a str> for UserId<'a> {
    type Error = UserIdError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<[u8]> for UserId<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl std::fmt::Display for UserId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
