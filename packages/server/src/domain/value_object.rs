//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::{borrow::Borrow, fmt};

use super::error::ValueObjectError;

/// Display name value object.
///
/// The name a session is reachable by. Never empty and never contains
/// whitespace, so it always fits in a single command token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// # Arguments
    ///
    /// * `name` - The display name string
    ///
    /// # Returns
    ///
    /// A Result containing the DisplayName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ValueObjectError::DisplayNameContainsWhitespace(name));
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

// Lets registry maps be queried with a plain `&str`.
impl Borrow<str> for DisplayName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session identifier value object.
///
/// Identifies one connection for its whole lifetime, independent of the
/// display name it currently holds. Two outbound channels are the same
/// channel iff their session ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Create a SessionId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current time.
    pub fn now() -> Self {
        Self(tertulia_shared::time::get_jst_timestamp())
    }

    /// Milliseconds elapsed from `earlier` to `self`, clamped at zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        u64::try_from(self.0.saturating_sub(earlier.0)).unwrap_or(0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_new_success() {
        // テスト項目: 有効な表示名を作成できる
        // given (前提条件):
        let name = "Alice".to_string();

        // when (操作):
        let result = DisplayName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "Alice");
    }

    #[test]
    fn test_display_name_new_empty_fails() {
        // テスト項目: 空の表示名は作成できない
        let result = DisplayName::new(String::new());

        assert_eq!(result.unwrap_err(), ValueObjectError::DisplayNameEmpty);
    }

    #[test]
    fn test_display_name_with_whitespace_fails() {
        // テスト項目: 空白を含む表示名は作成できない
        // given (前提条件):
        let names = ["bad name", " lead", "trail\t", "new\nline"];

        for name in names {
            // when (操作):
            let result = DisplayName::try_from(name);

            // then (期待する結果):
            assert_eq!(
                result.unwrap_err(),
                ValueObjectError::DisplayNameContainsWhitespace(name.to_string())
            );
        }
    }

    #[test]
    fn test_display_name_accepts_unicode() {
        // テスト項目: 空白以外の Unicode 文字は許可される
        let name = DisplayName::try_from("José_ñ🙂").unwrap();

        assert_eq!(name.to_string(), "José_ñ🙂");
    }

    #[test]
    fn test_display_name_borrows_as_str() {
        // テスト項目: &str で BTreeMap を検索できる
        let mut map = std::collections::BTreeMap::new();
        map.insert(DisplayName::try_from("Alice").unwrap(), 1);

        assert_eq!(map.get("Alice"), Some(&1));
        assert_eq!(map.get("alice"), None);
    }

    #[test]
    fn test_timestamp_millis_since() {
        // テスト項目: 経過時間は負にならない
        let earlier = Timestamp::new(1000);
        let later = Timestamp::new(2500);

        assert_eq!(later.millis_since(earlier), 1500);
        assert_eq!(earlier.millis_since(later), 0);
        assert!(earlier < later);
    }
}
