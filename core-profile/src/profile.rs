//! Profile model shown in the chat header.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name shown while the profile request is in flight.
pub const LOADING_NAME: &str = "Loading...";

/// Name shown when the profile could not be fetched or has no usable name.
pub const FALLBACK_NAME: &str = "Chat User";

/// The agent or user identity displayed in the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>, avatar_url: Option<String>) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                FALLBACK_NAME.to_string()
            } else {
                name
            },
            avatar_url,
        }
    }

    /// Placeholder used until the fetch completes.
    pub fn loading() -> Self {
        Self {
            name: LOADING_NAME.to_string(),
            avatar_url: None,
        }
    }

    /// Profile used when the fetch fails.
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_NAME.to_string(),
            avatar_url: None,
        }
    }

    /// Build a profile from the `/api/v1/profile` response object.
    ///
    /// The name is the first non-empty string among `display_name`,
    /// `available_name` and `name`; otherwise [`FALLBACK_NAME`].
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let non_empty = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let name = ["display_name", "available_name", "name"]
            .iter()
            .find_map(|key| non_empty(*key))
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        Self {
            name,
            avatar_url: non_empty("avatar_url"),
        }
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Up to two uppercase initials for `name`.
///
/// ```
/// use core_profile::initials;
///
/// assert_eq!(initials("Jane Doe"), "JD");
/// assert_eq!(initials("Mary Ann Smith"), "MS");
/// assert_eq!(initials("madonna"), "M");
/// assert_eq!(initials("   "), "?");
/// ```
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split(' ').filter(|p| !p.is_empty()).collect();

    let first_upper = |part: &str| -> String {
        part.chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    };

    match parts.as_slice() {
        [] => "?".to_string(),
        [only] => first_upper(*only),
        [first, .., last] => format!("{}{}", first_upper(*first), first_upper(*last)),
    }
}
