//! # Profile Module
//!
//! Everything the chat header needs to show who the user is talking to:
//!
//! - [`ProfileFetcher`]: the single `GET /api/v1/profile` request
//! - [`Profile`]: name and avatar URL, with loading and fallback values
//! - [`AvatarLoader`]: avatar download and decoding
//! - [`InitialsBadge`]: the placeholder drawn when there is no image
//!
//! Failures never reach the user. The header shows "Chat User" when the
//! profile cannot be fetched, and the initials badge when the avatar cannot
//! be decoded.

pub mod avatar;
pub mod error;
pub mod fetcher;
pub mod profile;

pub use avatar::{AvatarImage, AvatarLoader, InitialsBadge, AVATAR_SIZE};
pub use error::{ProfileError, Result};
pub use fetcher::ProfileFetcher;
pub use profile::{initials, Profile, FALLBACK_NAME, LOADING_NAME};
