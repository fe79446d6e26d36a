//! Render model for the native header above the web content.

use core_profile::{AvatarImage, InitialsBadge, Profile, AVATAR_SIZE};
use core_runtime::config::{ChatwootConfig, ImageAsset};
use core_runtime::theme::{Color, ThemeSnapshot};

/// Header height in points.
pub const HEADER_HEIGHT: f64 = 56.0;

/// Height of the separator line under the header.
pub const SEPARATOR_HEIGHT: f64 = 0.5;

/// What occupies the avatar slot.
#[derive(Debug, Clone, PartialEq)]
pub enum AvatarContent {
    /// Profile still loading: activity indicator over the tinted slot.
    Loading,
    /// Profile known, avatar image still downloading: tinted slot only.
    Downloading,
    Image(AvatarImage),
    Initials(InitialsBadge),
}

/// Everything a [`SurfaceView`](crate::view::SurfaceView) needs to draw the
/// header. Rebuilt by the controller on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderModel {
    pub title: String,
    pub title_color: Color,
    /// Inbox label shown under the title.
    pub subtitle: String,
    pub font_size: f64,
    pub background: Color,
    pub separator: Color,
    pub back_icon: ImageAsset,
    pub back_icon_tint: Color,
    pub avatar: AvatarContent,
    pub avatar_size: f64,
    pub connection_icon: ImageAsset,
    pub connected: bool,
    pub height: f64,
}

impl HeaderModel {
    /// Initial header: loading placeholder, theme colors, connected icon.
    pub fn initial(config: &ChatwootConfig, theme: &ThemeSnapshot) -> Self {
        Self {
            title: Profile::loading().name,
            title_color: Color::GRAY,
            subtitle: config.inbox_name.clone(),
            font_size: config.font_size,
            background: theme.theme_color,
            separator: Color::LIGHT_GRAY,
            back_icon: config.back_arrow_icon.clone(),
            back_icon_tint: theme.text_color,
            avatar: AvatarContent::Loading,
            avatar_size: AVATAR_SIZE,
            connection_icon: config.connected_icon.clone(),
            connected: true,
            height: HEADER_HEIGHT,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.avatar == AvatarContent::Loading
    }

    /// Replace the loading placeholder with the fetched profile.
    ///
    /// The avatar slot waits for the download when the profile carries an
    /// avatar URL, and shows the initials badge otherwise.
    pub fn apply_profile(&mut self, profile: &Profile, theme: &ThemeSnapshot) {
        self.title = profile.name.clone();
        self.title_color = theme.text_color;
        self.avatar = match profile.avatar_url {
            Some(_) => AvatarContent::Downloading,
            None => AvatarContent::Initials(InitialsBadge::for_name(&profile.name)),
        };
    }

    pub fn apply_connectivity(&mut self, connected: bool, config: &ChatwootConfig) {
        self.connected = connected;
        self.connection_icon = if connected {
            config.connected_icon.clone()
        } else {
            config.disconnected_icon.clone()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ChatwootConfig {
        ChatwootConfig::builder()
            .account_id(1)
            .api_host("https://chat.example.com")
            .access_token("a")
            .pubsub_token("p")
            .websocket_url("wss://chat.example.com/cable")
            .inbox_name("Support")
            .font_size(18.0)
            .build()
            .unwrap()
    }

    fn dark_theme() -> ThemeSnapshot {
        ThemeSnapshot {
            theme_color: Color::rgb(0.1, 0.1, 0.1),
            text_color: Color::WHITE,
        }
    }

    #[test]
    fn test_initial_header() {
        let header = HeaderModel::initial(&config(), &dark_theme());

        assert_eq!(header.title, "Loading...");
        assert_eq!(header.title_color, Color::GRAY);
        assert_eq!(header.subtitle, "Support");
        assert_eq!(header.background, Color::rgb(0.1, 0.1, 0.1));
        assert_eq!(header.font_size, 18.0);
        assert!(header.is_loading());
        assert!(header.connected);
        assert_eq!(header.connection_icon, ImageAsset::system("wifi"));
        assert_eq!(header.height, 56.0);
    }

    #[test]
    fn test_profile_without_avatar_shows_initials() {
        let theme = dark_theme();
        let mut header = HeaderModel::initial(&config(), &theme);
        header.apply_profile(&Profile::new("Jane Doe", None), &theme);

        assert_eq!(header.title, "Jane Doe");
        assert_eq!(header.title_color, Color::WHITE);
        match &header.avatar {
            AvatarContent::Initials(badge) => assert_eq!(badge.initials, "JD"),
            other => panic!("unexpected avatar {:?}", other),
        }
    }

    #[test]
    fn test_profile_with_avatar_waits_for_download() {
        let theme = dark_theme();
        let mut header = HeaderModel::initial(&config(), &theme);
        header.apply_profile(
            &Profile::new("Jane", Some("https://cdn.example.com/j.png".into())),
            &theme,
        );
        assert_eq!(header.avatar, AvatarContent::Downloading);
        assert!(!header.is_loading());
    }

    #[test]
    fn test_connectivity_swaps_icon() {
        let cfg = config();
        let mut header = HeaderModel::initial(&cfg, &dark_theme());

        header.apply_connectivity(false, &cfg);
        assert_eq!(header.connection_icon, ImageAsset::system("wifi.slash"));

        header.apply_connectivity(true, &cfg);
        assert_eq!(header.connection_icon, ImageAsset::system("wifi"));
    }
}
