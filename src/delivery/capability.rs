//! Channel capability model — which delivery channels exist per platform,
//! what each accepts, and where the sequence goes when one fails.
//!
//! Pure data. The sequencer walks these tables; nothing here performs I/O.

use std::str::FromStr;

use crate::delivery::types::ChannelId;
use crate::error::ConfigError;

/// Platform the mailer runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Direct mail-app share is reliable.
    Android,
    /// Direct share is unreliable for files; skip the chooser when it fails.
    Ios,
    /// SMTP direct channel, terminal chooser (probed, it needs a terminal),
    /// OS mailto handler.
    #[default]
    Desktop,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Desktop => "desktop",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "desktop" | "linux" | "macos" | "windows" => Ok(Platform::Desktop),
            other => Err(ConfigError::InvalidValue {
                key: "MAILER_PLATFORM".into(),
                message: format!("unknown platform '{other}' (expected android, ios or desktop)"),
            }),
        }
    }
}

/// What one channel accepts and how it behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelCapability {
    pub id: ChannelId,
    /// Carries the whole attachment list rather than only the primary file.
    pub multiple_attachments: bool,
    /// Can carry at least one attachment.
    pub carries_attachments: bool,
    /// Accepts explicit recipient addresses.
    pub recipient_targeting: bool,
    /// Takes an explicit content-type hint.
    pub content_type_hint: bool,
    /// Opens a user-visible chooser instead of targeting an app.
    pub modal_chooser: bool,
    /// Ask the channel whether it is usable before invoking it.
    pub probe: bool,
    /// Next channel to try when this one does not deliver.
    pub fallback: Option<ChannelId>,
}

const DIRECT: ChannelCapability = ChannelCapability {
    id: ChannelId::Direct,
    multiple_attachments: false,
    carries_attachments: true,
    recipient_targeting: true,
    content_type_hint: true,
    modal_chooser: false,
    probe: false,
    fallback: Some(ChannelId::Chooser),
};

const CHOOSER: ChannelCapability = ChannelCapability {
    id: ChannelId::Chooser,
    multiple_attachments: true,
    carries_attachments: true,
    recipient_targeting: false,
    content_type_hint: false,
    modal_chooser: true,
    probe: false,
    fallback: Some(ChannelId::Mailto),
};

const MAILTO: ChannelCapability = ChannelCapability {
    id: ChannelId::Mailto,
    multiple_attachments: false,
    carries_attachments: false,
    recipient_targeting: true,
    content_type_hint: false,
    modal_chooser: false,
    probe: false,
    fallback: None,
};

const RELIABLE_DIRECT: &[ChannelCapability] = &[DIRECT, CHOOSER, MAILTO];

const DESKTOP: &[ChannelCapability] = &[
    DIRECT,
    ChannelCapability {
        probe: true,
        ..CHOOSER
    },
    MAILTO,
];

const UNRELIABLE_DIRECT: &[ChannelCapability] = &[
    ChannelCapability {
        probe: true,
        fallback: Some(ChannelId::Mailto),
        ..DIRECT
    },
    CHOOSER,
    MAILTO,
];

/// Ordered channel table for one platform. The first entry is where every
/// delivery starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub name: String,
    channels: Vec<ChannelCapability>,
}

impl PlatformProfile {
    /// Built-in profile for a platform.
    pub fn for_platform(platform: Platform) -> Self {
        let channels = match platform {
            Platform::Android => RELIABLE_DIRECT,
            Platform::Desktop => DESKTOP,
            Platform::Ios => UNRELIABLE_DIRECT,
        };
        Self {
            name: platform.as_str().to_string(),
            channels: channels.to_vec(),
        }
    }

    /// Custom table. Returns `None` if it is empty or a fallback points at a
    /// channel missing from the table.
    pub fn custom(name: impl Into<String>, channels: Vec<ChannelCapability>) -> Option<Self> {
        if channels.is_empty() {
            return None;
        }
        let dangling = channels
            .iter()
            .filter_map(|c| c.fallback)
            .any(|next| !channels.iter().any(|c| c.id == next));
        if dangling {
            return None;
        }
        Some(Self {
            name: name.into(),
            channels,
        })
    }

    /// Channel every delivery starts with.
    pub fn entry(&self) -> ChannelId {
        self.channels[0].id
    }

    pub fn capability(&self, id: ChannelId) -> Option<&ChannelCapability> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn channels(&self) -> &[ChannelCapability] {
        &self.channels
    }

    /// Channels in the order a fully failing delivery visits them.
    pub fn fallback_chain(&self) -> Vec<ChannelId> {
        let mut chain = Vec::new();
        let mut next = Some(self.entry());
        while let Some(id) = next {
            if chain.contains(&id) {
                break;
            }
            chain.push(id);
            next = self.capability(id).and_then(|c| c.fallback);
        }
        chain
    }
}

impl From<Platform> for PlatformProfile {
    fn from(platform: Platform) -> Self {
        Self::for_platform(platform)
    }
}

/// Capability entry of the built-in table, for building custom profiles.
pub fn builtin(id: ChannelId) -> ChannelCapability {
    match id {
        ChannelId::Direct => DIRECT,
        ChannelId::Chooser => CHOOSER,
        ChannelId::Mailto => MAILTO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reliable_profile_walks_every_channel() {
        let profile = PlatformProfile::for_platform(Platform::Android);
        assert_eq!(profile.entry(), ChannelId::Direct);
        assert_eq!(
            profile.fallback_chain(),
            vec![ChannelId::Direct, ChannelId::Chooser, ChannelId::Mailto]
        );
    }

    #[test]
    fn desktop_uses_reliable_ordering() {
        assert_eq!(
            PlatformProfile::for_platform(Platform::Desktop).fallback_chain(),
            PlatformProfile::for_platform(Platform::Android).fallback_chain()
        );
    }

    #[test]
    fn desktop_probes_chooser_only() {
        let profile = PlatformProfile::for_platform(Platform::Desktop);
        assert!(profile.capability(ChannelId::Chooser).unwrap().probe);
        assert!(!profile.capability(ChannelId::Direct).unwrap().probe);
        assert!(!profile.capability(ChannelId::Mailto).unwrap().probe);
    }

    #[test]
    fn unreliable_profile_skips_chooser() {
        let profile = PlatformProfile::for_platform(Platform::Ios);
        assert_eq!(
            profile.fallback_chain(),
            vec![ChannelId::Direct, ChannelId::Mailto]
        );
        assert!(profile.capability(ChannelId::Direct).unwrap().probe);
    }

    #[test]
    fn channel_shapes() {
        let profile = PlatformProfile::for_platform(Platform::Android);
        let direct = profile.capability(ChannelId::Direct).unwrap();
        assert!(!direct.multiple_attachments);
        assert!(direct.recipient_targeting);
        assert!(direct.content_type_hint);

        let chooser = profile.capability(ChannelId::Chooser).unwrap();
        assert!(chooser.multiple_attachments);
        assert!(chooser.modal_chooser);

        let mailto = profile.capability(ChannelId::Mailto).unwrap();
        assert!(!mailto.carries_attachments);
        assert_eq!(mailto.fallback, None);
    }

    #[test]
    fn custom_profile_rejects_dangling_fallback() {
        let table = vec![ChannelCapability {
            fallback: Some(ChannelId::Chooser),
            ..builtin(ChannelId::Direct)
        }];
        assert!(PlatformProfile::custom("broken", table).is_none());
        assert!(PlatformProfile::custom("empty", vec![]).is_none());
    }

    #[test]
    fn fallback_chain_stops_on_cycle() {
        let table = vec![
            ChannelCapability {
                fallback: Some(ChannelId::Chooser),
                ..builtin(ChannelId::Direct)
            },
            ChannelCapability {
                fallback: Some(ChannelId::Direct),
                ..builtin(ChannelId::Chooser)
            },
        ];
        let profile = PlatformProfile::custom("loop", table).unwrap();
        assert_eq!(
            profile.fallback_chain(),
            vec![ChannelId::Direct, ChannelId::Chooser]
        );
    }

    #[test]
    fn platform_parsing() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!(" ios ".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Desktop);
        assert!("palm".parse::<Platform>().is_err());
    }
}
