use serde::{Deserialize, Serialize};

/// Which platform the app is running on
///
/// Closed enumeration: an unsupported platform is rejected where the
/// value is constructed, never deep inside the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Windows,
    Macos,
    Linux,
}

impl Platform {
    /// File-name suffixes that count as installable on this platform
    pub fn installable_patterns(self) -> &'static [&'static str] {
        match self {
            Platform::Android => &[".apk"],
            Platform::Windows => &[".msi", ".exe"],
            Platform::Macos => &[".dmg", ".pkg"],
            Platform::Linux => &[".appimage", ".deb", ".rpm"],
        }
    }

    /// Does this asset name look installable here? Matching is
    /// case-insensitive suffix only - no content-type or signature check.
    pub fn is_installable_asset(self, asset_name: &str) -> bool {
        let name = asset_name.to_lowercase();
        self.installable_patterns()
            .iter()
            .any(|suffix| name.ends_with(suffix))
    }

    /// Map a target_os value (std::env::consts::OS) to a platform
    pub fn from_target_os(os: &str) -> Option<Platform> {
        match os {
            "android" => Some(Platform::Android),
            "windows" => Some(Platform::Windows),
            "macos" => Some(Platform::Macos),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Windows => write!(f, "Windows"),
            Platform::Macos => write!(f, "macOS"),
            Platform::Linux => write!(f, "Linux"),
        }
    }
}
