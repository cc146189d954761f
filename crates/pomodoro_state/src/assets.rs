//! Audio asset resolution.

/// The audio files the skill plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    Tick25m,
    Tick20m,
    Tick5m,
    Ring,
}

impl Asset {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick25m => "tick25m",
            Self::Tick20m => "tick20m",
            Self::Tick5m => "tick5m",
            Self::Ring => "ring",
        }
    }
}

/// Maps an asset and the silent flag to a playable URL.
pub trait AssetResolver: Send + Sync {
    fn url(&self, asset: Asset, silent: bool) -> String;
}

/// Resolves assets against a base URL: `{base}{name}[-s].mp3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAssets {
    base_url: String,
}

impl AudioAssets {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }
}

impl AssetResolver for AudioAssets {
    fn url(&self, asset: Asset, silent: bool) -> String {
        format!(
            "{}{}{}.mp3",
            self.base_url,
            asset.name(),
            if silent { "-s" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_naming() {
        let assets = AudioAssets::new("https://cdn.example.com/tomato/");
        assert_eq!(
            assets.url(Asset::Tick25m, false),
            "https://cdn.example.com/tomato/tick25m.mp3"
        );
        assert_eq!(
            assets.url(Asset::Tick5m, true),
            "https://cdn.example.com/tomato/tick5m-s.mp3"
        );
        assert_eq!(
            assets.url(Asset::Ring, false),
            "https://cdn.example.com/tomato/ring.mp3"
        );
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let assets = AudioAssets::new("https://cdn.example.com/tomato");
        assert_eq!(
            assets.url(Asset::Tick20m, false),
            "https://cdn.example.com/tomato/tick20m.mp3"
        );
    }
}
