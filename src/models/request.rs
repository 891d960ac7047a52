use crate::error::{GenerationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectCategory {
    #[default]
    Square,
    Portrait,
    Landscape,
    Ultrawide,
}

impl AspectCategory {
    pub const ALL: [AspectCategory; 4] = [
        AspectCategory::Square,
        AspectCategory::Portrait,
        AspectCategory::Landscape,
        AspectCategory::Ultrawide,
    ];

    /// Fixed pixel size requested from the endpoint for this category.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectCategory::Square => (1024, 1024),
            AspectCategory::Portrait => (768, 1024),
            AspectCategory::Landscape => (1280, 720),
            AspectCategory::Ultrawide => (1920, 823),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectCategory::Square => "square",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Landscape => "landscape",
            AspectCategory::Ultrawide => "ultrawide",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectCategory::Square => "Square",
            AspectCategory::Portrait => "Portrait",
            AspectCategory::Landscape => "Landscape",
            AspectCategory::Ultrawide => "Ultra-wide",
        }
    }
}

impl fmt::Display for AspectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectCategory {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(AspectCategory::Square),
            "portrait" => Ok(AspectCategory::Portrait),
            "landscape" => Ok(AspectCategory::Landscape),
            "ultrawide" | "ultra-wide" => Ok(AspectCategory::Ultrawide),
            other => Err(GenerationError::Validation(format!(
                "unknown image type '{}', expected one of square, portrait, landscape, ultrawide",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    #[default]
    Realistic,
    Cartoon,
    Abstract,
    Fantasy,
    Anime,
    Cyberpunk,
}

impl StyleCategory {
    pub const ALL: [StyleCategory; 6] = [
        StyleCategory::Realistic,
        StyleCategory::Cartoon,
        StyleCategory::Abstract,
        StyleCategory::Fantasy,
        StyleCategory::Anime,
        StyleCategory::Cyberpunk,
    ];

    /// Token prepended to the user prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleCategory::Realistic => "realistic",
            StyleCategory::Cartoon => "cartoon",
            StyleCategory::Abstract => "abstract",
            StyleCategory::Fantasy => "fantasy",
            StyleCategory::Anime => "anime",
            StyleCategory::Cyberpunk => "cyberpunk",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleCategory {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        StyleCategory::ALL
            .iter()
            .copied()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| {
                GenerationError::Validation(format!(
                    "unknown style '{}', expected one of realistic, cartoon, abstract, fantasy, anime, cyberpunk",
                    wanted
                ))
            })
    }
}

/// Snapshot of the form taken when a submission is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub aspect: AspectCategory,
    pub style: StyleCategory,
}

impl GenerationRequest {
    pub fn new(
        prompt_text: impl Into<String>,
        aspect: AspectCategory,
        style: StyleCategory,
    ) -> Result<Self> {
        let prompt_text = prompt_text.into();
        if prompt_text.trim().is_empty() {
            return Err(GenerationError::Validation("prompt must not be empty".into()));
        }
        Ok(Self {
            prompt_text,
            aspect,
            style,
        })
    }

    pub fn formatted_prompt(&self) -> String {
        format!("{}, {}, high quality, detailed", self.style, self.prompt_text)
    }

    pub fn encoded_prompt(&self) -> String {
        urlencoding::encode(&self.formatted_prompt()).into_owned()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.aspect.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_table() {
        assert_eq!(AspectCategory::Square.dimensions(), (1024, 1024));
        assert_eq!(AspectCategory::Portrait.dimensions(), (768, 1024));
        assert_eq!(AspectCategory::Landscape.dimensions(), (1280, 720));
        assert_eq!(AspectCategory::Ultrawide.dimensions(), (1920, 823));
    }

    #[test]
    fn test_formatted_prompt_for_every_style() {
        for style in StyleCategory::ALL {
            let request =
                GenerationRequest::new("a lighthouse", AspectCategory::Square, style).unwrap();
            assert_eq!(
                request.formatted_prompt(),
                format!("{}, a lighthouse, high quality, detailed", style.as_str())
            );
        }
    }

    #[test]
    fn test_encoded_prompt() {
        let request = GenerationRequest::new(
            "A red fox in snow",
            AspectCategory::Portrait,
            StyleCategory::Fantasy,
        )
        .unwrap();
        assert_eq!(
            request.formatted_prompt(),
            "fantasy, A red fox in snow, high quality, detailed"
        );
        assert_eq!(
            request.encoded_prompt(),
            "fantasy%2C%20A%20red%20fox%20in%20snow%2C%20high%20quality%2C%20detailed"
        );
        assert_eq!(request.dimensions(), (768, 1024));
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let err = GenerationRequest::new("   ", AspectCategory::Square, StyleCategory::Anime)
            .unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    #[test]
    fn test_parse_categories() {
        assert_eq!("Ultra-wide".parse::<AspectCategory>().unwrap(), AspectCategory::Ultrawide);
        assert_eq!("LANDSCAPE".parse::<AspectCategory>().unwrap(), AspectCategory::Landscape);
        assert_eq!("cyberpunk".parse::<StyleCategory>().unwrap(), StyleCategory::Cyberpunk);
        assert!("oil".parse::<StyleCategory>().is_err());
        assert!("panorama".parse::<AspectCategory>().is_err());
    }
}
