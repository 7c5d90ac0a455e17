//! Storage folders for uploaded images.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown image folder: {0}")]
pub struct ImageFolderError(pub String);

/// Folder an uploaded image is filed under, one per catalog level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFolder {
    Categories,
    Subcategories,
    Products,
}

impl ImageFolder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Subcategories => "subcategories",
            Self::Products => "products",
        }
    }
}

impl fmt::Display for ImageFolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFolder {
    type Err = ImageFolderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "categories" => Ok(Self::Categories),
            "subcategories" => Ok(Self::Subcategories),
            "products" => Ok(Self::Products),
            other => Err(ImageFolderError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_folder() {
        assert_eq!(
            "Products".parse::<ImageFolder>().unwrap(),
            ImageFolder::Products
        );
        assert!("banners".parse::<ImageFolder>().is_err());
    }

    #[test]
    fn test_display_matches_path_segment() {
        assert_eq!(ImageFolder::Subcategories.to_string(), "subcategories");
    }
}
