/// Gallery categories and their CDN mapping
///
/// The table here is the single place that knows where each category lives
/// on the CDN and which key it uses in the remote count table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root of every category path on the CDN
const CDN_ROOT: &str = "https://img.at13xe.top/ri";

/// One of the fixed gallery categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    #[default]
    Horizontal,
    Vertical,
    Genshin,
    Avatar,
    Mia,
    Shitone,
}

/// Static per-category configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Path segment under the CDN root (e.g., "h" -> https://img.at13xe.top/ri/h)
    pub path: &'static str,
    /// Key into the remote count table
    pub count_key: &'static str,
    /// Count used when the remote table is unavailable
    pub fallback_count: u32,
}

impl Category {
    /// Every category, in selector order
    pub const ALL: [Category; 6] = [
        Category::Horizontal,
        Category::Vertical,
        Category::Genshin,
        Category::Avatar,
        Category::Mia,
        Category::Shitone,
    ];

    pub fn config(self) -> CategoryConfig {
        let (path, count_key, fallback_count) = match self {
            Category::Horizontal => ("h", "h", 788),
            Category::Vertical => ("v", "v", 995),
            Category::Genshin => ("ys", "ys", 744),
            Category::Avatar => ("tx", "tx", 893),
            Category::Mia => ("mia", "mia", 248),
            Category::Shitone => ("a", "a", 611),
        };

        CategoryConfig {
            path,
            count_key,
            fallback_count,
        }
    }

    /// Base URL that image ids are appended to
    pub fn base_url(self) -> String {
        format!("{}/{}", CDN_ROOT, self.config().path)
    }

    pub fn count_key(self) -> &'static str {
        self.config().count_key
    }

    pub fn fallback_count(self) -> u32 {
        self.config().fallback_count
    }

    /// Label shown on the selector button
    pub fn label(self) -> &'static str {
        match self {
            Category::Horizontal => "横屏",
            Category::Vertical => "竖屏",
            Category::Genshin => "原神",
            Category::Avatar => "头像",
            Category::Mia => "mia",
            Category::Shitone => "しとね",
        }
    }

    /// Stable ASCII name used in settings files
    pub fn slug(self) -> &'static str {
        match self {
            Category::Horizontal => "horizontal",
            Category::Vertical => "vertical",
            Category::Genshin => "genshin",
            Category::Avatar => "avatar",
            Category::Mia => "mia",
            Category::Shitone => "shitone",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names no category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gallery category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts the slug, the display label, or the count key
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| {
                trimmed.eq_ignore_ascii_case(category.slug())
                    || trimmed == category.label()
                    || trimmed == category.count_key()
            })
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.slug().to_string()
    }
}
