use serde::{Deserialize, Serialize};

/// Expenditure category, one bucket per usage report column.
///
/// Parsing is infallible: anything unrecognized lands in [`Unknown`] rather
/// than failing the whole settlement over a single odd row.
///
/// [`Unknown`]: Category::Unknown
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Meal,
    Lodgment,
    Transport,
    Shopping,
    Activity,
    Etc,
    #[default]
    Unknown,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meal => "meal",
            Self::Lodgment => "lodgment",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Activity => "activity",
            Self::Etc => "etc",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a stored category string to a bucket, defaulting to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "meal" => Self::Meal,
            "lodgment" => Self::Lodgment,
            "transport" => Self::Transport,
            "shopping" => Self::Shopping,
            "activity" => Self::Activity,
            "etc" => Self::Etc,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_known_categories() {
        for category in [
            Category::Meal,
            Category::Lodgment,
            Category::Transport,
            Category::Shopping,
            Category::Activity,
            Category::Etc,
            Category::Unknown,
        ] {
            assert_eq!(Category::parse(category.as_str()), category);
        }
    }

    #[test]
    fn unrecognized_values_fall_back_to_unknown() {
        assert_eq!(Category::parse("souvenirs"), Category::Unknown);
        assert_eq!(Category::parse(""), Category::Unknown);
    }
}
