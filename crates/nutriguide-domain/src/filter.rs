//! Bucket filter for compatibility and guide responses

use std::fmt;
use std::str::FromStr;

/// Which buckets a response should carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Both buckets
    #[default]
    All,

    /// Only the avoid bucket
    Avoid,

    /// Only the beneficial bucket
    Beneficial,
}

impl Filter {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Avoid => "avoid",
            Filter::Beneficial => "beneficial",
        }
    }

    /// Whether the avoid bucket is returned
    pub fn includes_avoid(&self) -> bool {
        matches!(self, Filter::All | Filter::Avoid)
    }

    /// Whether the beneficial bucket is returned
    pub fn includes_beneficial(&self) -> bool {
        matches!(self, Filter::All | Filter::Beneficial)
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "avoid" => Ok(Filter::Avoid),
            "beneficial" => Ok(Filter::Beneficial),
            other => Err(format!(
                "Invalid filter '{}': expected one of all, avoid, beneficial",
                other
            )),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("all".parse::<Filter>(), Ok(Filter::All));
        assert_eq!(" Avoid ".parse::<Filter>(), Ok(Filter::Avoid));
        assert_eq!("BENEFICIAL".parse::<Filter>(), Ok(Filter::Beneficial));
        assert!("benefit".parse::<Filter>().is_err());
        assert!("".parse::<Filter>().is_err());
    }

    #[test]
    fn test_bucket_inclusion() {
        assert!(Filter::All.includes_avoid() && Filter::All.includes_beneficial());
        assert!(Filter::Avoid.includes_avoid() && !Filter::Avoid.includes_beneficial());
        assert!(!Filter::Beneficial.includes_avoid() && Filter::Beneficial.includes_beneficial());
        assert_eq!(Filter::default(), Filter::All);
    }
}
