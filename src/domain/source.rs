use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Twitter,
    Wikipedia,
    FacebookPosts,
    FacebookLinks,
    FacebookMilestones,
    FacebookPhotos,
}

impl SourceType {
    pub const ALL: [SourceType; 6] = [
        SourceType::Twitter,
        SourceType::Wikipedia,
        SourceType::FacebookPosts,
        SourceType::FacebookLinks,
        SourceType::FacebookMilestones,
        SourceType::FacebookPhotos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Twitter => "twitter",
            SourceType::Wikipedia => "wikipedia",
            SourceType::FacebookPosts => "facebook_posts",
            SourceType::FacebookLinks => "facebook_links",
            SourceType::FacebookMilestones => "facebook_milestones",
            SourceType::FacebookPhotos => "facebook_photos",
        }
    }

    /// Name used in user-facing fallback messages
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceType::Twitter => "Twitter",
            SourceType::Wikipedia => "Wikipedia",
            SourceType::FacebookPosts
            | SourceType::FacebookLinks
            | SourceType::FacebookMilestones
            | SourceType::FacebookPhotos => "Facebook",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "twitter" => Ok(SourceType::Twitter),
            "wikipedia" | "wiki" => Ok(SourceType::Wikipedia),
            "facebook_posts" | "facebook" => Ok(SourceType::FacebookPosts),
            "facebook_links" => Ok(SourceType::FacebookLinks),
            "facebook_milestones" => Ok(SourceType::FacebookMilestones),
            "facebook_photos" => Ok(SourceType::FacebookPhotos),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which Twitter API generation the timeline is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwitterApi {
    /// Unauthenticated v1.1 `user_timeline` call
    V1,
    /// Bearer-token v2: resolve the handle to an id, then read its tweets
    #[default]
    V2,
}

impl std::str::FromStr for TwitterApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "1.1" | "v1" | "v1.1" => Ok(TwitterApi::V1),
            "2" | "v2" => Ok(TwitterApi::V2),
            _ => Err(format!("Unknown Twitter API version: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_round_trips_through_str() {
        for source in SourceType::ALL {
            assert_eq!(source.as_str().parse::<SourceType>().unwrap(), source);
        }
    }

    #[test]
    fn test_source_type_aliases() {
        assert_eq!("facebook".parse::<SourceType>().unwrap(), SourceType::FacebookPosts);
        assert_eq!("facebook-photos".parse::<SourceType>().unwrap(), SourceType::FacebookPhotos);
        assert!("myspace".parse::<SourceType>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(SourceType::Twitter.display_name(), "Twitter");
        assert_eq!(SourceType::FacebookMilestones.display_name(), "Facebook");
    }

    #[test]
    fn test_twitter_api_parse() {
        assert_eq!("1.1".parse::<TwitterApi>().unwrap(), TwitterApi::V1);
        assert_eq!("v2".parse::<TwitterApi>().unwrap(), TwitterApi::V2);
        assert_eq!(TwitterApi::default(), TwitterApi::V2);
        assert!("3".parse::<TwitterApi>().is_err());
    }
}
