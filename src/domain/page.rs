use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{DocumentResult, FeedItem, FetchResult, Fetched};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Home,
    News,
    Twitter,
    Wikipedia,
    Calendar,
    LabRules,
    PublicationPolicy,
    DataSharingPolicy,
}

impl PageKind {
    pub const ALL: [PageKind; 8] = [
        PageKind::Home,
        PageKind::News,
        PageKind::Twitter,
        PageKind::Wikipedia,
        PageKind::Calendar,
        PageKind::LabRules,
        PageKind::PublicationPolicy,
        PageKind::DataSharingPolicy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::News => "news",
            PageKind::Twitter => "twitter",
            PageKind::Wikipedia => "wikipedia",
            PageKind::Calendar => "calendar",
            PageKind::LabRules => "lab-rules",
            PageKind::PublicationPolicy => "publication-policy",
            PageKind::DataSharingPolicy => "data-sharing-policy",
        }
    }

    /// Slot names filled from external fetches on this page
    pub fn fetched_slots(&self) -> &'static [&'static str] {
        match self {
            PageKind::Home => &["general_data", "milestones", "posts", "photos"],
            PageKind::News => &["statuses", "links", "milestones", "photos"],
            PageKind::Twitter => &["timeline"],
            PageKind::Wikipedia => &["pages"],
            PageKind::Calendar => &[],
            PageKind::LabRules => &["lab_rules"],
            PageKind::PublicationPolicy => &["publication_policy"],
            PageKind::DataSharingPolicy => &["data_sharing_policy"],
        }
    }
}

impl std::str::FromStr for PageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "home" | "index" => Ok(PageKind::Home),
            "news" | "lab-news" => Ok(PageKind::News),
            "twitter" => Ok(PageKind::Twitter),
            "wikipedia" => Ok(PageKind::Wikipedia),
            "calendar" | "google-calendar" => Ok(PageKind::Calendar),
            "lab-rules" => Ok(PageKind::LabRules),
            "publication-policy" => Ok(PageKind::PublicationPolicy),
            "data-sharing-policy" | "data-resource-policy" => Ok(PageKind::DataSharingPolicy),
            _ => Err(format!("Unknown page: {}", s)),
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value of one named slot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlotValue {
    Items(Vec<FeedItem>),
    Object(Value),
    Text(String),
    Unavailable(String),
}

impl SlotValue {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SlotValue::Unavailable(_))
    }
}

impl From<FetchResult> for SlotValue {
    fn from(result: FetchResult) -> Self {
        match result {
            Fetched::Available(items) => SlotValue::Items(items),
            Fetched::Unavailable(reason) => SlotValue::Unavailable(reason),
        }
    }
}

impl From<DocumentResult> for SlotValue {
    fn from(result: DocumentResult) -> Self {
        match result {
            Fetched::Available(text) => SlotValue::Text(text),
            Fetched::Unavailable(reason) => SlotValue::Unavailable(reason),
        }
    }
}

impl From<Fetched<Value>> for SlotValue {
    fn from(result: Fetched<Value>) -> Self {
        match result {
            Fetched::Available(value) => SlotValue::Object(value),
            Fetched::Unavailable(reason) => SlotValue::Unavailable(reason),
        }
    }
}

/// Fully resolved context for one page render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub page: PageKind,
    pub slots: BTreeMap<String, SlotValue>,
}

impl PageContext {
    pub fn new(page: PageKind) -> Self {
        Self {
            page,
            slots: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<SlotValue>) {
        self.slots.insert(name.into(), value.into());
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.slots.insert(name.into(), SlotValue::Text(text.into()));
    }

    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.slots.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Names of slots that fell back to their unavailable message
    pub fn unavailable_slots(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|(_, value)| value.is_unavailable())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
