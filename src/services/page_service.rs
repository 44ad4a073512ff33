use std::sync::Arc;
use std::thread;

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::{not_available_message, PageContext, PageKind, SlotValue, SourceType};
use crate::sources::facebook::PAGE_INFO_RESOURCE;
use crate::sources::{DocumentFetcher, FacebookPageInfo, SourceRegistry};
use crate::transport::HttpTransport;

type SlotJob<'a> = Box<dyn FnOnce() -> SlotValue + Send + 'a>;

/// One fetched slot; `fallback` is used if the job panics
struct Slot<'a> {
    name: &'static str,
    fallback: String,
    job: SlotJob<'a>,
}

/// Builds the context for one page by running each slot's fetcher.
///
/// Slots share nothing mutable, so they run concurrently; a slot's outcome
/// never influences another slot.
pub struct PageService {
    config: Config,
    registry: SourceRegistry,
    documents: DocumentFetcher,
    page_info: Option<FacebookPageInfo>,
}

impl PageService {
    pub fn new(config: Config, transport: Arc<dyn HttpTransport>) -> Self {
        let registry = SourceRegistry::from_config(&config, transport.clone());
        let page_info = config
            .facebook
            .as_ref()
            .map(|facebook| FacebookPageInfo::new(transport.clone(), facebook));

        Self {
            registry,
            documents: DocumentFetcher::new(transport),
            page_info,
            config,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn documents(&self) -> &DocumentFetcher {
        &self.documents
    }

    pub fn build_page_context(&self, page: PageKind) -> PageContext {
        let mut context = PageContext::new(page);
        self.insert_social_accounts(&mut context);

        let mut slots: Vec<Slot<'_>> = Vec::new();

        match page {
            PageKind::Home => {
                slots.push(self.page_info_slot("general_data"));
                slots.push(self.feed_slot("milestones", SourceType::FacebookMilestones));
                slots.push(self.feed_slot("posts", SourceType::FacebookPosts));
                slots.push(self.feed_slot("photos", SourceType::FacebookPhotos));
                context.insert_text("photo_url", self.photo_url());
            }
            PageKind::News => {
                slots.push(self.feed_slot("statuses", SourceType::FacebookPosts));
                slots.push(self.feed_slot("links", SourceType::FacebookLinks));
                slots.push(self.feed_slot("milestones", SourceType::FacebookMilestones));
                slots.push(self.feed_slot("photos", SourceType::FacebookPhotos));
            }
            PageKind::Twitter => {
                slots.push(self.feed_slot("timeline", SourceType::Twitter));
                let screen_name = self
                    .config
                    .twitter
                    .as_ref()
                    .map(|t| t.fetch.identifier.clone())
                    .unwrap_or_default();
                context.insert_text("screen_name", screen_name);
            }
            PageKind::Wikipedia => {
                slots.push(self.feed_slot("pages", SourceType::Wikipedia));
                let username = self
                    .config
                    .wikipedia
                    .as_ref()
                    .map(|w| w.identifier.clone())
                    .unwrap_or_default();
                context.insert_text("wikipedia_username", username);
            }
            PageKind::Calendar => {
                context.insert_text(
                    "google_calendar_id",
                    self.config.google_calendar_id.clone().unwrap_or_default(),
                );
            }
            PageKind::LabRules => {
                let url = self.config.documents.lab_rules.as_deref();
                slots.push(self.document_slot("lab_rules", "Lab Rules", url));
                context.insert_text("lab_rules_source", url.unwrap_or_default());
            }
            PageKind::PublicationPolicy => {
                let url = self.config.documents.publication_policy.as_deref();
                slots.push(self.document_slot("publication_policy", "Publication Policy", url));
                context.insert_text("publication_policy_source", url.unwrap_or_default());
            }
            PageKind::DataSharingPolicy => {
                let url = self.config.documents.data_sharing_policy.as_deref();
                slots.push(self.document_slot(
                    "data_sharing_policy",
                    "Data Sharing Policy",
                    url,
                ));
                context.insert_text("data_sharing_policy_source", url.unwrap_or_default());
            }
        }

        for (name, value) in run_slots(slots) {
            context.insert(name, value);
        }

        let unavailable = context.unavailable_slots();
        info!(
            page = %page,
            slots = context.slots.len(),
            unavailable = ?unavailable,
            "page context built"
        );

        context
    }

    fn insert_social_accounts(&self, context: &mut PageContext) {
        let social = &self.config.social;
        context.insert_text("lab_name", social.lab_name.clone());
        context.insert_text("twitter", social.twitter.clone());
        context.insert_text("facebook", social.facebook.clone());
        context.insert_text("google_plus", social.google_plus.clone());
    }

    fn feed_slot(&self, name: &'static str, source_type: SourceType) -> Slot<'_> {
        Slot {
            name,
            fallback: not_available_message(source_type.display_name()),
            job: Box::new(move || self.registry.fetch_feed(source_type, None).into()),
        }
    }

    fn page_info_slot(&self, name: &'static str) -> Slot<'_> {
        Slot {
            name,
            fallback: not_available_message(PAGE_INFO_RESOURCE),
            job: Box::new(move || match &self.page_info {
                Some(page_info) => page_info.fetch().into(),
                None => SlotValue::Unavailable("Facebook is not configured.".to_string()),
            }),
        }
    }

    fn document_slot<'a>(
        &'a self,
        name: &'static str,
        resource: &'static str,
        url: Option<&'a str>,
    ) -> Slot<'a> {
        Slot {
            name,
            fallback: not_available_message(resource),
            job: Box::new(move || match url {
                Some(url) => self.documents.fetch_document(resource, url).into(),
                None => SlotValue::Unavailable(not_available_message(resource)),
            }),
        }
    }

    /// Album photos URL, without credentials
    fn photo_url(&self) -> String {
        self.config
            .facebook
            .as_ref()
            .and_then(|facebook| facebook.album_photos_url())
            .unwrap_or_default()
    }
}

/// Run every slot on its own scoped thread and collect results in slot order.
fn run_slots(slots: Vec<Slot<'_>>) -> Vec<(&'static str, SlotValue)> {
    thread::scope(|scope| {
        let handles: Vec<_> = slots
            .into_iter()
            .map(|slot| (slot.name, slot.fallback, scope.spawn(slot.job)))
            .collect();

        handles
            .into_iter()
            .map(|(name, fallback, handle)| {
                let value = handle.join().unwrap_or_else(|_| {
                    warn!(slot = name, "slot fetcher panicked");
                    SlotValue::Unavailable(fallback)
                });
                (name, value)
            })
            .collect()
    })
}
