//! The API client: one object owning every cache and the network seam.

use crate::config::ClientConfig;
use crate::error::{ErrorKind, Result};
use crate::history::{HistoryItem, ReadingHistory};
use crate::name::NameResponse;
use crate::transport::TransportHandle;
use crate::urls;
use exn::{OptionExt, ResultExt};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use mikra_links::{LinkCache, LinkSummaryEntry, RelatedBundle, filter_links, link_count};
use mikra_ref::{RefParser, StructuredRef, TitleIndex};
use mikra_text::{
    JsonFileStore, PreferenceStore, TextCache, TextEntry, TextOptions, TextResponse, VersionMeta, VersionPreferences,
};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, Mutex};
use time::UtcDateTime;
use tracing::{debug, instrument};

/// An in-flight request, shareable between every caller of the same URL.
type SharedFetch = Shared<BoxFuture<'static, std::result::Result<Arc<Value>, ErrorKind>>>;

/// Client for the library API.
///
/// Construct one per process or per session and clone handles freely —
/// clones share the caches. There is deliberately no global instance:
/// isolated clients are what make the caching behavior testable.
///
/// Locks are only ever held between suspension points, never across one,
/// and every cache write of an operation lands before its future
/// resolves — a caller that observes a resolved future observes the
/// fully-written cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ClientConfig,
    transport: TransportHandle,
    parser: RefParser,
    texts: Mutex<TextCache>,
    links: Mutex<LinkCache>,
    /// Generic url-keyed store behind [`ApiClient::cached_api`].
    general: Mutex<HashMap<String, Arc<Value>>>,
    /// In-flight requests by exact URL. Parameter order matters: the same
    /// parameters in a different order are a different request.
    inflight: Mutex<HashMap<String, SharedFetch>>,
    prefs: Mutex<VersionPreferences>,
    history: Mutex<ReadingHistory>,
    store: Arc<dyn PreferenceStore>,
}

impl ApiClient {
    /// Create a client persisting its state under the configured (or
    /// platform-default) data directory.
    pub fn new(config: ClientConfig, transport: TransportHandle, titles: TitleIndex) -> Result<Self> {
        let store: Arc<dyn PreferenceStore> = Arc::new(JsonFileStore::new(config.state_dir()?));
        Self::with_store(config, transport, titles, store)
    }

    /// Create a client over the default HTTP transport.
    #[cfg(feature = "http")]
    pub fn over_http(config: ClientConfig, titles: TitleIndex) -> Result<Self> {
        let transport: TransportHandle = Arc::new(crate::transport::HttpTransport::new());
        Self::new(config, transport, titles)
    }

    /// Create a client with an explicit state store (in-memory for tests).
    pub fn with_store(
        config: ClientConfig,
        transport: TransportHandle,
        titles: TitleIndex,
        store: Arc<dyn PreferenceStore>,
    ) -> Result<Self> {
        let prefs = VersionPreferences::load(store.as_ref()).or_raise(|| ErrorKind::Store)?;
        let history = ReadingHistory::load(store.as_ref()).or_raise(|| ErrorKind::Store)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                transport,
                parser: RefParser::new(Arc::new(titles)),
                texts: Mutex::new(TextCache::new()),
                links: Mutex::new(LinkCache::new()),
                general: Mutex::new(HashMap::new()),
                inflight: Mutex::new(HashMap::new()),
                prefs: Mutex::new(prefs),
                history: Mutex::new(history),
                store,
            }),
        })
    }

    pub fn parser(&self) -> &RefParser {
        &self.inner.parser
    }

    pub fn titles(&self) -> &TitleIndex {
        self.inner.parser.index()
    }

    // =========================================================================
    // Fetch plumbing
    // =========================================================================

    /// GET a URL as JSON, de-duplicating in-flight requests.
    ///
    /// All callers of one URL before its resolution share a single
    /// request and resolve with the same response value; a failure is
    /// delivered to every waiter. The in-flight slot is dropped on
    /// completion — longer-lived caching is the caller's business.
    async fn fetch_json(&self, url: &str) -> Result<Arc<Value>> {
        let shared = {
            let mut inflight = self.inner.inflight.lock().unwrap();
            match inflight.get(url) {
                Some(existing) => existing.clone(),
                None => {
                    let transport = Arc::clone(&self.inner.transport);
                    let target = url.to_string();
                    let fresh: SharedFetch = async move {
                        transport.get_json(&target).await.map(Arc::new).map_err(|error| error.deref().clone())
                    }
                    .boxed()
                    .shared();
                    inflight.insert(url.to_string(), fresh.clone());
                    fresh
                }
            }
        };
        let outcome = shared.clone().await;
        {
            let mut inflight = self.inner.inflight.lock().unwrap();
            if inflight.get(url).is_some_and(|current| current.ptr_eq(&shared)) {
                inflight.remove(url);
            }
        }
        match outcome {
            Ok(value) => Ok(value),
            Err(kind) => exn::bail!(kind),
        }
    }

    /// Cache-or-fetch: return the stored value for `key` if one resolved
    /// before, else fetch `url`, store under `key`, and return it. A
    /// resolved value is never re-fetched.
    pub async fn cached_api(&self, url: &str, key: &str) -> Result<Arc<Value>> {
        if let Some(hit) = self.inner.general.lock().unwrap().get(key) {
            return Ok(Arc::clone(hit));
        }
        let value = self.fetch_json(url).await?;
        self.inner.general.lock().unwrap().insert(key.to_string(), Arc::clone(&value));
        Ok(value)
    }

    fn parse_ref(&self, ref_str: &str) -> Result<StructuredRef> {
        match self.inner.parser.parse(ref_str) {
            Ok(sref) => Ok(sref),
            Err(error) => exn::bail!(ErrorKind::Ref(error)),
        }
    }

    /// Canonicalize a server-side ref string, leaving it untouched if it
    /// doesn't parse against the loaded titles.
    fn canonical_or_same(&self, ref_str: &str) -> String {
        self.inner.parser.parse(ref_str).map(|sref| sref.ref_str).unwrap_or_else(|_| ref_str.to_string())
    }

    // =========================================================================
    // Texts
    // =========================================================================

    /// Fetch the text payload for a ref, from cache when possible.
    ///
    /// A cache miss costs one request; concurrent misses on the same ref
    /// share it. Section-level responses are decomposed so that
    /// subsequent segment reads inside the section are cache hits, and a
    /// spanning response kicks off background warm-ups of its constituent
    /// sections.
    #[instrument(skip(self, opts))]
    pub async fn get_text(&self, ref_str: &str, opts: &TextOptions) -> Result<TextEntry> {
        let sref = self.parse_ref(ref_str)?;
        let opts = self.effective_options(&sref, opts.clone());
        if let Some(hit) = self.inner.texts.lock().unwrap().get(&sref.ref_str, &opts) {
            return Ok(hit);
        }
        let (entry, warm) = self.fetch_and_store_text(&sref.ref_str, &opts).await?;
        for section_ref in warm {
            self.spawn_section_warmup(section_ref, opts.clone());
        }
        Ok(entry)
    }

    /// Version records available for a ref's work.
    pub async fn get_versions(&self, ref_str: &str) -> Result<Vec<VersionMeta>> {
        let sref = self.parse_ref(ref_str)?;
        let url = urls::versions(&self.inner.config, &sref.ref_str);
        let value = self.cached_api(&url, &url).await?;
        let versions: Vec<VersionMeta> =
            serde_json::from_value(value.as_ref().clone()).or_raise(|| ErrorKind::Decode)?;
        Ok(versions.into_iter().map(VersionMeta::normalized).collect())
    }

    async fn fetch_and_store_text(&self, canonical_ref: &str, opts: &TextOptions) -> Result<(TextEntry, Vec<String>)> {
        let url = urls::text(&self.inner.config, canonical_ref, opts);
        let value = self.fetch_json(&url).await?;
        ensure_ok_payload(&value)?;
        let response: TextResponse =
            serde_json::from_value(value.as_ref().clone()).or_raise(|| ErrorKind::Decode)?;
        let mut entry = TextEntry::from_response(response);
        self.canonicalize_entry(&mut entry);

        let mut texts = self.inner.texts.lock().unwrap();
        let warm = texts.store(canonical_ref, entry, opts);
        let snapshot = texts.get(canonical_ref, opts);
        drop(texts);
        Ok((snapshot.ok_or_raise(|| ErrorKind::Decode)?, warm))
    }

    fn canonicalize_entry(&self, entry: &mut TextEntry) {
        entry.ref_str = self.canonical_or_same(&entry.ref_str);
        entry.section_ref = self.canonical_or_same(&entry.section_ref);
        entry.next = entry.next.take().map(|next| self.canonical_or_same(&next));
        entry.prev = entry.prev.take().map(|prev| self.canonical_or_same(&prev));
        entry.spanning_refs = entry.spanning_refs.iter().map(|span| self.canonical_or_same(span)).collect();
    }

    /// Warm a spanning constituent in the background. Failures are logged,
    /// not surfaced — the foreground request already succeeded.
    fn spawn_section_warmup(&self, section_ref: String, opts: TextOptions) {
        let client = self.clone();
        tokio::spawn(async move {
            if client.inner.texts.lock().unwrap().contains(&section_ref, &opts) {
                return;
            }
            if let Err(error) = client.fetch_and_store_text(&section_ref, &opts).await {
                debug!(%section_ref, ?error, "spanning warm-up fetch failed");
            }
        });
    }

    /// Fill unpinned versions from the reader's per-corpus preferences.
    fn effective_options(&self, sref: &StructuredRef, mut opts: TextOptions) -> TextOptions {
        let Some(corpus) = self.titles().get(&sref.book).and_then(|record| record.corpus.clone()) else {
            return opts;
        };
        let prefs = self.inner.prefs.lock().unwrap();
        if opts.en_version.is_none() {
            opts.en_version = prefs.version_for(&corpus, "en").map(String::from);
        }
        if opts.he_version.is_none() {
            opts.he_version = prefs.version_for(&corpus, "he").map(String::from);
        }
        opts
    }

    // =========================================================================
    // Related content
    // =========================================================================

    /// Fetch everything anchored to a ref: links, notes, sheets, and the
    /// passthrough lists. One request per distinct ref; the result is
    /// split per segment into the link cache on the way through.
    #[instrument(skip(self))]
    pub async fn related(&self, ref_str: &str) -> Result<RelatedBundle> {
        let sref = self.parse_ref(ref_str)?;
        if let Some(bundle) = self.inner.links.lock().unwrap().whole(&sref.ref_str) {
            return Ok(bundle);
        }
        let url = urls::related(&self.inner.config, &sref.ref_str);
        let value = self.fetch_json(&url).await?;
        ensure_ok_payload(&value)?;
        let bundle: RelatedBundle = serde_json::from_value(value.as_ref().clone()).or_raise(|| ErrorKind::Decode)?;
        self.inner.links.lock().unwrap().merge(&sref.ref_str, bundle.clone(), &self.inner.parser);
        Ok(bundle)
    }

    /// Category/book roll-up of the cached links for a ref.
    pub fn link_summary(&self, ref_str: &str) -> Result<Vec<LinkSummaryEntry>> {
        let sref = self.parse_ref(ref_str)?;
        let bundle = self.inner.links.lock().unwrap().bucket(&sref.ref_str).unwrap_or_default();
        let primary_category =
            self.titles().get(&sref.book).map(|record| record.primary_category.clone());
        Ok(mikra_links::link_summary(&bundle.links, primary_category.as_deref(), self.titles().category_order()))
    }

    /// Count of the cached links for a ref selected by `filters`.
    pub fn link_count(&self, ref_str: &str, filters: &[String]) -> Result<usize> {
        let sref = self.parse_ref(ref_str)?;
        let bundle = self.inner.links.lock().unwrap().bucket(&sref.ref_str).unwrap_or_default();
        Ok(link_count(&bundle.links, filters))
    }

    /// The cached links for a ref selected by `filters`.
    pub fn filtered_links(&self, ref_str: &str, filters: &[String]) -> Result<Vec<mikra_links::LinkItem>> {
        let sref = self.parse_ref(ref_str)?;
        let bundle = self.inner.links.lock().unwrap().bucket(&sref.ref_str).unwrap_or_default();
        Ok(filter_links(&bundle.links, filters))
    }

    // =========================================================================
    // Lookup endpoints
    // =========================================================================

    /// Ask the server what a query string is: ref, book, topic, or none
    /// of those.
    pub async fn name(&self, query: &str, ref_only: bool, limit: Option<usize>) -> Result<NameResponse> {
        let url = urls::name(&self.inner.config, query, ref_only, limit);
        let value = self.cached_api(&url, &url).await?;
        serde_json::from_value(value.as_ref().clone()).or_raise(|| ErrorKind::Decode)
    }

    /// Lightweight text snippets for many refs at once, keyed by ref.
    pub async fn bulk_text(&self, refs: &[String]) -> Result<HashMap<String, Value>> {
        let url = urls::bulk_text(&self.inner.config, refs);
        let value = self.cached_api(&url, &url).await?;
        serde_json::from_value(value.as_ref().clone()).or_raise(|| ErrorKind::Decode)
    }

    /// Sheet records by id, as the server shapes them.
    pub async fn bulk_sheets(&self, ids: &[u64]) -> Result<Value> {
        let url = urls::bulk_sheets(&self.inner.config, ids);
        let value = self.cached_api(&url, &url).await?;
        Ok(value.as_ref().clone())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Save a text edit. Invalidates the entire text cache: derived
    /// entries aren't tracked precisely enough for anything narrower.
    #[instrument(skip(self, payload))]
    pub async fn save_text(&self, ref_str: &str, payload: &Value) -> Result<Value> {
        let sref = self.parse_ref(ref_str)?;
        let url = urls::texts_post(&self.inner.config, &sref.ref_str);
        let result = self.inner.transport.post_json(&url, payload).await?;
        ensure_ok_payload(&result)?;
        self.inner.texts.lock().unwrap().invalidate_all();
        self.inner.general.lock().unwrap().clear();
        Ok(result)
    }

    pub async fn post_link(&self, link: &Value) -> Result<Value> {
        let url = urls::links_post(&self.inner.config);
        let result = self.inner.transport.post_json(&url, link).await?;
        ensure_ok_payload(&result)?;
        self.inner.links.lock().unwrap().invalidate_all();
        Ok(result)
    }

    pub async fn delete_link(&self, id: &str) -> Result<Value> {
        let url = urls::link_delete(&self.inner.config, id);
        let result = self.inner.transport.delete_json(&url).await?;
        ensure_ok_payload(&result)?;
        self.inner.links.lock().unwrap().invalidate_all();
        Ok(result)
    }

    pub async fn post_note(&self, note: &Value) -> Result<Value> {
        let url = urls::notes_post(&self.inner.config);
        let result = self.inner.transport.post_json(&url, note).await?;
        ensure_ok_payload(&result)?;
        self.inner.links.lock().unwrap().invalidate_all();
        Ok(result)
    }

    pub async fn delete_note(&self, id: &str) -> Result<Value> {
        let url = urls::note_delete(&self.inner.config, id);
        let result = self.inner.transport.delete_json(&url).await?;
        ensure_ok_payload(&result)?;
        self.inner.links.lock().unwrap().invalidate_all();
        Ok(result)
    }

    pub async fn post_collection(&self, collection: &Value) -> Result<Value> {
        let url = urls::collections_post(&self.inner.config);
        let result = self.inner.transport.post_json(&url, collection).await?;
        ensure_ok_payload(&result)?;
        Ok(result)
    }

    pub async fn subscribe(&self, email: &str) -> Result<Value> {
        let url = urls::subscribe(&self.inner.config, email);
        let result = self.inner.transport.post_json(&url, &Value::Null).await?;
        ensure_ok_payload(&result)?;
        Ok(result)
    }

    // =========================================================================
    // Local state
    // =========================================================================

    pub fn version_preference(&self, corpus: &str, language: &str) -> Option<String> {
        self.inner.prefs.lock().unwrap().version_for(corpus, language).map(String::from)
    }

    /// Set a per-corpus version preference, persisting it. The in-memory
    /// map is swapped only after the save succeeds.
    pub fn set_version_preference(&self, corpus: &str, language: &str, version_title: &str) -> Result<()> {
        let mut prefs = self.inner.prefs.lock().unwrap();
        let next =
            prefs.update(corpus, language, version_title, self.inner.store.as_ref()).or_raise(|| ErrorKind::Store)?;
        *prefs = next;
        Ok(())
    }

    /// Record a visit in the signed-out reading history.
    pub fn record_history(&self, ref_str: &str) -> Result<()> {
        let sref = self.parse_ref(ref_str)?;
        let item = HistoryItem {
            ref_str: sref.ref_str,
            book: sref.book,
            time_stamp: UtcDateTime::now().unix_timestamp(),
        };
        self.inner.history.lock().unwrap().record(item, self.inner.store.as_ref()).or_raise(|| ErrorKind::Store)
    }

    /// The signed-out reading history, newest first.
    pub fn reading_history(&self) -> Vec<HistoryItem> {
        self.inner.history.lock().unwrap().items().to_vec()
    }
}

/// Some endpoints answer 200 with `{"error": "..."}`.
fn ensure_ok_payload(value: &Value) -> Result<()> {
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        exn::bail!(ErrorKind::Api(message.to_string()));
    }
    Ok(())
}
