//! Exploration controller
//!
//! Turns raw, possibly rapid slider input into a debounced, cache-aware
//! series of remote compression calls, and owns the handles the UI renders.
//!
//! The controller does no I/O and no timing itself. The caller (the iced
//! update loop or the headless sweep) starts timers and remote calls and
//! reports back:
//!
//! ```text
//! open(id) -> original_loaded(id, result) -> resolve_desired()
//! set_parameter(v) -> ticket -> [delay] -> debounce_elapsed(ticket) -> Resolution
//! Resolution::Fetch(request) -> [remote call] -> compression_finished(request, result)
//! ```
//!
//! Only the latest debounce ticket resolves, and a completion is published
//! only while it still matches the desired quality of the open image, so a
//! slow response for an older value can never overwrite a newer one.

use bytes::Bytes;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::cache::ResultCache;
use super::data::ImageId;
use super::display::{ActiveDisplaySet, DisplayHandle, HandleRegistry, HandleRole};
use super::params::{Quality, Zone, DEFAULT_PARAMETER};
use crate::error::ExploreError;
use crate::imaging::grayscale;
use crate::remote::RemoteService;

/// Where the controller is in its per-image lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No image open
    Idle,
    /// Fetching and converting the original
    LoadingOriginal,
    /// Original published, nothing pending
    Ready,
    /// A parameter change is waiting for its debounce delay
    Debouncing,
    /// The desired quality is being fetched from the backend
    Resolving,
    /// The original could not be loaded; nothing to explore
    Failed,
}

/// Identifies one debounce delay; only the newest one is honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket(u64);

/// A remote compression call the caller must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub image: ImageId,
    pub quality: Quality,
}

/// What resolving the desired quality led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the cache and already published
    Cached(Quality),
    /// A request for this quality is already in flight
    Pending(Quality),
    /// Cache miss: perform the request and report back
    Fetch(CompressionRequest),
}

/// How a finished compression call was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Published as the active compressed image
    Published(Quality),
    /// No longer wanted; a successful payload was still cached
    Superseded(Quality),
    /// The request for the desired quality failed; `last_error` is set
    Failed(Quality),
}

/// Page-session scoped controller for exploring one image at a time
#[derive(Debug)]
pub struct Explorer {
    cache: ResultCache,
    registry: HandleRegistry,
    display: ActiveDisplaySet,
    image: Option<ImageId>,
    phase: Phase,
    default_value: u16,
    slider: u16,
    desired: Quality,
    shown: Option<Quality>,
    generation: u64,
    in_flight: HashSet<Quality>,
    last_error: Option<ExploreError>,
}

impl Explorer {
    /// Create a controller whose slider starts (and resets) at `default_value`.
    pub fn new(registry: HandleRegistry, default_value: u16) -> Self {
        let (default_value, desired) = match Quality::quantize(default_value as i64) {
            Ok(quality) => (default_value, quality),
            Err(_) => (DEFAULT_PARAMETER, Quality::default()),
        };

        Explorer {
            cache: ResultCache::new(),
            registry,
            display: ActiveDisplaySet::default(),
            image: None,
            phase: Phase::Idle,
            default_value,
            slider: default_value,
            desired,
            shown: None,
            generation: 0,
            in_flight: HashSet::new(),
            last_error: None,
        }
    }

    // ========== Lifecycle ==========

    /// Start exploring `image`, tearing down any previous image session.
    pub fn open(&mut self, image: ImageId) {
        self.teardown();
        info!("🖼️  Opening image {}", image);

        self.image = Some(image);
        self.phase = Phase::LoadingOriginal;
        self.slider = self.default_value;
        self.desired = Quality::quantize(self.default_value as i64).unwrap_or_default();
    }

    /// Report the grayscale original (or why it could not be produced).
    ///
    /// Results for an image that is no longer open are discarded. On
    /// success the caller should follow up with [`Explorer::resolve_desired`].
    pub fn original_loaded(
        &mut self,
        image: &ImageId,
        result: Result<Bytes, ExploreError>,
    ) -> Result<(), ExploreError> {
        if self.image.as_ref() != Some(image) || self.phase != Phase::LoadingOriginal {
            debug!("Ignoring original for {} (no longer loading it)", image);
            return Ok(());
        }

        match result {
            Ok(gray) => {
                let handle = self.registry.create(HandleRole::Original, gray);
                info!("✅ Original ready for {} ({})", image, handle.url());
                self.display.publish(handle);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(err) => {
                warn!("❌ Original for {} failed: {}", image, err);
                self.phase = Phase::Failed;
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Release every handle and return to idle. The cache is kept.
    pub fn teardown(&mut self) {
        if self.image.is_some() {
            debug!("Tearing down image session ({} live handles)", self.registry.live_count());
        }

        self.display.clear();
        self.image = None;
        self.phase = Phase::Idle;
        self.shown = None;
        self.in_flight.clear();
        self.last_error = None;
        self.generation += 1;
    }

    // ========== Parameter changes ==========

    /// Record a new slider value and restart the debounce delay.
    ///
    /// The returned ticket must be passed to [`Explorer::debounce_elapsed`]
    /// once the delay has passed; any later call supersedes it.
    ///
    /// # Errors
    /// `InvalidParameter` for values outside 1..=300; state is untouched
    /// apart from `last_error`.
    pub fn set_parameter(&mut self, value: i64) -> Result<DebounceTicket, ExploreError> {
        let quality = self.record(value)?;

        if matches!(self.phase, Phase::Ready | Phase::Debouncing | Phase::Resolving) {
            self.phase = Phase::Debouncing;
        }

        debug!("Slider at {} (key {}), ticket {}", value, quality, self.generation);
        Ok(DebounceTicket(self.generation))
    }

    /// The debounce delay for `ticket` has passed.
    ///
    /// Returns `None` when a newer parameter change superseded the ticket or
    /// there is nothing to explore yet.
    pub fn debounce_elapsed(&mut self, ticket: DebounceTicket) -> Option<Resolution> {
        if ticket.0 != self.generation || self.phase != Phase::Debouncing {
            return None;
        }
        self.resolve()
    }

    /// Return the slider to its default value and resolve it immediately.
    pub fn reset(&mut self) -> Option<Resolution> {
        self.record(self.default_value as i64).ok()?;
        self.resolve_desired()
    }

    /// Resolve the desired quality right away, without debouncing.
    pub fn resolve_desired(&mut self) -> Option<Resolution> {
        if !matches!(self.phase, Phase::Ready | Phase::Debouncing | Phase::Resolving) {
            return None;
        }
        self.resolve()
    }

    // ========== Remote completions ==========

    /// Apply the outcome of a compression call started for `request`.
    pub fn compression_finished(
        &mut self,
        request: CompressionRequest,
        result: Result<Bytes, ExploreError>,
    ) -> Completion {
        let quality = request.quality;
        let current_image = self.image.as_ref() == Some(&request.image);

        if let Ok(payload) = &result {
            self.cache.put(request.image.clone(), quality, payload.clone());
        }

        if !current_image {
            debug!("Ignoring completion for closed image {}", request.image);
            return Completion::Superseded(quality);
        }

        self.in_flight.remove(&quality);

        if quality != self.desired {
            debug!("Ignoring stale completion for {} (want {})", quality, self.desired);
            self.settle();
            return Completion::Superseded(quality);
        }

        let completion = match result {
            Ok(payload) => {
                self.publish_compressed(quality, payload);
                self.last_error = None;
                Completion::Published(quality)
            }
            Err(err) => {
                warn!("⚠️  Compression at {} failed: {}", quality, err);
                self.last_error = Some(err);
                Completion::Failed(quality)
            }
        };

        self.settle();
        completion
    }

    // ========== Async driving ==========

    /// Fetch the original through `service`, convert it and publish it.
    pub async fn load_original<S>(&mut self, service: &S) -> Result<(), ExploreError>
    where
        S: RemoteService + ?Sized,
    {
        let image = self
            .image
            .clone()
            .ok_or_else(|| ExploreError::FetchOriginalFailed("No image selected".into()))?;

        let result = match service.fetch_original(&image).await {
            Ok(raw) => grayscale::to_grayscale_async(raw).await,
            Err(err) => Err(err),
        };

        self.original_loaded(&image, result)
    }

    /// Resolve `value` immediately, computing it through `service` on a miss.
    ///
    /// Sequential counterpart of `set_parameter` + `debounce_elapsed` +
    /// `compression_finished`.
    pub async fn resolve_now<S>(&mut self, value: i64, service: &S) -> Result<Quality, ExploreError>
    where
        S: RemoteService + ?Sized,
    {
        let quality = self.record(value)?;
        let image = match (&self.image, self.phase) {
            (Some(image), Phase::Ready | Phase::Debouncing | Phase::Resolving) => image.clone(),
            _ => return Err(ExploreError::FetchOriginalFailed("Original image is not loaded".into())),
        };

        self.phase = Phase::Resolving;
        let result = self
            .cache
            .get_or_compute(&image, quality, || service.compress(&image, quality))
            .await;
        self.phase = Phase::Ready;

        match result {
            Ok(payload) => {
                self.publish_compressed(quality, payload);
                self.last_error = None;
                Ok(quality)
            }
            Err(err) => {
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ========== Accessors ==========

    pub fn image(&self) -> Option<&ImageId> {
        self.image.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn original_handle(&self) -> Option<&DisplayHandle> {
        self.display.original()
    }

    pub fn compressed_handle(&self) -> Option<&DisplayHandle> {
        self.display.compressed()
    }

    /// Quality of the compressed image currently displayed
    pub fn shown_quality(&self) -> Option<Quality> {
        self.shown
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::LoadingOriginal | Phase::Resolving)
    }

    pub fn last_error(&self) -> Option<&ExploreError> {
        self.last_error.as_ref()
    }

    /// The error that stopped the image from loading, if any
    pub fn blocking_error(&self) -> Option<&ExploreError> {
        match self.phase {
            Phase::Failed => self.last_error.as_ref(),
            _ => None,
        }
    }

    /// Raw slider value
    pub fn slider_value(&self) -> u16 {
        self.slider
    }

    pub fn desired_quality(&self) -> Quality {
        self.desired
    }

    pub fn zone(&self) -> Zone {
        Zone::classify(self.slider)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    // ========== Internals ==========

    /// Quantize and store `value` as the desired parameter, superseding
    /// every outstanding debounce ticket.
    fn record(&mut self, value: i64) -> Result<Quality, ExploreError> {
        let quality = Quality::quantize(value).map_err(|err| {
            warn!("Rejecting slider value {}", value);
            self.last_error = Some(err.clone());
            err
        })?;

        self.slider = value as u16;
        self.desired = quality;
        self.generation += 1;
        Ok(quality)
    }

    fn resolve(&mut self) -> Option<Resolution> {
        let image = self.image.clone()?;
        let quality = self.desired;

        if let Some(payload) = self.cache.get(&image, quality) {
            debug!("💾 Cache hit for {} at {}", image, quality);
            self.publish_compressed(quality, payload);
            self.last_error = None;
            self.phase = Phase::Ready;
            return Some(Resolution::Cached(quality));
        }

        self.phase = Phase::Resolving;

        if !self.in_flight.insert(quality) {
            debug!("Request for {} already in flight", quality);
            return Some(Resolution::Pending(quality));
        }

        info!("🌐 Requesting {} at {} values", image, quality);
        Some(Resolution::Fetch(CompressionRequest { image, quality }))
    }

    fn publish_compressed(&mut self, quality: Quality, payload: Bytes) {
        if self.shown == Some(quality) {
            return;
        }
        self.display
            .publish(self.registry.create(HandleRole::Compressed, payload));
        self.shown = Some(quality);
    }

    /// Leave `Resolving` once the desired quality is no longer in flight.
    fn settle(&mut self) {
        if self.phase == Phase::Resolving && !self.in_flight.contains(&self.desired) {
            self.phase = Phase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::FakeBackend;

    fn gray_png() -> Bytes {
        Bytes::from_static(b"gray")
    }

    fn ready_explorer() -> (Explorer, ImageId) {
        let mut explorer = Explorer::new(HandleRegistry::new(), 100);
        let image = ImageId::from("img123");
        explorer.open(image.clone());
        explorer.original_loaded(&image, Ok(gray_png())).unwrap();
        (explorer, image)
    }

    fn fetch(resolution: Option<Resolution>) -> CompressionRequest {
        match resolution {
            Some(Resolution::Fetch(request)) => request,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    /// Change the slider and let the debounce delay pass.
    fn settle_on(explorer: &mut Explorer, value: i64) -> Option<Resolution> {
        let ticket = explorer.set_parameter(value).unwrap();
        explorer.debounce_elapsed(ticket)
    }

    #[test]
    fn test_open_then_original_reaches_ready() {
        let mut explorer = Explorer::new(HandleRegistry::new(), 100);
        assert_eq!(explorer.phase(), Phase::Idle);

        let image = ImageId::from("img123");
        explorer.open(image.clone());
        assert_eq!(explorer.phase(), Phase::LoadingOriginal);
        assert!(explorer.is_busy());

        explorer.original_loaded(&image, Ok(gray_png())).unwrap();
        assert_eq!(explorer.phase(), Phase::Ready);
        assert_eq!(explorer.original_handle().unwrap().bytes(), &gray_png());
    }

    #[test]
    fn test_initial_resolution_uses_default_value() {
        let (mut explorer, image) = ready_explorer();

        let request = fetch(explorer.resolve_desired());
        assert_eq!(request.image, image);
        assert_eq!(request.quality.get(), 100);
        assert!(explorer.is_busy());
    }

    #[test]
    fn test_original_failure_is_blocking() {
        let mut explorer = Explorer::new(HandleRegistry::new(), 100);
        let image = ImageId::from("img123");
        explorer.open(image.clone());

        let err = ExploreError::FetchOriginalFailed("Failed to load image: 404 Not Found".into());
        assert_eq!(explorer.original_loaded(&image, Err(err.clone())), Err(err.clone()));

        assert_eq!(explorer.phase(), Phase::Failed);
        assert_eq!(explorer.blocking_error(), Some(&err));
        assert!(explorer.original_handle().is_none());
        assert!(settle_on(&mut explorer, 50).is_none());
        assert!(explorer.resolve_desired().is_none());
    }

    #[test]
    fn test_original_for_closed_image_is_ignored() {
        let mut explorer = Explorer::new(HandleRegistry::new(), 100);
        explorer.open(ImageId::from("old"));
        explorer.open(ImageId::from("new"));

        explorer.original_loaded(&ImageId::from("old"), Ok(gray_png())).unwrap();

        assert_eq!(explorer.phase(), Phase::LoadingOriginal);
        assert_eq!(explorer.registry().live_count(), 0);
    }

    #[test]
    fn test_debounce_collapses_rapid_changes() {
        let (mut explorer, _) = ready_explorer();

        let tickets: Vec<_> = [40, 70, 120, 180]
            .into_iter()
            .map(|value| explorer.set_parameter(value).unwrap())
            .collect();
        assert_eq!(explorer.phase(), Phase::Debouncing);

        let resolutions: Vec<_> = tickets
            .into_iter()
            .filter_map(|ticket| explorer.debounce_elapsed(ticket))
            .collect();

        assert_eq!(resolutions.len(), 1);
        let request = fetch(resolutions.into_iter().next());
        assert_eq!(request.quality.get(), 180);
    }

    #[test]
    fn test_stale_response_does_not_overwrite_newer_one() {
        let (mut explorer, _) = ready_explorer();

        let slow = fetch(settle_on(&mut explorer, 50));
        let fast = fetch(settle_on(&mut explorer, 200));

        let done = explorer.compression_finished(fast, Ok(Bytes::from_static(b"B200")));
        assert_eq!(done, Completion::Published(Quality::quantize(200).unwrap()));

        let late = explorer.compression_finished(slow, Ok(Bytes::from_static(b"B50")));
        assert_eq!(late, Completion::Superseded(Quality::quantize(50).unwrap()));

        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B200");
        assert_eq!(explorer.shown_quality().unwrap().get(), 200);
        // The late payload is still valid for its own key.
        assert_eq!(explorer.cache().entries_for(&ImageId::from("img123")), 2);
        assert_eq!(explorer.phase(), Phase::Ready);
    }

    #[test]
    fn test_cache_hit_needs_no_request() {
        let (mut explorer, _) = ready_explorer();

        let request = fetch(settle_on(&mut explorer, 100));
        explorer.compression_finished(request, Ok(Bytes::from_static(b"B100")));

        let request = fetch(settle_on(&mut explorer, 1));
        explorer.compression_finished(request, Ok(Bytes::from_static(b"B1")));

        let again = settle_on(&mut explorer, 97);
        assert_eq!(again, Some(Resolution::Cached(Quality::quantize(100).unwrap())));
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B100");
        assert!(!explorer.is_busy());
    }

    #[test]
    fn test_same_key_in_flight_is_not_requested_twice() {
        let (mut explorer, _) = ready_explorer();

        let first = fetch(settle_on(&mut explorer, 150));
        assert_eq!(settle_on(&mut explorer, 60), Some(Resolution::Fetch(CompressionRequest {
            image: ImageId::from("img123"),
            quality: Quality::quantize(60).unwrap(),
        })));
        let back = settle_on(&mut explorer, 148);
        assert_eq!(back, Some(Resolution::Pending(first.quality)));

        let done = explorer.compression_finished(first, Ok(Bytes::from_static(b"B150")));
        assert_eq!(done, Completion::Published(Quality::quantize(150).unwrap()));
    }

    #[test]
    fn test_failure_keeps_previous_image_and_allows_retry() {
        let (mut explorer, _) = ready_explorer();

        let request = fetch(settle_on(&mut explorer, 100));
        explorer.compression_finished(request, Ok(Bytes::from_static(b"B100")));

        let request = fetch(settle_on(&mut explorer, 250));
        let err = ExploreError::CompressionRequestFailed("Failed to compress image: 500".into());
        let done = explorer.compression_finished(request, Err(err.clone()));

        assert_eq!(done, Completion::Failed(Quality::quantize(250).unwrap()));
        assert_eq!(explorer.last_error(), Some(&err));
        assert!(explorer.blocking_error().is_none());
        assert_eq!(explorer.phase(), Phase::Ready);
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B100");

        // Moving the slider back onto the failed key tries the backend again.
        let retry = fetch(settle_on(&mut explorer, 252));
        let done = explorer.compression_finished(retry, Ok(Bytes::from_static(b"B250")));
        assert_eq!(done, Completion::Published(Quality::quantize(250).unwrap()));
        assert!(explorer.last_error().is_none());
    }

    #[test]
    fn test_failure_for_superseded_key_is_ignored() {
        let (mut explorer, _) = ready_explorer();

        let old = fetch(settle_on(&mut explorer, 30));
        explorer.set_parameter(290).unwrap();

        let done = explorer.compression_finished(
            old,
            Err(ExploreError::CompressionRequestFailed("timeout".into())),
        );

        assert_eq!(done, Completion::Superseded(Quality::quantize(30).unwrap()));
        assert!(explorer.last_error().is_none());
        assert_eq!(explorer.phase(), Phase::Debouncing);
    }

    #[test]
    fn test_invalid_parameter_is_recorded_not_applied() {
        let (mut explorer, _) = ready_explorer();

        let err = explorer.set_parameter(0).unwrap_err();

        assert_eq!(err, ExploreError::InvalidParameter(0));
        assert_eq!(explorer.last_error(), Some(&err));
        assert_eq!(explorer.slider_value(), 100);
        assert_eq!(explorer.phase(), Phase::Ready);
    }

    #[test]
    fn test_only_one_compressed_handle_stays_live() {
        let (mut explorer, _) = ready_explorer();

        for (i, value) in [10, 60, 110, 160, 210, 260].into_iter().enumerate() {
            let request = fetch(settle_on(&mut explorer, value));
            explorer.compression_finished(request, Ok(Bytes::from(vec![i as u8])));
            assert_eq!(explorer.registry().live_count_for(HandleRole::Compressed), 1);
        }
        // Cache hits mint fresh handles and retire the old ones too.
        settle_on(&mut explorer, 10);
        assert_eq!(explorer.registry().live_count_for(HandleRole::Compressed), 1);
        assert_eq!(explorer.registry().live_count(), 2);

        explorer.teardown();
        assert_eq!(explorer.registry().live_count(), 0);
        assert_eq!(explorer.phase(), Phase::Idle);
        assert_eq!(explorer.cache().len(), 6);
    }

    #[test]
    fn test_completion_after_teardown_is_cached_not_shown() {
        let (mut explorer, image) = ready_explorer();
        let request = fetch(settle_on(&mut explorer, 80));

        explorer.teardown();
        let done = explorer.compression_finished(request, Ok(Bytes::from_static(b"B80")));

        assert_eq!(done, Completion::Superseded(Quality::quantize(80).unwrap()));
        assert_eq!(explorer.registry().live_count(), 0);
        assert!(explorer.cache().contains(&image, Quality::quantize(80).unwrap()));
    }

    #[test]
    fn test_reset_resolves_default_immediately() {
        let (mut explorer, _) = ready_explorer();
        let pending = explorer.set_parameter(230).unwrap();

        let request = fetch(explorer.reset());

        assert_eq!(request.quality.get(), 100);
        assert_eq!(explorer.slider_value(), 100);
        assert!(explorer.debounce_elapsed(pending).is_none());
    }

    #[test]
    fn test_zone_follows_raw_slider() {
        let (mut explorer, _) = ready_explorer();
        assert_eq!(explorer.zone(), Zone::Optimal);

        explorer.set_parameter(101).unwrap();
        assert_eq!(explorer.zone(), Zone::MediumHigh);
        assert_eq!(explorer.desired_quality().get(), 100);
    }

    #[tokio::test]
    async fn test_end_to_end_with_backend() {
        let backend = FakeBackend::new("img123", Bytes::new())
            .with_payload(100, b"B100")
            .with_payload(1, b"B1");
        let mut explorer = Explorer::new(HandleRegistry::new(), 100);
        let image = ImageId::from("img123");
        explorer.open(image.clone());
        explorer.original_loaded(&image, Ok(gray_png())).unwrap();

        explorer.resolve_now(100, &backend).await.unwrap();
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B100");

        explorer.resolve_now(1, &backend).await.unwrap();
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B1");

        explorer.resolve_now(100, &backend).await.unwrap();
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B100");

        assert_eq!(backend.compress_calls(), 2);
        assert_eq!(backend.requested(), vec![100, 1]);
    }

    #[tokio::test]
    async fn test_resolve_now_failure_leaves_no_cache_entry() {
        let backend = FakeBackend::new("img123", Bytes::new());
        let (mut explorer, image) = ready_explorer();

        let err = explorer.resolve_now(40, &backend).await.unwrap_err();

        assert!(matches!(err, ExploreError::CompressionRequestFailed(_)));
        assert!(!explorer.cache().contains(&image, Quality::quantize(40).unwrap()));
        assert_eq!(explorer.last_error(), Some(&err));

        explorer.resolve_now(40, &backend).await.unwrap_err();
        assert_eq!(backend.compress_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_with_timers_sends_one_request() {
        let backend = FakeBackend::new("img123", Bytes::new()).with_payload(150, b"B150");
        let (mut explorer, _) = ready_explorer();
        let delay = std::time::Duration::from_millis(300);
        let start = tokio::time::Instant::now();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        for (at, value) in [(0, 10), (50, 60), (100, 110), (150, 150)] {
            tokio::time::sleep_until(start + std::time::Duration::from_millis(at)).await;
            let ticket = explorer.set_parameter(value).unwrap();
            let tx = tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(ticket);
            });
        }
        drop(tx);

        while let Some(ticket) = rx.recv().await {
            if let Some(Resolution::Fetch(request)) = explorer.debounce_elapsed(ticket) {
                let result = backend.compress(&request.image, request.quality).await;
                explorer.compression_finished(request, result);
            }
        }

        assert_eq!(backend.requested(), vec![150]);
        assert_eq!(explorer.compressed_handle().unwrap().bytes().as_ref(), b"B150");
        assert_eq!(explorer.phase(), Phase::Ready);
    }
}
