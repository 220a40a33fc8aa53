//! Incremental target → feature synchronization.
//!
//! The synchronizer owns the view state and (optionally) a feature store.
//! Every operation runs to completion on `&mut self`; with no store attached
//! the view state is still tracked but no feature work happens.

use std::collections::BTreeSet;

use foundation::ids::{FeatureKey, FeatureKind, TargetId};
use foundation::math::{Projection, WebMercator};
use foundation::time::{Clock, SystemClock};
use scene::components::{FeatureStyle, Geometry};
use scene::store::FeatureStore;
use tracing::{debug, trace, warn};

use crate::changes::ChangeSet;
use crate::config::OverlayConfig;
use crate::event::TargetEvent;
use crate::geometry::{marker_geometry, track_geometry, track_lines, vector_geometry};
use crate::labels::crosses_label_threshold;
use crate::stats::SyncStats;
use crate::symbology::{StyleContext, marker_style, track_style, vector_style, wind_direction};
use crate::target::{TargetSnapshot, TargetSource};
use crate::view::ViewState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The target source has no snapshot for an id the caller handed in.
    UnknownTarget(TargetId),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::UnknownTarget(id) => write!(f, "no snapshot for target {id}"),
        }
    }
}

impl std::error::Error for SyncError {}

pub struct TargetSynchronizer<S, P = WebMercator, C = SystemClock> {
    store: Option<S>,
    projection: P,
    clock: C,
    config: OverlayConfig,
    view: ViewState,
    stats: SyncStats,
}

impl<S: FeatureStore> TargetSynchronizer<S> {
    /// Web Mercator output, wall-clock staleness, no store attached yet.
    pub fn new(config: OverlayConfig) -> Self {
        Self::with_parts(config, WebMercator, SystemClock)
    }
}

impl<S, P, C> TargetSynchronizer<S, P, C>
where
    S: FeatureStore,
    P: Projection,
    C: Clock,
{
    pub fn with_parts(config: OverlayConfig, projection: P, clock: C) -> Self {
        Self {
            store: None,
            projection,
            clock,
            config,
            view: ViewState::default(),
            stats: SyncStats::default(),
        }
    }

    /// Seeds the view without running any refresh.
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// Attaches a store, returning the previously attached one.
    pub fn attach(&mut self, store: S) -> Option<S> {
        self.store.replace(store)
    }

    pub fn detach(&mut self) -> Option<S> {
        self.store.take()
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut S> {
        self.store.as_mut()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Single dispatch point for lifecycle events.
    pub fn apply<T>(&mut self, targets: &T, event: TargetEvent) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        debug!(
            event = event.name(),
            ids = event.id_count(),
            attached = self.store.is_some(),
            "applying target event"
        );
        self.stats.events += 1;
        match event {
            TargetEvent::UpdateIds(ids) => self.apply_updates(targets, &ids),
            TargetEvent::StaleIds(ids) => self.mark_stale(targets, &ids),
            TargetEvent::RemoveIds(ids) => {
                self.remove(&ids);
                Ok(())
            }
            TargetEvent::FilterChanged(filter) => self.on_filter_change(targets, filter),
            TargetEvent::ZoomChanged { previous, current } => {
                self.on_zoom_change(targets, previous, current)
            }
            TargetEvent::FocusChanged(focus) => self.on_focus_change(targets, focus),
            TargetEvent::VectorModeChanged(apparent) => {
                self.on_vector_mode_change(targets, apparent)
            }
            TargetEvent::TrackToggleChanged(show) => self.on_track_toggle(targets, show),
        }
    }

    /// Applies a batch of optional changes in canonical order.
    pub fn apply_changes<T>(&mut self, targets: &T, changes: ChangeSet) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        for event in changes.into_events() {
            self.apply(targets, event)?;
        }
        Ok(())
    }

    /// Moves to a new view snapshot, running only the refreshes its changed
    /// slots require.
    pub fn set_view<T>(&mut self, targets: &T, next: ViewState) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        for event in self.view.diff(&next) {
            self.apply(targets, event)?;
        }
        self.view = next;
        Ok(())
    }

    /// Reconciles marker, vector and track for each id against its snapshot.
    pub fn apply_updates<T>(&mut self, targets: &T, ids: &[TargetId]) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        let Some(mut pass) = self.pass() else {
            return Ok(());
        };
        for id in ids {
            let target = lookup(targets, id)?;
            pass.reconcile_marker(id, target);
            pass.reconcile_vector(id, target);
            pass.reconcile_track(id, target);
        }
        Ok(())
    }

    /// Restyles existing markers only; staleness changes the icon, nothing else.
    pub fn mark_stale<T>(&mut self, targets: &T, ids: &[TargetId]) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        let Some(mut pass) = self.pass() else {
            return Ok(());
        };
        for id in ids {
            let key = FeatureKey::marker(id);
            if !pass.store.contains(&key) {
                continue;
            }
            let target = lookup(targets, id)?;
            pass.restyle_marker(&key, target);
        }
        Ok(())
    }

    /// Drops all three features of each id. Absent features are ignored.
    pub fn remove(&mut self, ids: &[TargetId]) {
        let Some(mut pass) = self.pass() else {
            return;
        };
        for id in ids {
            for kind in FeatureKind::ALL {
                pass.discard(&FeatureKey::new(kind, id.clone()));
            }
        }
    }

    /// Removes every feature from the attached store.
    pub fn clear(&mut self) {
        if let Some(store) = self.store.as_mut() {
            let n = store.len() as u64;
            store.clear();
            debug!(removed = n, "cleared feature store");
        }
    }

    /// Marker restyling only when the label threshold is crossed; vectors and
    /// tracks on every change.
    pub fn on_zoom_change<T>(
        &mut self,
        targets: &T,
        previous: Option<f64>,
        current: f64,
    ) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        self.view.zoom = Some(current);
        if crosses_label_threshold(previous, current, self.config.label_min_zoom) {
            self.refresh_styles(targets)?;
        } else {
            trace!(?previous, current, "zoom stayed on one side of label threshold");
        }
        self.refresh_vectors(targets)?;
        self.refresh_tracks(targets)
    }

    pub fn on_filter_change<T>(
        &mut self,
        targets: &T,
        filter_ids: Option<BTreeSet<TargetId>>,
    ) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        self.view.filter_ids = filter_ids;
        self.refresh_styles(targets)?;
        self.refresh_vectors(targets)?;
        self.refresh_tracks(targets)
    }

    pub fn on_focus_change<T>(
        &mut self,
        targets: &T,
        focus_id: Option<TargetId>,
    ) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        self.view.focus_id = focus_id;
        self.refresh_styles(targets)
    }

    pub fn on_vector_mode_change<T>(&mut self, targets: &T, apparent: bool) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        self.view.vector_apparent = apparent;
        self.refresh_vectors(targets)
    }

    pub fn on_track_toggle<T>(&mut self, targets: &T, show: bool) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        self.view.show_track = show;
        self.refresh_tracks(targets)
    }

    /// Restyles every marker in the store from its current snapshot.
    pub fn refresh_styles<T>(&mut self, targets: &T) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        let Some(mut pass) = self.pass() else {
            return Ok(());
        };
        for key in pass.store.keys_of_kind(FeatureKind::Marker) {
            let target = lookup(targets, &key.target)?;
            pass.restyle_marker(&key, target);
        }
        Ok(())
    }

    /// Recomputes every vector for the current zoom and wind mode, and pulls
    /// the sibling marker back onto the current position.
    pub fn refresh_vectors<T>(&mut self, targets: &T) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        let Some(mut pass) = self.pass() else {
            return Ok(());
        };
        for key in pass.store.keys_of_kind(FeatureKind::Vector) {
            let target = lookup(targets, &key.target)?;
            pass.reconcile_vector(&key.target, target);
            if let Some(position) = target.position {
                let geometry = marker_geometry(position, pass.projection);
                pass.realign_marker(&FeatureKey::marker(&key.target), geometry);
            }
        }
        Ok(())
    }

    /// Restyles every track. Track geometry only changes through updates.
    pub fn refresh_tracks<T>(&mut self, targets: &T) -> Result<(), SyncError>
    where
        T: TargetSource + ?Sized,
    {
        let Some(mut pass) = self.pass() else {
            return Ok(());
        };
        for key in pass.store.keys_of_kind(FeatureKind::Track) {
            // Style does not read the snapshot, but an unknown id is still a
            // caller error.
            lookup(targets, &key.target)?;
            let style = track_style(&key.target, &pass.ctx);
            pass.restyle(&key, style);
        }
        Ok(())
    }

    fn pass(&mut self) -> Option<Pass<'_, S, P>> {
        let store = self.store.as_mut()?;
        Some(Pass {
            store,
            projection: &self.projection,
            ctx: StyleContext::new(&self.view, &self.config, self.clock.now()),
            stats: &mut self.stats,
        })
    }
}

fn lookup<'t, T>(targets: &'t T, id: &TargetId) -> Result<&'t TargetSnapshot, SyncError>
where
    T: TargetSource + ?Sized,
{
    targets.get(id).ok_or_else(|| {
        warn!(target_id = %id, "target source has no snapshot");
        SyncError::UnknownTarget(id.clone())
    })
}

/// Borrowed working set for one operation.
struct Pass<'a, S, P> {
    store: &'a mut S,
    projection: &'a P,
    ctx: StyleContext<'a>,
    stats: &'a mut SyncStats,
}

impl<S: FeatureStore, P: Projection> Pass<'_, S, P> {
    fn reconcile_marker(&mut self, id: &TargetId, target: &TargetSnapshot) {
        let key = FeatureKey::marker(id);
        match target.position {
            Some(position) => {
                let geometry = marker_geometry(position, self.projection);
                let style = marker_style(id, target, &self.ctx);
                self.upsert(key, geometry, style);
            }
            None => self.discard(&key),
        }
    }

    fn reconcile_vector(&mut self, id: &TargetId, target: &TargetSnapshot) {
        let key = FeatureKey::vector(id);
        let direction = wind_direction(target, self.ctx.view.vector_apparent);
        match (target.position, direction) {
            (Some(position), Some(direction)) => {
                let length = self.ctx.config.vector_length_m(self.ctx.view.zoom_level());
                let geometry = vector_geometry(position, direction, length, self.projection);
                let style = vector_style(id, &self.ctx);
                self.upsert(key, geometry, style);
            }
            _ => self.discard(&key),
        }
    }

    fn reconcile_track(&mut self, id: &TargetId, target: &TargetSnapshot) {
        let key = FeatureKey::track(id);
        if target.position.is_none() {
            self.discard(&key);
            return;
        }
        let style = track_style(id, &self.ctx);
        match self.store.feature_mut(&key) {
            Some(feature) => {
                feature.set_coordinates(track_lines(&target.track, self.projection));
                feature.set_style(style);
                self.stats.updated.bump(FeatureKind::Track);
            }
            None => {
                trace!(feature = %key, "adding feature");
                let geometry = track_geometry(&target.track, self.projection);
                self.store.add_feature(key, geometry, style);
                self.stats.added.bump(FeatureKind::Track);
            }
        }
    }

    fn restyle_marker(&mut self, key: &FeatureKey, target: &TargetSnapshot) {
        let style = marker_style(&key.target, target, &self.ctx);
        self.restyle(key, style);
    }

    fn upsert(&mut self, key: FeatureKey, geometry: Geometry, style: FeatureStyle) {
        let kind = key.kind;
        match self.store.feature_mut(&key) {
            Some(feature) => {
                feature.set_geometry(geometry);
                feature.set_style(style);
                self.stats.updated.bump(kind);
            }
            None => {
                trace!(feature = %key, "adding feature");
                self.store.add_feature(key, geometry, style);
                self.stats.added.bump(kind);
            }
        }
    }

    fn restyle(&mut self, key: &FeatureKey, style: FeatureStyle) {
        if let Some(feature) = self.store.feature_mut(key) {
            feature.set_style(style);
            self.stats.restyled.bump(key.kind);
        }
    }

    fn realign_marker(&mut self, key: &FeatureKey, geometry: Geometry) {
        if let Some(feature) = self.store.feature_mut(key) {
            feature.set_geometry(geometry);
            self.stats.updated.bump(key.kind);
        }
    }

    fn discard(&mut self, key: &FeatureKey) {
        if self.store.remove_feature(key).is_some() {
            trace!(feature = %key, "removed feature");
            self.stats.removed.bump(key.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SyncError, TargetSynchronizer};
    use crate::changes::ChangeSet;
    use crate::config::OverlayConfig;
    use crate::event::TargetEvent;
    use crate::symbology::{APPARENT_WIND_COLOR, TRUE_WIND_COLOR};
    use crate::target::{TargetSnapshot, Wind};
    use crate::view::ViewState;
    use foundation::ids::{FeatureKey, FeatureKind, TargetId};
    use foundation::math::{LonLat, MapCoord, destination_point};
    use foundation::time::{FixedClock, Timestamp};
    use pretty_assertions::assert_eq;
    use scene::components::Geometry;
    use scene::feature::Feature;
    use scene::store::{FeatureStore, MemoryFeatureStore};
    use std::collections::{BTreeSet, HashMap};
    use std::rc::Rc;

    const NOW: Timestamp = Timestamp(1_700_000_000_000);

    type Identity = fn(LonLat) -> MapCoord;
    type TestSync = TargetSynchronizer<MemoryFeatureStore, Identity, Rc<FixedClock>>;

    fn identity(p: LonLat) -> MapCoord {
        MapCoord::new(p.lon, p.lat)
    }

    fn config() -> OverlayConfig {
        let mut config = OverlayConfig::default();
        config.icons.focus = Some("focus.svg".to_string());
        config
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn detached(view: ViewState) -> (TestSync, Rc<FixedClock>) {
        init_tracing();
        let clock = Rc::new(FixedClock::new(NOW));
        let sync = TargetSynchronizer::with_parts(config(), identity as Identity, Rc::clone(&clock))
            .with_view(view);
        (sync, clock)
    }

    fn attached(zoom: f64) -> (TestSync, Rc<FixedClock>) {
        let (mut sync, clock) = detached(ViewState::default().with_zoom(zoom));
        sync.attach(MemoryFeatureStore::new());
        (sync, clock)
    }

    fn vessel(id: &str) -> TargetSnapshot {
        let mut t = TargetSnapshot::new(id);
        t.position = Some(LonLat::new(10.0, 20.0));
        t.orientation = 90.0;
        t.wind = Wind {
            direction: Some(200.0),
            awa: Some(10.0),
        };
        t.track = vec![vec![LonLat::new(9.9, 19.9), LonLat::new(10.0, 20.0)]];
        t.last_updated = NOW;
        t.name = Some("SEA WITCH".to_string());
        t
    }

    fn source(list: Vec<TargetSnapshot>) -> HashMap<TargetId, TargetSnapshot> {
        list.into_iter().map(|t| (t.id.clone(), t)).collect()
    }

    fn ids(list: &[&str]) -> Vec<TargetId> {
        list.iter().map(|s| TargetId::from(*s)).collect()
    }

    fn feature(sync: &TestSync, kind: FeatureKind, id: &str) -> Option<Feature> {
        let key = FeatureKey::new(kind, TargetId::from(id));
        sync.store().and_then(|s| s.feature(&key)).cloned()
    }

    fn opacity(sync: &TestSync, kind: FeatureKind, id: &str) -> f32 {
        feature(sync, kind, id).expect("feature").style().opacity()
    }

    fn marker_label(sync: &TestSync, id: &str) -> Option<String> {
        let f = feature(sync, FeatureKind::Marker, id)?;
        f.style().as_marker()?.text.as_ref().map(|t| t.text.clone())
    }

    fn marker_icon(sync: &TestSync, id: &str) -> String {
        let f = feature(sync, FeatureKind::Marker, id).expect("marker");
        f.style().as_marker().expect("marker style").icon.src.clone()
    }

    fn vector_end(sync: &TestSync, id: &str) -> MapCoord {
        match feature(sync, FeatureKind::Vector, id).expect("vector").geometry() {
            Geometry::LineString { vertices } => vertices[1],
            other => panic!("unexpected vector geometry {other:?}"),
        }
    }

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn update_creates_marker_vector_and_track() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply(&targets, TargetEvent::UpdateIds(ids(&["a"]))).expect("update");

        let store = sync.store().expect("store");
        assert_eq!(store.len(), 3);
        assert_eq!(
            feature(&sync, FeatureKind::Marker, "a").map(|f| f.geometry().clone()),
            Some(Geometry::point(MapCoord::new(10.0, 20.0)))
        );
        assert_eq!(
            feature(&sync, FeatureKind::Track, "a").map(|f| f.geometry().clone()),
            Some(Geometry::multi_line_string(vec![vec![
                MapCoord::new(9.9, 19.9),
                MapCoord::new(10.0, 20.0)
            ]]))
        );
        assert_eq!(sync.stats().added.total(), 3);
        assert_eq!(marker_label(&sync, "a").as_deref(), Some("SEA WITCH"));
    }

    #[test]
    fn repeated_update_is_idempotent() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a"), vessel("b")]);
        sync.apply_updates(&targets, &ids(&["a", "b"])).expect("first");
        let once: Vec<Feature> = sync.store().expect("store").iter().cloned().collect();

        sync.apply_updates(&targets, &ids(&["a", "b"])).expect("second");
        let twice: Vec<Feature> = sync.store().expect("store").iter().cloned().collect();

        assert_eq!(once.len(), 6);
        assert_eq!(twice.len(), 6);
        for (a, b) in once.iter().zip(&twice) {
            assert!(a.same_content(b), "{:?} changed", a.key());
        }
        assert_eq!(sync.stats().added.total(), 6);
        assert_eq!(sync.stats().updated.total(), 6);
    }

    #[test]
    fn remove_drops_every_kind_and_tolerates_absence() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a"), vessel("b")]);
        sync.apply_updates(&targets, &ids(&["a", "b"])).expect("update");

        sync.apply(&targets, TargetEvent::RemoveIds(ids(&["a", "never-seen"])))
            .expect("remove");
        for kind in FeatureKind::ALL {
            assert!(feature(&sync, kind, "a").is_none(), "{kind:?} survived");
            assert!(feature(&sync, kind, "b").is_some());
        }

        sync.remove(&ids(&["a"]));
        assert_eq!(sync.store().map(|s| s.len()), Some(3));
        assert_eq!(sync.stats().removed.total(), 3);
    }

    #[test]
    fn losing_position_removes_all_features() {
        let (mut sync, _) = attached(16.0);
        let mut targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        if let Some(t) = targets.get_mut(&TargetId::from("a")) {
            t.position = None;
        }
        sync.apply_updates(&targets, &ids(&["a"])).expect("update without fix");
        assert_eq!(sync.store().map(|s| s.len()), Some(0));
    }

    #[test]
    fn unresolvable_wind_means_no_vector() {
        let (mut sync, _) = attached(16.0);
        let mut calm = vessel("a");
        calm.wind = Wind::default();
        let targets = source(vec![calm]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        assert!(feature(&sync, FeatureKind::Marker, "a").is_some());
        assert!(feature(&sync, FeatureKind::Vector, "a").is_none());
        assert!(feature(&sync, FeatureKind::Track, "a").is_some());
    }

    #[test]
    fn north_wind_still_draws_a_vector() {
        let (mut sync, _) = attached(16.0);
        let mut t = vessel("a");
        t.wind = Wind {
            direction: Some(0.0),
            awa: None,
        };
        let targets = source(vec![t]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        let end = vector_end(&sync, "a");
        assert_close(end.x, 10.0, 1e-9);
        assert!(end.y > 20.0);
    }

    #[test]
    fn filter_hides_without_removing() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a"), vessel("b")]);
        sync.apply_updates(&targets, &ids(&["a", "b"])).expect("update");

        let only_b: BTreeSet<TargetId> = ids(&["b"]).into_iter().collect();
        sync.apply(&targets, TargetEvent::FilterChanged(Some(only_b)))
            .expect("filter");
        for kind in FeatureKind::ALL {
            assert_eq!(opacity(&sync, kind, "a"), 0.0, "{kind:?}");
            assert_eq!(opacity(&sync, kind, "b"), 1.0, "{kind:?}");
        }
        assert_eq!(sync.store().map(|s| s.len()), Some(6));

        sync.apply(&targets, TargetEvent::FilterChanged(Some(BTreeSet::new())))
            .expect("empty filter");
        for kind in FeatureKind::ALL {
            assert_eq!(opacity(&sync, kind, "a"), 1.0, "{kind:?}");
        }
    }

    #[test]
    fn zoom_within_label_band_skips_marker_restyle() {
        let (mut sync, _) = attached(9.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        assert_eq!(marker_label(&sync, "a").as_deref(), Some(""));
        let before = feature(&sync, FeatureKind::Marker, "a").expect("marker");
        let restyled = sync.stats().restyled.marker;

        sync.apply(
            &targets,
            TargetEvent::ZoomChanged {
                previous: Some(9.0),
                current: 9.5,
            },
        )
        .expect("zoom");
        assert_eq!(sync.stats().restyled.marker, restyled);
        let after = feature(&sync, FeatureKind::Marker, "a").expect("marker");
        assert_eq!(after.style(), before.style());
        assert_eq!(sync.view().zoom, Some(9.5));

        sync.apply(
            &targets,
            TargetEvent::ZoomChanged {
                previous: Some(9.5),
                current: 11.0,
            },
        )
        .expect("zoom");
        assert_eq!(sync.stats().restyled.marker, restyled + 1);
        assert_eq!(marker_label(&sync, "a").as_deref(), Some("SEA WITCH"));
    }

    #[test]
    fn first_zoom_always_restyles_markers() {
        let (mut sync, _) = attached(12.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        sync.on_zoom_change(&targets, None, 12.5).expect("zoom");
        assert_eq!(sync.stats().restyled.marker, 1);
    }

    #[test]
    fn every_zoom_change_refreshes_vector_visibility() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        assert_eq!(opacity(&sync, FeatureKind::Vector, "a"), 1.0);
        assert_eq!(opacity(&sync, FeatureKind::Track, "a"), 1.0);

        sync.on_zoom_change(&targets, Some(16.0), 14.0).expect("zoom");
        assert_eq!(opacity(&sync, FeatureKind::Vector, "a"), 0.0);
        assert_eq!(opacity(&sync, FeatureKind::Track, "a"), 0.0);
    }

    #[test]
    fn zoom_change_rescales_vector_length() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        let before = vector_end(&sync, "a");

        sync.on_zoom_change(&targets, Some(16.0), 18.0).expect("zoom");
        let length = sync.config().vector_length_m(18.0);
        let expected = destination_point(LonLat::new(10.0, 20.0), 200.0, length);
        let end = vector_end(&sync, "a");
        assert_close(end.x, expected.lon, 1e-12);
        assert_close(end.y, expected.lat, 1e-12);
        assert!(end != before);
    }

    #[test]
    fn set_view_back_to_unreported_zoom_restyles() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        assert_eq!(marker_label(&sync, "a").as_deref(), Some("SEA WITCH"));

        let next = ViewState {
            zoom: None,
            ..sync.view().clone()
        };
        sync.set_view(&targets, next.clone()).expect("view");
        assert_eq!(sync.view(), &next);
        assert_eq!(opacity(&sync, FeatureKind::Vector, "a"), 0.0);
        assert_eq!(opacity(&sync, FeatureKind::Track, "a"), 0.0);
        assert_eq!(marker_label(&sync, "a").as_deref(), Some(""));
    }

    #[test]
    fn dateline_track_is_unwrapped() {
        let (mut sync, _) = attached(16.0);
        let mut t = vessel("a");
        t.position = Some(LonLat::new(-179.5, 10.0));
        t.track = vec![vec![LonLat::new(179.5, 10.0), LonLat::new(-179.5, 10.0)]];
        let targets = source(vec![t]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        assert_eq!(
            feature(&sync, FeatureKind::Track, "a").map(|f| f.geometry().clone()),
            Some(Geometry::multi_line_string(vec![vec![
                MapCoord::new(179.5, 10.0),
                MapCoord::new(180.5, 10.0)
            ]]))
        );
    }

    #[test]
    fn vector_mode_switch_recomputes_direction() {
        let (mut sync, _) = detached(
            ViewState::default()
                .with_zoom(16.0)
                .with_vector_apparent(true),
        );
        sync.attach(MemoryFeatureStore::new());
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        let length = sync.config().vector_length_m(16.0);
        let origin = LonLat::new(10.0, 20.0);
        let apparent = destination_point(origin, 100.0, length);
        let end = vector_end(&sync, "a");
        assert_close(end.x, apparent.lon, 1e-12);
        assert_close(end.y, apparent.lat, 1e-12);
        assert_eq!(
            feature(&sync, FeatureKind::Vector, "a")
                .and_then(|f| f.style().as_stroke().map(|s| s.color)),
            Some(APPARENT_WIND_COLOR)
        );

        let marker_before = feature(&sync, FeatureKind::Marker, "a").expect("marker");
        sync.apply(&targets, TargetEvent::VectorModeChanged(false))
            .expect("mode");
        let truth = destination_point(origin, 200.0, length);
        let end = vector_end(&sync, "a");
        assert_close(end.x, truth.lon, 1e-12);
        assert_close(end.y, truth.lat, 1e-12);
        assert_eq!(
            feature(&sync, FeatureKind::Vector, "a")
                .and_then(|f| f.style().as_stroke().map(|s| s.color)),
            Some(TRUE_WIND_COLOR)
        );
        let marker_after = feature(&sync, FeatureKind::Marker, "a").expect("marker");
        assert_eq!(marker_after.style(), marker_before.style());
    }

    #[test]
    fn vector_dropped_when_new_mode_has_no_wind() {
        let (mut sync, _) = attached(16.0);
        let mut t = vessel("a");
        t.wind.awa = None;
        let targets = source(vec![t]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        assert!(feature(&sync, FeatureKind::Vector, "a").is_some());

        sync.on_vector_mode_change(&targets, true).expect("mode");
        assert!(feature(&sync, FeatureKind::Vector, "a").is_none());
        assert!(feature(&sync, FeatureKind::Marker, "a").is_some());
    }

    #[test]
    fn refresh_vectors_realigns_moved_marker() {
        let (mut sync, _) = attached(16.0);
        let mut targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        if let Some(t) = targets.get_mut(&TargetId::from("a")) {
            t.position = Some(LonLat::new(11.0, 21.0));
        }
        sync.on_zoom_change(&targets, Some(16.0), 16.5).expect("zoom");

        assert_eq!(
            feature(&sync, FeatureKind::Marker, "a").map(|f| f.geometry().clone()),
            Some(Geometry::point(MapCoord::new(11.0, 21.0)))
        );
        match feature(&sync, FeatureKind::Vector, "a").map(|f| f.geometry().clone()) {
            Some(Geometry::LineString { vertices }) => {
                assert_eq!(vertices[0], MapCoord::new(11.0, 21.0))
            }
            other => panic!("unexpected vector {other:?}"),
        }
        // Track geometry only follows explicit updates.
        assert_eq!(
            feature(&sync, FeatureKind::Track, "a").map(|f| f.geometry().vertex_count()),
            Some(2)
        );
    }

    #[test]
    fn stale_targets_switch_to_inactive_icon() {
        let (mut sync, clock) = attached(16.0);
        let mut old = vessel("old");
        old.last_updated = Timestamp(NOW.0 - sync.config().inactive_time_ms - 1);
        let targets = source(vec![vessel("a"), old]);
        sync.apply_updates(&targets, &ids(&["a", "old"])).expect("update");
        assert_eq!(marker_icon(&sync, "old"), "ais_inactive.svg");
        assert_eq!(marker_icon(&sync, "a"), "ais_active.svg");

        let vector_rev = feature(&sync, FeatureKind::Vector, "a").map(|f| f.revision());
        let track_rev = feature(&sync, FeatureKind::Track, "a").map(|f| f.revision());
        clock.advance(sync.config().inactive_time_ms);
        sync.apply(&targets, TargetEvent::StaleIds(ids(&["a", "gone"])))
            .expect("stale");
        assert_eq!(marker_icon(&sync, "a"), "ais_inactive.svg");
        assert_eq!(feature(&sync, FeatureKind::Vector, "a").map(|f| f.revision()), vector_rev);
        assert_eq!(feature(&sync, FeatureKind::Track, "a").map(|f| f.revision()), track_rev);
    }

    #[test]
    fn focus_and_track_toggle_touch_only_their_kinds() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        let track_rev = feature(&sync, FeatureKind::Track, "a").map(|f| f.revision());

        sync.apply(&targets, TargetEvent::FocusChanged(Some(TargetId::from("a"))))
            .expect("focus");
        assert_eq!(marker_icon(&sync, "a"), "focus.svg");
        assert_eq!(feature(&sync, FeatureKind::Track, "a").map(|f| f.revision()), track_rev);

        let marker_rev = feature(&sync, FeatureKind::Marker, "a").map(|f| f.revision());
        sync.apply(&targets, TargetEvent::TrackToggleChanged(false))
            .expect("toggle");
        assert_eq!(opacity(&sync, FeatureKind::Track, "a"), 0.0);
        assert_eq!(opacity(&sync, FeatureKind::Vector, "a"), 1.0);
        assert_eq!(feature(&sync, FeatureKind::Marker, "a").map(|f| f.revision()), marker_rev);
    }

    #[test]
    fn detached_synchronizer_is_a_no_op_but_tracks_view() {
        let (mut sync, _) = detached(ViewState::default());
        let targets = source(vec![vessel("a")]);
        sync.apply(&targets, TargetEvent::UpdateIds(ids(&["a"])))
            .expect("update");
        sync.apply(&targets, TargetEvent::ZoomChanged { previous: None, current: 12.0 })
            .expect("zoom");
        sync.remove(&ids(&["a"]));
        sync.clear();
        assert!(sync.store().is_none());
        assert_eq!(sync.view().zoom, Some(12.0));
        assert_eq!(sync.stats().added.total(), 0);

        sync.attach(MemoryFeatureStore::new());
        assert_eq!(sync.store().map(|s| s.len()), Some(0));
    }

    #[test]
    fn unknown_target_is_reported() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        let err = sync
            .apply_updates(&targets, &ids(&["a", "ghost"]))
            .expect_err("ghost");
        assert_eq!(err, SyncError::UnknownTarget(TargetId::from("ghost")));
        assert_eq!(err.to_string(), "no snapshot for target ghost");
        // Ids before the failure stay applied.
        assert!(feature(&sync, FeatureKind::Marker, "a").is_some());
    }

    #[test]
    fn set_view_runs_only_changed_slots() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        let events = sync.stats().events;

        let next = sync.view().clone().with_show_track(false);
        sync.set_view(&targets, next.clone()).expect("view");
        assert_eq!(sync.view(), &next);
        assert_eq!(sync.stats().events, events + 1);
        assert_eq!(opacity(&sync, FeatureKind::Track, "a"), 0.0);

        sync.set_view(&targets, next).expect("same view");
        assert_eq!(sync.stats().events, events + 1);
    }

    #[test]
    fn change_set_removes_before_updating() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a")]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");

        let changes = ChangeSet {
            update_ids: Some(ids(&["a"])),
            remove_ids: Some(ids(&["a"])),
            ..ChangeSet::default()
        };
        sync.apply_changes(&targets, changes).expect("changes");
        assert_eq!(sync.store().map(|s| s.len()), Some(3));
        assert_eq!(sync.stats().removed.total(), 3);
    }

    #[test]
    fn default_parts_project_to_web_mercator() {
        let mut sync = TargetSynchronizer::<MemoryFeatureStore>::new(OverlayConfig::default());
        sync.attach(MemoryFeatureStore::new());
        let mut t = vessel("a");
        t.position = Some(LonLat::new(0.0, 0.0));
        let targets = source(vec![t]);
        sync.apply_updates(&targets, &ids(&["a"])).expect("update");
        let marker = sync
            .store()
            .and_then(|s| s.feature(&FeatureKey::marker(&TargetId::from("a"))))
            .map(|f| f.geometry().clone());
        match marker {
            Some(Geometry::Point { position }) => {
                assert_close(position.x, 0.0, 1e-6);
                assert_close(position.y, 0.0, 1e-6);
            }
            other => panic!("unexpected marker {other:?}"),
        }
    }

    #[test]
    fn clear_empties_store() {
        let (mut sync, _) = attached(16.0);
        let targets = source(vec![vessel("a"), vessel("b")]);
        sync.apply_updates(&targets, &ids(&["a", "b"])).expect("update");
        sync.clear();
        assert_eq!(sync.store().map(|s| s.is_empty()), Some(true));
        assert_eq!(sync.detach().map(|s| s.len()), Some(0));
        assert!(sync.store().is_none());
    }
}
