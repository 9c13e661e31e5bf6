//! Keyed registry of shared elements: match resolution, global transition
//! state and the overlay render list.
//!
//! - `KeyGroup`: all instances of one key, `found_match`, target provider,
//!   current bounds and velocity tracking
//! - `ElementInstance`: one registration with its
//!   [`TransitionController`]
//! - `OverlayList`: draw order of overlay content
//!
//! Groups emptied by [`SharedTransitionScope::unregister`] are only marked;
//! they are swept at the end of the next [`resolve`] or [`on_frame`] so no
//! pass mutates the group map while iterating it.
//!
//! [`resolve`]: SharedTransitionScope::resolve
//! [`on_frame`]: SharedTransitionScope::on_frame

mod group;
mod instance;
mod observer;
mod overlay;

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use glam::Vec2;
use group::KeyGroup;
use instance::ElementInstance;
pub use instance::{
    ClipShape, InstanceConfig, InstanceSettings, OverlayClip, PlaceholderSize,
    ResolvedClip, VelocitySource,
};
use observer::Observable;
pub use observer::{Listener, ListenerId};
use overlay::OverlayList;
pub use overlay::OverlaySurface;
use rustc_hash::FxHashMap;

use crate::animation::animator::TransitionController;
use crate::animation::transition::{shared, SharedBoundsTransform, SpringTransform};
use crate::error::TransitionError;
use crate::options::TransitionOptions;
use crate::util::rect::Rect;

/// Opaque handle of a registered element instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub(crate) u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn key_label<K: fmt::Debug>(key: &K) -> String {
    format!("{key:?}")
}

/// Registry of every shared element instance, grouped by logical key.
///
/// Driven once per frame by the host, on one thread:
/// [`resolve`](Self::resolve) after visibility may have changed,
/// [`on_lookahead_result`](Self::on_lookahead_result) for each measured
/// instance, [`on_frame`](Self::on_frame), then
/// [`draw_overlay`](Self::draw_overlay).
pub struct SharedTransitionScope<K> {
    groups: FxHashMap<K, KeyGroup>,
    instances: FxHashMap<InstanceId, ElementInstance<K>>,
    overlay: OverlayList,
    transition_active: Observable,
    options: TransitionOptions,
    default_transform: SharedBoundsTransform,
    next_instance: u64,
    next_listener: u64,
}

impl<K: Eq + Hash + Clone + fmt::Debug> SharedTransitionScope<K> {
    /// Scope with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::build(TransitionOptions::default())
    }

    /// Scope with validated `options`.
    pub fn with_options(options: TransitionOptions) -> Result<Self, TransitionError> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: TransitionOptions) -> Self {
        let default_transform = shared(SpringTransform(options.spring.spec()));
        Self {
            groups: FxHashMap::default(),
            instances: FxHashMap::default(),
            overlay: OverlayList::default(),
            transition_active: Observable::new(false),
            options,
            default_transform,
            next_instance: 1,
            next_listener: 1,
        }
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &TransitionOptions {
        &self.options
    }

    /// Replace the options. The default spring applies to instances
    /// registered afterwards; existing groups keep their multipliers.
    pub fn set_options(&mut self, options: TransitionOptions) -> Result<(), TransitionError> {
        options.validate()?;
        self.default_transform = shared(SpringTransform(options.spring.spec()));
        self.options = options;
        Ok(())
    }

    /// Set the time dilation applied to every animation.
    pub fn set_duration_scale(&mut self, scale: f32) -> Result<(), TransitionError> {
        if scale.is_nan() || scale < 0.0 {
            return Err(TransitionError::NegativeDurationScale(scale));
        }
        self.options.debug.duration_scale = scale;
        Ok(())
    }

    // -- Registration ------------------------------------------------------

    /// Register an instance of `key`.
    ///
    /// The visibility predicate is read once now; an instance that is
    /// already visible counts as becoming visible. Call
    /// [`resolve`](Self::resolve) before the next layout pass.
    pub fn register(&mut self, key: K, config: InstanceConfig) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance += 1;

        let InstanceConfig {
            visible,
            bounds_transform,
            initial_velocity,
            settings,
        } = config;
        let transform =
            bounds_transform.unwrap_or_else(|| Arc::clone(&self.default_transform));
        let controller = TransitionController::new(visible, transform);

        let multiplier = self.options.velocity.initial_velocity_multiplier;
        let group = self
            .groups
            .entry(key.clone())
            .or_insert_with(|| KeyGroup::new(multiplier));
        group.marked_for_prune = false;
        group.instances.push(id);
        if let Some(source) = initial_velocity {
            group.last_reported_velocity = Some(source);
        }

        let instances = &self.instances;
        self.overlay.insert(id, |other| {
            instances.get(&other).is_some_and(|instance| instance.key == key)
        });

        log::debug!("registered shared element {id} for {key:?}");
        let _ = self
            .instances
            .insert(id, ElementInstance::new(key, controller, settings));
        id
    }

    /// Remove an instance, discarding its controller.
    ///
    /// If it was its group's target provider the group loses its target;
    /// the next [`resolve`](Self::resolve) drops the match. An emptied
    /// group is pruned at the end of the next pass.
    pub fn unregister(&mut self, id: InstanceId) -> Result<(), TransitionError> {
        let instance = self
            .instances
            .remove(&id)
            .ok_or(TransitionError::UnknownInstance(id))?;
        self.overlay.remove(id);

        for other in self.instances.values_mut() {
            if other.settings.parent == Some(id) {
                other.settings.parent = None;
                self.overlay.mark_dirty();
            }
        }

        if let Some(group) = self.groups.get_mut(&instance.key) {
            group.instances.retain(|member| *member != id);
            if group.provider == Some(id) {
                group.provider = None;
                group.target_bounds = None;
            }
            if group.instances.is_empty() {
                group.marked_for_prune = true;
            }
        }
        log::debug!("unregistered shared element {id} for {:?}", instance.key);
        Ok(())
    }

    /// Change an instance's settings.
    pub fn update_instance(
        &mut self,
        id: InstanceId,
        update: impl FnOnce(&mut InstanceSettings),
    ) -> Result<(), TransitionError> {
        let instance = self.instance_mut(id)?;
        update(&mut instance.settings);
        self.overlay.mark_dirty();
        Ok(())
    }

    /// Replace an instance's bounds transform.
    pub fn set_bounds_transform(
        &mut self,
        id: InstanceId,
        transform: SharedBoundsTransform,
    ) -> Result<(), TransitionError> {
        self.instance_mut(id)?.controller.set_bounds_transform(transform);
        Ok(())
    }

    /// Report a hand-off velocity source for the instance's group.
    pub fn set_initial_velocity(
        &mut self,
        id: InstanceId,
        source: VelocitySource,
    ) -> Result<(), TransitionError> {
        let key = self.instance(id)?.key.clone();
        if let Some(group) = self.groups.get_mut(&key) {
            group.last_reported_velocity = Some(source);
        }
        Ok(())
    }

    /// Record that the draw collaborator has content for this instance.
    pub fn mark_first_frame_drawn(&mut self, id: InstanceId) -> Result<(), TransitionError> {
        self.instance_mut(id)?.first_frame_drawn = true;
        Ok(())
    }

    /// Unregister everything and drop every listener.
    pub fn dispose(&mut self) {
        self.transition_active.clear_listeners();
        for group in self.groups.values_mut() {
            group.found_match.clear_listeners();
        }
        let _ = self.transition_active.set(false);
        self.groups.clear();
        self.instances.clear();
        self.overlay.clear();
        log::debug!("shared transition scope disposed");
    }

    // -- Frame protocol ----------------------------------------------------

    /// Resolution pass: snapshot every visibility predicate once, pick each
    /// group's target provider, recompute matches and the global
    /// transition state, then sweep emptied groups.
    pub fn resolve(&mut self) {
        for instance in self.instances.values_mut() {
            instance.visible = instance.controller.is_target();
        }

        let active = self.transition_active.get();
        for (key, group) in &mut self.groups {
            let _ = group.update_target_bounds_provider(key, &self.instances);
            group.update_match(key, &self.instances, active);
        }

        self.update_transition_activeness();
        self.sweep();
    }

    /// Layout reported stable bounds for `id`.
    ///
    /// Only the group's target provider drives animation: when its bounds
    /// differ from the last target, or a member still holds a request
    /// during a matched transition, every member's controller follows the
    /// target (starting a motion if a request is pending). Without a
    /// running matched transition the group's bounds settle there instead.
    pub fn on_lookahead_result(
        &mut self,
        id: InstanceId,
        size: Vec2,
        position: Vec2,
    ) -> Result<(), TransitionError> {
        let target = Rect::from_offset_size(position, size);
        let instance = self.instance_mut(id)?;
        instance.lookahead = Some(target);
        let key = instance.key.clone();

        let active = self.transition_active.get();
        let Some(group) = self.groups.get_mut(&key) else {
            return Ok(());
        };
        if group.provider != Some(id) {
            return Ok(());
        }
        let animating = active && group.found_match();
        if group.target_bounds == Some(target)
            && !(animating && group.has_pending_request(&self.instances))
        {
            return Ok(());
        }
        group.target_bounds = Some(target);

        if animating {
            let current = *group.current_bounds.get_or_insert(target);
            let group = &*group;
            for member in &group.instances {
                let Some(instance) = self.instances.get_mut(member) else {
                    continue;
                };
                let accept = instance.settings.accept_incoming_initial_velocity;
                instance.controller.animate(current, target, true, || {
                    if accept {
                        group.incoming_velocity()
                    } else {
                        None
                    }
                });
            }
        } else {
            group.current_bounds = Some(target);
            for member in &group.instances {
                if let Some(instance) = self.instances.get_mut(member) {
                    instance.controller.settle(target);
                }
            }
        }
        Ok(())
    }

    /// Frame tick: advance every animator, refresh each matched group's
    /// current bounds, sample velocity trackers, then recompute the global
    /// transition state.
    pub fn on_frame(&mut self, frame_nanos: i64) {
        let scale = self.options.debug.duration_scale;
        for instance in self.instances.values_mut() {
            let _ = instance.controller.on_frame(frame_nanos, scale);
        }

        let active = self.transition_active.get();
        let frame_millis = frame_nanos / 1_000_000;
        for group in self.groups.values_mut() {
            if active && group.found_match() {
                if let Some(bounds) = group.animated_bounds(&self.instances) {
                    group.current_bounds = Some(bounds);
                }
            }
            group.sample_velocity(frame_millis);
        }

        self.update_transition_activeness();
        self.sweep();
    }

    /// Draw every instance that belongs in the overlay, in z-order.
    pub fn draw_overlay(&mut self, surface: &mut impl OverlaySurface) -> Result<(), TransitionError> {
        let instances = &self.instances;
        self.overlay.sort_if_dirty(|id| {
            instances.get(&id).map_or(0.0, ElementInstance::sort_key)
        });

        for &id in self.overlay.entries() {
            let Some(instance) = self.instances.get(&id) else {
                continue;
            };
            if !instance.first_frame_drawn || !self.renders_in_overlay(id, instance) {
                continue;
            }
            let bounds = self
                .groups
                .get(&instance.key)
                .and_then(|group| group.current_bounds)
                .ok_or_else(|| TransitionError::CurrentBoundsMissing(key_label(&instance.key)))?;
            surface.draw_layer(id, bounds.top_left(), self.resolve_clip(id, bounds));
        }
        Ok(())
    }

    fn update_transition_activeness(&mut self) {
        let active = self
            .groups
            .values()
            .any(|group| group.is_animating(&self.instances));
        if self.transition_active.set(active) {
            log::debug!(
                "shared transition {}",
                if active { "started" } else { "finished" }
            );
            if !active {
                for group in self.groups.values_mut() {
                    group.on_shared_transition_finished(&self.instances);
                }
            }
        }
        for (key, group) in &mut self.groups {
            group.update_match(key, &self.instances, active);
        }
    }

    fn sweep(&mut self) {
        self.groups.retain(|key, group| {
            if group.marked_for_prune && group.instances.is_empty() {
                let _ = group.found_match.set(false);
                log::debug!("pruned shared element group {key:?}");
                false
            } else {
                true
            }
        });
    }

    // -- Queries -----------------------------------------------------------

    /// Whether any matched group has a running animation.
    #[must_use]
    pub fn is_transition_active(&self) -> bool {
        self.transition_active.get()
    }

    /// Whether `key`'s group is paired for the current transition.
    #[must_use]
    pub fn is_match_found(&self, key: &K) -> bool {
        self.groups.get(key).is_some_and(KeyGroup::found_match)
    }

    /// Instance whose bounds are `key`'s destination.
    #[must_use]
    pub fn target_provider(&self, key: &K) -> Option<InstanceId> {
        self.groups.get(key).and_then(|group| group.provider)
    }

    /// Last destination fanned out for `key`.
    #[must_use]
    pub fn target_bounds(&self, key: &K) -> Option<Rect> {
        self.groups.get(key).and_then(|group| group.target_bounds)
    }

    /// Live bounds of `key`'s group.
    #[must_use]
    pub fn current_bounds(&self, key: &K) -> Option<Rect> {
        self.groups.get(key).and_then(|group| group.current_bounds)
    }

    /// Displayed rectangle of an instance, only while a transition is
    /// active; otherwise callers use plain layout bounds.
    #[must_use]
    pub fn animated_bounds(&self, id: InstanceId) -> Option<Rect> {
        self.instances
            .get(&id)
            .and_then(|instance| instance.controller.value(self.is_transition_active()))
    }

    /// Whether the instance's animator is running or about to start.
    #[must_use]
    pub fn is_instance_running(&self, id: InstanceId) -> bool {
        self.instances
            .get(&id)
            .is_some_and(|instance| instance.controller.is_running())
    }

    /// Stable bounds from the last layout pass.
    pub fn lookahead_bounds(&self, id: InstanceId) -> Result<Rect, TransitionError> {
        let instance = self.instance(id)?;
        instance
            .lookahead
            .ok_or_else(|| TransitionError::LookaheadMissing(key_label(&instance.key)))
    }

    /// Whether the instance currently draws in the overlay.
    pub fn should_render_in_overlay(&self, id: InstanceId) -> Result<bool, TransitionError> {
        let instance = self.instance(id)?;
        Ok(self.renders_in_overlay(id, instance))
    }

    /// Whether the instance draws in its own place in the layout.
    pub fn should_render_in_place(&self, id: InstanceId) -> Result<bool, TransitionError> {
        let instance = self.instance(id)?;
        let found_match = self.is_match_found(&instance.key);
        Ok(!found_match
            || (!self.renders_in_overlay(id, instance)
                && self.renders_based_on_target(id, instance)))
    }

    /// Layout space the instance reserves, given its measured content size.
    pub fn placeholder_size(
        &self,
        id: InstanceId,
        content_size: Vec2,
    ) -> Result<Vec2, TransitionError> {
        let instance = self.instance(id)?;
        let animated = self
            .groups
            .get(&instance.key)
            .filter(|group| self.is_transition_active() && group.found_match())
            .and_then(|group| group.current_bounds);
        Ok(instance.settings.placeholder_size.resolve(content_size, animated))
    }

    /// Settings of an instance.
    pub fn instance_settings(&self, id: InstanceId) -> Result<&InstanceSettings, TransitionError> {
        Ok(&self.instance(id)?.settings)
    }

    /// Registered instance ids of `key`, in registration order.
    #[must_use]
    pub fn instances_of(&self, key: &K) -> &[InstanceId] {
        self.groups
            .get(key)
            .map(|group| group.instances.as_slice())
            .unwrap_or_default()
    }

    /// Number of live key groups (including ones awaiting the sweep).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of registered instances.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn renders_based_on_target(&self, id: InstanceId, instance: &ElementInstance<K>) -> bool {
        self.target_provider(&instance.key) == Some(id)
            || !instance.settings.render_only_when_visible
    }

    fn renders_in_overlay(&self, id: InstanceId, instance: &ElementInstance<K>) -> bool {
        self.options.debug.render_in_overlay
            && instance.settings.render_in_overlay_during_transition
            && self.is_match_found(&instance.key)
            && self.renders_based_on_target(id, instance)
    }

    fn resolve_clip(&self, id: InstanceId, bounds: Rect) -> Option<ResolvedClip> {
        let mut current = id;
        let mut own_bounds = Some(bounds);
        // A parent chain can never be longer than the instance count.
        for _ in 0..=self.instances.len() {
            let instance = self.instances.get(&current)?;
            match instance.settings.overlay_clip {
                OverlayClip::None => return None,
                OverlayClip::Shape(shape) => {
                    let bounds = own_bounds
                        .or_else(|| self.current_bounds(&instance.key))
                        .or(instance.lookahead)?;
                    return Some(ResolvedClip { shape, bounds });
                }
                OverlayClip::Parent => {
                    current = instance.settings.parent?;
                    own_bounds = None;
                }
            }
        }
        None
    }

    // -- Velocity ----------------------------------------------------------

    /// Start sampling `key`'s current bounds every frame.
    pub fn begin_velocity_tracking(&mut self, key: &K) -> Result<(), TransitionError> {
        let group = self
            .groups
            .get_mut(key)
            .ok_or_else(|| TransitionError::UnknownKey(key_label(key)))?;
        if group.tracking {
            return Err(TransitionError::AlreadyTracking(key_label(key)));
        }
        group.tracking = true;
        Ok(())
    }

    /// Stop sampling and forget the samples. No-op if not tracking.
    pub fn stop_velocity_tracking(&mut self, key: &K) {
        if let Some(group) = self.groups.get_mut(key) {
            group.stop_velocity_tracking();
        }
    }

    /// Tracked velocity of `key`'s bounds, scaled by its multiplier.
    #[must_use]
    pub fn velocity(&self, key: &K) -> Option<Rect> {
        self.groups.get(key).map(KeyGroup::velocity)
    }

    /// Set the velocity multiplier of `key`; `None` restores the default.
    pub fn set_initial_velocity_multiplier(
        &mut self,
        key: &K,
        multiplier: Option<f32>,
    ) -> Result<(), TransitionError> {
        self.groups
            .get_mut(key)
            .ok_or_else(|| TransitionError::UnknownKey(key_label(key)))?
            .set_velocity_multiplier(multiplier);
        Ok(())
    }

    // -- Observation -------------------------------------------------------

    fn next_listener_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }

    /// Call `listener` whenever the global transition state flips.
    pub fn observe_transition_active(
        &mut self,
        listener: impl FnMut(bool) + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id();
        self.transition_active.subscribe(id, Box::new(listener));
        id
    }

    /// Call `listener` whenever `key`'s match state flips. `None` if the
    /// key has no group.
    pub fn observe_match(
        &mut self,
        key: &K,
        listener: impl FnMut(bool) + 'static,
    ) -> Option<ListenerId> {
        if !self.groups.contains_key(key) {
            return None;
        }
        let id = self.next_listener_id();
        self.groups
            .get_mut(key)?
            .found_match
            .subscribe(id, Box::new(listener));
        Some(id)
    }

    /// Remove a listener. Returns whether it was found.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        if self.transition_active.unsubscribe(id) {
            return true;
        }
        self.groups
            .values_mut()
            .any(|group| group.found_match.unsubscribe(id))
    }

    fn instance(&self, id: InstanceId) -> Result<&ElementInstance<K>, TransitionError> {
        self.instances
            .get(&id)
            .ok_or(TransitionError::UnknownInstance(id))
    }

    fn instance_mut(
        &mut self,
        id: InstanceId,
    ) -> Result<&mut ElementInstance<K>, TransitionError> {
        self.instances
            .get_mut(&id)
            .ok_or(TransitionError::UnknownInstance(id))
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug> Default for SharedTransitionScope<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for SharedTransitionScope<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTransitionScope")
            .field("groups", &self.groups)
            .field("instances", &self.instances.len())
            .field("transition_active", &self.transition_active.get())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;

    const FRAME: i64 = 16_000_000;

    #[derive(Default)]
    struct Recorder {
        draws: Vec<(InstanceId, Vec2, Option<ResolvedClip>)>,
    }

    impl OverlaySurface for Recorder {
        fn draw_layer(&mut self, instance: InstanceId, offset: Vec2, clip: Option<ResolvedClip>) {
            self.draws.push((instance, offset, clip));
        }
    }

    fn flag(value: bool) -> Rc<Cell<bool>> {
        Rc::new(Cell::new(value))
    }

    fn config(visible: &Rc<Cell<bool>>) -> InstanceConfig {
        let reader = Rc::clone(visible);
        InstanceConfig::new(move || reader.get())
    }

    fn report(scope: &mut SharedTransitionScope<&'static str>, id: InstanceId, bounds: Rect) {
        scope
            .on_lookahead_result(id, bounds.size(), bounds.top_left())
            .unwrap();
    }

    #[test]
    fn test_unknown_instance_errors() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let id = scope.register("a", config(&flag(false)));
        scope.unregister(id).unwrap();
        assert!(matches!(
            scope.unregister(id),
            Err(TransitionError::UnknownInstance(_))
        ));
        assert!(matches!(
            scope.lookahead_bounds(id),
            Err(TransitionError::UnknownInstance(_))
        ));
    }

    #[test]
    fn test_lookahead_missing_before_layout() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let id = scope.register("a", config(&flag(true)));
        assert!(matches!(
            scope.lookahead_bounds(id),
            Err(TransitionError::LookaheadMissing(_))
        ));
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        report(&mut scope, id, bounds);
        assert_eq!(scope.lookahead_bounds(id).unwrap(), bounds);
    }

    #[test]
    fn test_emptied_group_is_swept_on_next_pass() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let id = scope.register("a", config(&flag(true)));
        scope.resolve();
        scope.unregister(id).unwrap();
        assert_eq!(scope.group_count(), 1);
        scope.resolve();
        assert_eq!(scope.group_count(), 0);
    }

    #[test]
    fn test_re_registering_cancels_prune() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let first = scope.register("a", config(&flag(true)));
        scope.unregister(first).unwrap();
        let second = scope.register("a", config(&flag(true)));
        scope.resolve();
        assert_eq!(scope.instances_of(&"a"), &[second]);
    }

    #[test]
    fn test_velocity_tracking_errors_when_already_tracking() {
        let mut scope = SharedTransitionScope::<&str>::new();
        assert!(matches!(
            scope.begin_velocity_tracking(&"a"),
            Err(TransitionError::UnknownKey(_))
        ));
        let _ = scope.register("a", config(&flag(true)));
        scope.begin_velocity_tracking(&"a").unwrap();
        assert!(matches!(
            scope.begin_velocity_tracking(&"a"),
            Err(TransitionError::AlreadyTracking(_))
        ));
        scope.stop_velocity_tracking(&"a");
        scope.begin_velocity_tracking(&"a").unwrap();
    }

    #[test]
    fn test_tracked_velocity_follows_current_bounds() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let id = scope.register("a", config(&flag(true)));
        scope.resolve();
        scope.begin_velocity_tracking(&"a").unwrap();
        scope.set_initial_velocity_multiplier(&"a", Some(1.0)).unwrap();
        for i in 0..5_i64 {
            let x = i as f32 * 10.0;
            report(&mut scope, id, Rect::new(x, 0.0, x + 50.0, 50.0));
            scope.on_frame(i * 10_000_000);
        }
        let velocity = scope.velocity(&"a").unwrap_or_default();
        // 10px every 10ms.
        assert!((velocity.left - 1000.0).abs() < 1.0);
        assert!(velocity.width().abs() < 1e-3);
    }

    #[test]
    fn test_negative_duration_scale_rejected() {
        let mut scope = SharedTransitionScope::<&str>::new();
        assert!(matches!(
            scope.set_duration_scale(-0.5),
            Err(TransitionError::NegativeDurationScale(_))
        ));
        scope.set_duration_scale(0.0).unwrap();
        assert_eq!(scope.options().debug.duration_scale, 0.0);
    }

    #[test]
    fn test_listeners_fire_on_change_only() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let a_visible = flag(true);
        let b_visible = flag(false);
        let a = scope.register("k", config(&a_visible));
        let b = scope.register("k", config(&b_visible));

        let active_log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&active_log);
        let listener = scope.observe_transition_active(move |v| sink.borrow_mut().push(v));
        let match_log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&match_log);
        assert!(scope.observe_match(&"x", |_| {}).is_none());
        let _ = scope.observe_match(&"k", move |v| sink.borrow_mut().push(v));

        scope.resolve();
        scope.resolve();
        report(&mut scope, a, Rect::new(0.0, 0.0, 10.0, 10.0));
        report(&mut scope, b, Rect::new(50.0, 0.0, 60.0, 10.0));
        let mut now = 0;
        while scope.is_transition_active() {
            scope.on_frame(now);
            now += FRAME;
        }
        assert_eq!(*active_log.borrow(), vec![true, false]);
        assert_eq!(*match_log.borrow(), vec![true, false]);

        assert!(scope.remove_listener(listener));
        assert!(!scope.remove_listener(listener));
    }

    #[test]
    fn test_overlay_draws_provider_at_current_bounds() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let a_visible = flag(true);
        let b_visible = flag(false);
        let a = scope.register("k", config(&a_visible));
        let b = scope.register(
            "k",
            config(&b_visible).with_settings(InstanceSettings {
                overlay_clip: OverlayClip::Shape(ClipShape::Ellipse),
                ..InstanceSettings::default()
            }),
        );
        scope.resolve();
        let start = Rect::new(0.0, 0.0, 10.0, 10.0);
        report(&mut scope, a, start);
        let mut now = 0;
        while scope.is_transition_active() {
            scope.on_frame(now);
            now += FRAME;
        }

        a_visible.set(false);
        b_visible.set(true);
        scope.resolve();
        assert!(scope.is_transition_active());
        assert_eq!(scope.target_provider(&"k"), Some(b));
        report(&mut scope, b, Rect::new(100.0, 100.0, 140.0, 140.0));
        scope.on_frame(now);

        // Nothing drawn until content exists.
        let mut surface = Recorder::default();
        scope.draw_overlay(&mut surface).unwrap();
        assert!(surface.draws.is_empty());

        scope.mark_first_frame_drawn(a).unwrap();
        scope.mark_first_frame_drawn(b).unwrap();
        scope.draw_overlay(&mut surface).unwrap();
        assert_eq!(surface.draws.len(), 1);
        let (drawn, offset, clip) = surface.draws[0];
        assert_eq!(drawn, b);
        assert_eq!(offset, start.top_left());
        assert_eq!(clip.map(|c| c.shape), Some(ClipShape::Ellipse));

        assert!(scope.should_render_in_overlay(b).unwrap());
        assert!(!scope.should_render_in_place(b).unwrap());
        assert!(!scope.should_render_in_overlay(a).unwrap());
        assert!(!scope.should_render_in_place(a).unwrap());
    }

    #[test]
    fn test_render_in_overlay_toggle_keeps_everything_in_place() {
        let mut options = TransitionOptions::default();
        options.debug.render_in_overlay = false;
        let mut scope = SharedTransitionScope::<&str>::with_options(options).unwrap();
        let a = scope.register("k", config(&flag(false)));
        let b = scope.register("k", config(&flag(true)));
        scope.resolve();
        assert!(scope.is_match_found(&"k"));
        assert!(!scope.should_render_in_overlay(b).unwrap());
        assert!(scope.should_render_in_place(b).unwrap());
        assert!(!scope.should_render_in_place(a).unwrap());
    }

    #[test]
    fn test_placeholder_size_uses_animated_bounds_during_transition() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let a = scope.register("k", config(&flag(false)));
        let b = scope.register(
            "k",
            config(&flag(true)).with_settings(InstanceSettings {
                placeholder_size: PlaceholderSize::AnimatedSize,
                ..InstanceSettings::default()
            }),
        );
        let content = Vec2::new(1.0, 1.0);
        assert_eq!(scope.placeholder_size(b, content).unwrap(), content);

        scope.resolve();
        report(&mut scope, b, Rect::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(
            scope.placeholder_size(b, content).unwrap(),
            Vec2::new(30.0, 40.0)
        );
        assert_eq!(scope.placeholder_size(a, content).unwrap(), content);
    }

    #[test]
    fn test_dispose_clears_everything() {
        let mut scope = SharedTransitionScope::<&str>::new();
        let id = scope.register("k", config(&flag(true)));
        let _ = scope.observe_transition_active(|_| {});
        scope.dispose();
        assert_eq!(scope.instance_count(), 0);
        assert_eq!(scope.group_count(), 0);
        assert!(!scope.is_transition_active());
        assert!(scope.unregister(id).is_err());
    }
}
