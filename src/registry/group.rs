//! Key groups: every instance registered under one key plus the state
//! derived from them.

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use super::instance::{ElementInstance, VelocitySource};
use super::observer::Observable;
use super::InstanceId;
use crate::util::rect::Rect;
use crate::velocity::BoundsVelocityTracker;

/// Instances sharing a key, in registration order.
#[derive(Debug)]
pub(crate) struct KeyGroup {
    pub(crate) instances: Vec<InstanceId>,
    pub(crate) found_match: Observable,
    /// Instance whose lookahead bounds are the destination.
    pub(crate) provider: Option<InstanceId>,
    /// Last destination fanned out to the controllers.
    pub(crate) target_bounds: Option<Rect>,
    /// Live (animated or settled) bounds.
    pub(crate) current_bounds: Option<Rect>,
    pub(crate) tracker: BoundsVelocityTracker,
    pub(crate) tracking: bool,
    pub(crate) default_multiplier: f32,
    pub(crate) velocity_multiplier: f32,
    /// Velocity source from the most recently registered instance that
    /// reported one.
    pub(crate) last_reported_velocity: Option<VelocitySource>,
    /// Emptied during a pass; removed at the end of it.
    pub(crate) marked_for_prune: bool,
}

impl KeyGroup {
    pub(crate) fn new(velocity_multiplier: f32) -> Self {
        Self {
            instances: Vec::new(),
            found_match: Observable::new(false),
            provider: None,
            target_bounds: None,
            current_bounds: None,
            tracker: BoundsVelocityTracker::new(),
            tracking: false,
            default_multiplier: velocity_multiplier,
            velocity_multiplier,
            last_reported_velocity: None,
            marked_for_prune: false,
        }
    }

    pub(crate) fn found_match(&self) -> bool {
        self.found_match.get()
    }

    fn members<'a, K>(
        &'a self,
        instances: &'a FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> impl DoubleEndedIterator<Item = (InstanceId, &'a ElementInstance<K>)> + 'a {
        self.instances
            .iter()
            .filter_map(move |id| instances.get(id).map(|instance| (*id, instance)))
    }

    pub(crate) fn has_visible_content<K>(
        &self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> bool {
        self.members(instances).any(|(_, instance)| instance.visible)
    }

    fn becoming_visible_count<K>(
        &self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> usize {
        self.members(instances)
            .filter(|(_, instance)| instance.is_becoming_visible())
            .count()
    }

    /// Any member holding an animation request not yet turned into motion.
    pub(crate) fn has_pending_request<K>(
        &self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> bool {
        self.members(instances)
            .any(|(_, instance)| instance.controller.is_pending())
    }

    /// Any member animating while the group is matched.
    pub(crate) fn is_animating<K>(
        &self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> bool {
        self.found_match()
            && self
                .members(instances)
                .any(|(_, instance)| instance.controller.is_running())
    }

    fn is_pairable<K>(&self, instances: &FxHashMap<InstanceId, ElementInstance<K>>) -> bool {
        self.instances.len() > 1 && self.becoming_visible_count(instances) == 1
    }

    /// Recompute `found_match` from the last visibility snapshot.
    pub(crate) fn update_match<K: Debug>(
        &mut self,
        key: &K,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
        transition_active: bool,
    ) {
        let matched = if self.is_pairable(instances) {
            true
        } else if transition_active {
            if self.has_visible_content(instances) {
                self.found_match()
            } else {
                if self.found_match() {
                    log::warn!(
                        "shared element {key:?} lost its visible target mid-transition"
                    );
                }
                false
            }
        } else {
            false
        };
        let _ = self.found_match.set(matched);
    }

    /// Pick the target provider: the last-registered instance becoming
    /// visible, else the current provider while it stays visible, else the
    /// last-registered visible instance. Returns whether the provider
    /// changed; a change drops the cached target bounds.
    pub(crate) fn update_target_bounds_provider<K: Debug>(
        &mut self,
        key: &K,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> bool {
        let last_where = |keep: fn(&ElementInstance<K>) -> bool| {
            self.members(instances)
                .rev()
                .find(|(_, instance)| keep(*instance))
                .map(|(id, _)| id)
        };
        let still_visible = self
            .provider
            .filter(|id| instances.get(id).is_some_and(|instance| instance.visible));
        let provider = last_where(ElementInstance::is_becoming_visible)
            .or(still_visible)
            .or_else(|| last_where(|instance| instance.visible));
        if provider == self.provider {
            return false;
        }
        log::debug!(
            "target provider for {key:?}: {:?} -> {:?}",
            self.provider,
            provider
        );
        self.provider = provider;
        self.target_bounds = None;
        true
    }

    /// Reset after every transition in the scope has finished.
    pub(crate) fn on_shared_transition_finished<K>(
        &mut self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) {
        let matched = self.is_pairable(instances);
        let _ = self.found_match.set(matched);
        self.target_bounds = None;
    }

    /// Displayed bounds of the provider, or of any running member when the
    /// provider has nothing to show.
    pub(crate) fn animated_bounds<K>(
        &self,
        instances: &FxHashMap<InstanceId, ElementInstance<K>>,
    ) -> Option<Rect> {
        let provider = self
            .provider
            .and_then(|id| instances.get(&id))
            .and_then(|instance| instance.controller.value(true));
        provider.or_else(|| {
            self.members(instances)
                .filter(|(_, instance)| instance.controller.is_running())
                .find_map(|(_, instance)| instance.controller.value(true))
        })
    }

    /// Tracked velocity, scaled.
    pub(crate) fn velocity(&self) -> Rect {
        self.tracker.velocity() * self.velocity_multiplier
    }

    /// Initial velocity for a member that accepts incoming velocity.
    pub(crate) fn incoming_velocity(&self) -> Option<Rect> {
        match self.last_reported_velocity.as_ref()? {
            VelocitySource::Provider(provider) => Some(provider()),
            VelocitySource::TrackedBounds => Some(self.velocity()),
        }
    }

    pub(crate) fn set_velocity_multiplier(&mut self, multiplier: Option<f32>) {
        self.velocity_multiplier = multiplier.unwrap_or(self.default_multiplier);
    }

    pub(crate) fn sample_velocity(&mut self, frame_millis: i64) {
        if !self.tracking {
            return;
        }
        if let Some(bounds) = self.current_bounds {
            self.tracker.add_bounds(frame_millis, bounds);
        }
    }

    pub(crate) fn stop_velocity_tracking(&mut self) {
        self.tracking = false;
        self.tracker.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::animation::animator::TransitionController;
    use crate::registry::instance::InstanceSettings;

    type Instances = FxHashMap<InstanceId, ElementInstance<&'static str>>;

    fn add(
        group: &mut KeyGroup,
        instances: &mut Instances,
        id: u64,
        visible: &Rc<Cell<bool>>,
    ) {
        let reader = Rc::clone(visible);
        let controller = TransitionController::with_default_transform(Box::new(move || reader.get()));
        let _ = instances.insert(
            InstanceId(id),
            ElementInstance::new("k", controller, InstanceSettings::default()),
        );
        group.instances.push(InstanceId(id));
    }

    #[test]
    fn test_single_instance_never_matches() {
        let mut group = KeyGroup::new(1.3);
        let mut instances = Instances::default();
        add(&mut group, &mut instances, 1, &Rc::new(Cell::new(true)));
        group.update_match(&"k", &instances, false);
        assert!(!group.found_match());
        group.update_match(&"k", &instances, true);
        assert!(!group.found_match());
    }

    #[test]
    fn test_one_becoming_visible_of_two_matches() {
        let mut group = KeyGroup::new(1.3);
        let mut instances = Instances::default();
        add(&mut group, &mut instances, 1, &Rc::new(Cell::new(false)));
        add(&mut group, &mut instances, 2, &Rc::new(Cell::new(true)));
        group.update_match(&"k", &instances, false);
        assert!(group.found_match());
        assert!(group.update_target_bounds_provider(&"k", &instances));
        assert_eq!(group.provider, Some(InstanceId(2)));
    }

    #[test]
    fn test_provider_update_is_idempotent() {
        let mut group = KeyGroup::new(1.3);
        let mut instances = Instances::default();
        add(&mut group, &mut instances, 1, &Rc::new(Cell::new(true)));
        add(&mut group, &mut instances, 2, &Rc::new(Cell::new(true)));
        assert!(group.update_target_bounds_provider(&"k", &instances));
        // Last registered wins ties.
        assert_eq!(group.provider, Some(InstanceId(2)));
        group.target_bounds = Some(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(!group.update_target_bounds_provider(&"k", &instances));
        assert!(group.target_bounds.is_some());
    }

    fn snapshot(instances: &mut Instances) {
        for instance in instances.values_mut() {
            instance.visible = instance.controller.is_target();
        }
    }

    fn settle_all(instances: &mut Instances) {
        for instance in instances.values_mut() {
            instance.controller.settle(Rect::ZERO);
        }
    }

    #[test]
    fn test_provider_prefers_instance_becoming_visible() {
        let mut group = KeyGroup::new(1.3);
        let mut instances = Instances::default();
        let first = Rc::new(Cell::new(false));
        add(&mut group, &mut instances, 1, &first);
        add(&mut group, &mut instances, 2, &Rc::new(Cell::new(true)));
        assert!(group.update_target_bounds_provider(&"k", &instances));
        assert_eq!(group.provider, Some(InstanceId(2)));
        settle_all(&mut instances);
        group.target_bounds = Some(Rect::ZERO);

        // The earlier-registered instance appears next to a visible one.
        first.set(true);
        snapshot(&mut instances);
        group.update_match(&"k", &instances, false);
        assert!(group.found_match());
        assert!(group.has_pending_request(&instances));
        assert!(group.update_target_bounds_provider(&"k", &instances));
        assert_eq!(group.provider, Some(InstanceId(1)));
        assert!(group.target_bounds.is_none());

        // Settled again: the provider stays while it is visible.
        settle_all(&mut instances);
        snapshot(&mut instances);
        assert!(!group.update_target_bounds_provider(&"k", &instances));
        assert_eq!(group.provider, Some(InstanceId(1)));
    }

    #[test]
    fn test_multiplier_resets_to_default() {
        let mut group = KeyGroup::new(1.3);
        group.set_velocity_multiplier(Some(2.0));
        assert_eq!(group.velocity_multiplier, 2.0);
        group.set_velocity_multiplier(None);
        assert_eq!(group.velocity_multiplier, 1.3);
    }
}
