//! Element instances: one registration of a key at one call site.

use std::fmt;
use std::rc::Rc;

use glam::Vec2;

use super::InstanceId;
use crate::animation::animator::{TransitionController, VisibilityPredicate};
use crate::animation::transition::SharedBoundsTransform;
use crate::util::rect::Rect;

/// How much layout space an element reserves while it animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderSize {
    /// The content's own measured size.
    #[default]
    ContentSize,
    /// The currently animated size.
    AnimatedSize,
}

impl PlaceholderSize {
    /// Size to reserve given the measured content size and the animated
    /// bounds, if a transition is showing any.
    #[must_use]
    pub fn resolve(self, content_size: Vec2, animated: Option<Rect>) -> Vec2 {
        match (self, animated) {
            (Self::AnimatedSize, Some(bounds)) => bounds.size(),
            _ => content_size,
        }
    }
}

/// Outline used to clip overlay drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipShape {
    /// The bounds themselves.
    Rectangle,
    /// Bounds with rounded corners.
    RoundedRect {
        /// Corner radius in pixels.
        radius: f32,
    },
    /// Ellipse inscribed in the bounds.
    Ellipse,
}

/// Clip applied while an element draws in the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OverlayClip {
    /// Draw unclipped.
    None,
    /// Inherit the parent instance's overlay clip, if it has a parent.
    #[default]
    Parent,
    /// Clip to a shape placed at the element's animated bounds.
    Shape(ClipShape),
}

/// A clip shape placed at concrete bounds, handed to the draw collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedClip {
    /// Outline.
    pub shape: ClipShape,
    /// Where the outline sits.
    pub bounds: Rect,
}

/// Source of the initial velocity handed to a new animation.
#[derive(Clone)]
pub enum VelocitySource {
    /// Caller-supplied closure, e.g. reading a fling velocity.
    Provider(Rc<dyn Fn() -> Rect>),
    /// The key group's tracked bounds velocity, scaled by its multiplier.
    TrackedBounds,
}

impl fmt::Debug for VelocitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(_) => f.write_str("Provider(..)"),
            Self::TrackedBounds => f.write_str("TrackedBounds"),
        }
    }
}

/// Per-instance flags the host may change after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSettings {
    /// Only draw this instance while it is the group's target provider.
    /// `true` for shared elements, `false` for shared bounds.
    pub render_only_when_visible: bool,
    /// Draw in the overlay while the group's transition runs.
    pub render_in_overlay_during_transition: bool,
    /// Overlay z-order.
    pub z_index: f32,
    /// Enclosing shared instance, for nested transitions.
    pub parent: Option<InstanceId>,
    /// Layout space reserved while animating.
    pub placeholder_size: PlaceholderSize,
    /// Clip while drawn in the overlay.
    pub overlay_clip: OverlayClip,
    /// Use the group's last reported velocity source when this instance
    /// starts animating.
    pub accept_incoming_initial_velocity: bool,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            render_only_when_visible: true,
            render_in_overlay_during_transition: true,
            z_index: 0.0,
            parent: None,
            placeholder_size: PlaceholderSize::default(),
            overlay_clip: OverlayClip::default(),
            accept_incoming_initial_velocity: true,
        }
    }
}

/// Everything needed to register an instance.
pub struct InstanceConfig {
    /// Visibility predicate, re-read on every resolution pass.
    pub visible: VisibilityPredicate,
    /// Transform for this instance; the scope's default spring when `None`.
    pub bounds_transform: Option<SharedBoundsTransform>,
    /// Velocity this instance reports to its group at hand-off.
    pub initial_velocity: Option<VelocitySource>,
    /// Mutable flags.
    pub settings: InstanceSettings,
}

impl InstanceConfig {
    /// Config with default settings for the given visibility predicate.
    #[must_use]
    pub fn new(visible: impl Fn() -> bool + 'static) -> Self {
        Self {
            visible: Box::new(visible),
            bounds_transform: None,
            initial_velocity: None,
            settings: InstanceSettings::default(),
        }
    }

    /// Shared-bounds flavour: drawn whether or not it is the target.
    #[must_use]
    pub fn bounds(visible: impl Fn() -> bool + 'static) -> Self {
        let mut config = Self::new(visible);
        config.settings.render_only_when_visible = false;
        config
    }

    /// Use `transform` instead of the scope default.
    #[must_use]
    pub fn with_bounds_transform(mut self, transform: SharedBoundsTransform) -> Self {
        self.bounds_transform = Some(transform);
        self
    }

    /// Report `source` as the group's hand-off velocity.
    #[must_use]
    pub fn with_initial_velocity(mut self, source: VelocitySource) -> Self {
        self.initial_velocity = Some(source);
        self
    }

    /// Overlay z-order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: f32) -> Self {
        self.settings.z_index = z_index;
        self
    }

    /// Nest under `parent`.
    #[must_use]
    pub fn with_parent(mut self, parent: InstanceId) -> Self {
        self.settings.parent = Some(parent);
        self
    }

    /// Replace all settings.
    #[must_use]
    pub fn with_settings(mut self, settings: InstanceSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl fmt::Debug for InstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceConfig")
            .field("bounds_transform", &self.bounds_transform.as_ref().map(|t| t.name()))
            .field("initial_velocity", &self.initial_velocity)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Registered instance owned by the scope.
#[derive(Debug)]
pub(crate) struct ElementInstance<K> {
    pub(crate) key: K,
    pub(crate) controller: TransitionController,
    pub(crate) settings: InstanceSettings,
    /// Visibility reading of the last resolution pass.
    pub(crate) visible: bool,
    /// Stable bounds from the last layout pass.
    pub(crate) lookahead: Option<Rect>,
    /// Set once the draw collaborator has recorded content to draw.
    pub(crate) first_frame_drawn: bool,
}

impl<K> ElementInstance<K> {
    pub(crate) fn new(
        key: K,
        controller: TransitionController,
        settings: InstanceSettings,
    ) -> Self {
        let visible = controller.last_target();
        Self {
            key,
            controller,
            settings,
            visible,
            lookahead: None,
            first_frame_drawn: false,
        }
    }

    /// Visible in the last snapshot and animating or about to.
    pub(crate) fn is_becoming_visible(&self) -> bool {
        self.visible && self.controller.is_running()
    }

    /// Overlay draw-order key: unparented zero-z entries go beneath
    /// everything else.
    pub(crate) fn sort_key(&self) -> f32 {
        if self.settings.z_index == 0.0 && self.settings.parent.is_none() {
            -1.0
        } else {
            self.settings.z_index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_size() {
        let content = Vec2::new(10.0, 20.0);
        let animated = Some(Rect::new(0.0, 0.0, 50.0, 60.0));
        assert_eq!(PlaceholderSize::ContentSize.resolve(content, animated), content);
        assert_eq!(
            PlaceholderSize::AnimatedSize.resolve(content, animated),
            Vec2::new(50.0, 60.0)
        );
        assert_eq!(PlaceholderSize::AnimatedSize.resolve(content, None), content);
    }

    #[test]
    fn test_config_flavours() {
        assert!(InstanceConfig::new(|| true).settings.render_only_when_visible);
        assert!(!InstanceConfig::bounds(|| true).settings.render_only_when_visible);
        let config = InstanceConfig::new(|| false).with_z_index(2.0);
        assert_eq!(config.settings.z_index, 2.0);
        assert_eq!(config.settings.overlay_clip, OverlayClip::Parent);
    }

    #[test]
    fn test_sort_key() {
        let controller = TransitionController::with_default_transform(Box::new(|| false));
        let mut instance = ElementInstance::new("k", controller, InstanceSettings::default());
        assert_eq!(instance.sort_key(), -1.0);
        instance.settings.parent = Some(InstanceId(3));
        assert_eq!(instance.sort_key(), 0.0);
        instance.settings.z_index = 4.0;
        assert_eq!(instance.sort_key(), 4.0);
    }
}
