// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Frame-driven bounds transitions for paired ("shared") UI elements.
//!
//! When two registrations of the same logical key appear on either side of
//! a UI state change, the engine animates the element from its old bounds
//! to its new bounds instead of letting it disappear and reappear. The
//! destination may move every frame (e.g. while scrolling) without the
//! displayed rectangle snapping.
//!
//! # Key entry points
//!
//! - [`registry::SharedTransitionScope`] - keyed registry, match
//!   resolution, global transition state and the overlay render list
//! - [`animation::TransitionController`] - per-instance decision of when to
//!   start a new animation versus following a moving target
//! - [`animation::DeviationAwareAnimator`] - retargetable rectangle
//!   animator driven one frame at a time
//! - [`velocity::VelocityTracker`] - least-squares velocity estimation for
//!   gesture hand-off
//! - [`options::TransitionOptions`] - configuration with TOML presets
//!
//! # Frame protocol
//!
//! The host drives everything from a single thread, once per frame:
//!
//! 1. [`registry::SharedTransitionScope::resolve`] after any visibility
//!    change (one atomic snapshot of every visibility predicate)
//! 2. [`registry::SharedTransitionScope::on_lookahead_result`] for each
//!    measured instance, after layout has committed
//! 3. [`registry::SharedTransitionScope::on_frame`] with the frame
//!    timestamp
//! 4. [`registry::SharedTransitionScope::draw_overlay`] during drawing

pub mod animation;
pub mod error;
pub mod options;
pub mod registry;
pub mod util;
pub mod velocity;

pub use error::TransitionError;
pub use util::rect::Rect;
