//! Keyboard routing and navigation.
//!
//! One [`Dispatcher`] receives every key press. It drops keys aimed at text
//! entry, recognizes `g` chords, then offers the key to registered scopes from
//! the highest priority down until one consumes it. List and board views
//! mount a [`ListNav`] or [`GridNav`], which register themselves as scopes
//! and unregister when dropped.

pub mod chord;
pub mod dispatcher;
pub mod grid_nav;
pub mod help;
pub mod input;
pub mod list_nav;
pub mod scope;

pub use chord::{CHORD_TIMEOUT, ChordBuffer, Sequence};
pub use dispatcher::{Dispatch, Dispatcher, DispatcherConfig};
pub use grid_nav::{CardProps, GridEffect, GridLoop, GridNav, GridNavOptions, GridPos, GridShape};
pub use input::{FocusTarget, KeyInput};
pub use list_nav::{ContainerProps, ItemProps, ListEffect, ListNav, ListNavOptions};
pub use scope::{Handled, ScopeEvent, ScopeHandle, ScopeOptions, ScopeRegistry, priority};
