//! Synchronization of a remote-backed grid with the browser URL.
//!
//! [`codec`] maps URLs to [`GridQueryState`](crate::domain::grid::GridQueryState),
//! [`controller`] owns that state and drives navigations through a
//! [`navigation::Navigator`], [`debounce`] coalesces filter and search edits,
//! [`columns`] derives the permission-gated actions column and [`search`]
//! binds a search box to the same URL.

pub mod codec;
pub mod columns;
pub mod controller;
pub mod debounce;
pub mod navigation;
pub mod permissions;
pub mod search;
