//! Form-field layout engine for paged documents.
//!
//! This crate holds the editing core of a form designer: rectangular fields
//! placed on fixed-size pages, alignment guides, snapping, selection, gesture
//! handling, batch field generation and bounded undo/redo. It draws nothing.
//! A host translates raw input into [`engine::Event`]s (or calls the typed
//! handlers), draws [`engine::EngineCore::geometry`], and persists the
//! documents carried by [`engine::Action::Committed`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Session owner: [`engine::EngineCore`], events and actions |
//! | [`doc`] | Fields, guides and the document they live in |
//! | [`viewport`] | Page dimensions, zoom and screen/page conversions |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing fields, handles and guides |
//! | [`selection`] | Selection set, edit mode and box selection |
//! | [`snap`] | Guide and sibling-edge snapping |
//! | [`transform`] | Drag, resize and nudge geometry |
//! | [`guides`] | Guide add/move/delete and cascading |
//! | [`batch`] | Cascade, fill, merge and split field generation |
//! | [`history`] | Bounded linear undo/redo of document snapshots |
//! | [`scheduler`] | Frame-coalesced pointer moves |
//! | [`keymap`] | Configurable keyboard shortcuts |
//! | [`config`] | Editor settings from JSON and environment |
//! | [`consts`] | Shared numeric constants (page size, tolerances, limits) |

pub mod batch;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod guides;
pub mod hit;
pub mod history;
pub mod input;
pub mod keymap;
pub mod scheduler;
pub mod selection;
pub mod snap;
pub mod transform;
pub mod viewport;
