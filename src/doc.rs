//! Document model: fields, guides, and the in-memory document.
//!
//! This module defines what sits on a page (`Field`), the alignment lines used
//! for snapping (`Guides`), a sparse-update type for property edits
//! (`PartialField`), and the `Document` that owns both. A `Document` is also
//! the unit of history snapshots and of the commit hand-off to persistence.
//!
//! Style and data-binding attributes are carried verbatim; the engine never
//! interprets them beyond copying or clearing them.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};
use crate::guides::clamp_guide;
use crate::viewport::Viewport;

/// Unique identifier for a field.
pub type FieldId = Uuid;

/// Axis-aligned rectangle in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Build a normalized rectangle from two opposite corners.
    #[must_use]
    pub fn from_corners(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self { x: ax.min(bx), y: ay.min(by), width: (ax - bx).abs(), height: (ay - by).abs() }
    }

    /// Smallest rectangle covering both.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect { x, y, width: right - x, height: bottom - y }
    }
}

/// Horizontal text alignment inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment inside a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Text styling for a field. Opaque to the editor engine.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub h_align: HAlign,
    pub v_align: VAlign,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".into(),
            font_size: 12.0,
            color: "#000000".into(),
            bold: false,
            italic: false,
            underline: false,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
        }
    }
}

/// What a field is filled with at generation time. The token is never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Binding {
    /// A column in the external data source.
    Column(String),
    /// A computed value such as a date or row number.
    Special(String),
}

/// A rectangle on a page, optionally bound to a data column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Unique identifier for this field.
    pub id: FieldId,
    /// 1-based page index.
    pub page: u32,
    /// Left edge in page units.
    pub x: f64,
    /// Top edge in page units.
    pub y: f64,
    /// Width in page units; always positive.
    pub width: f64,
    /// Height in page units; always positive.
    pub height: f64,
    /// Display name.
    pub label: String,
    #[serde(default)]
    pub style: FieldStyle,
    #[serde(default)]
    pub binding: Option<Binding>,
}

impl Field {
    /// Create an unbound, default-styled field with a fresh id.
    #[must_use]
    pub fn new(page: u32, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            page,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label: label.into(),
            style: FieldStyle::default(),
            binding: None,
        }
    }

    /// Copy style onto a new geometry and label. The result has a fresh id and no binding.
    #[must_use]
    pub fn derive(&self, rect: Rect, label: impl Into<String>) -> Self {
        Self { style: self.style.clone(), ..Self::new(self.page, rect, label) }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }

    /// Overwrite geometry, clamping size to the field minimum.
    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width.max(MIN_FIELD_WIDTH);
        self.height = rect.height.max(MIN_FIELD_HEIGHT);
    }
}

/// Orientation of a guide line (and of a split cut).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// A vertical line, identified by its x position.
    Vertical,
    /// A horizontal line, identified by its y position.
    Horizontal,
}

/// Reference to a guide by position in its list. Invalidated by any add/remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuideRef {
    pub orientation: Orientation,
    pub index: usize,
}

impl GuideRef {
    #[must_use]
    pub fn new(orientation: Orientation, index: usize) -> Self {
        Self { orientation, index }
    }
}

/// Vertical and horizontal guide positions, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guides {
    #[serde(default)]
    pub vertical: Vec<f64>,
    #[serde(default)]
    pub horizontal: Vec<f64>,
}

impl Guides {
    #[must_use]
    pub fn list(&self, orientation: Orientation) -> &[f64] {
        match orientation {
            Orientation::Vertical => &self.vertical,
            Orientation::Horizontal => &self.horizontal,
        }
    }

    pub fn list_mut(&mut self, orientation: Orientation) -> &mut Vec<f64> {
        match orientation {
            Orientation::Vertical => &mut self.vertical,
            Orientation::Horizontal => &mut self.horizontal,
        }
    }

    /// Position of a referenced guide, or `None` for a stale reference.
    #[must_use]
    pub fn get(&self, guide: GuideRef) -> Option<f64> {
        self.list(guide.orientation).get(guide.index).copied()
    }

    /// Move a referenced guide. Returns false for a stale reference.
    pub fn set(&mut self, guide: GuideRef, position: f64) -> bool {
        let Some(slot) = self.list_mut(guide.orientation).get_mut(guide.index) else {
            return false;
        };
        *slot = position;
        true
    }

    /// Every guide as a reference, vertical first.
    #[must_use]
    pub fn refs(&self) -> Vec<GuideRef> {
        let vertical = (0..self.vertical.len()).map(|i| GuideRef::new(Orientation::Vertical, i));
        let horizontal = (0..self.horizontal.len()).map(|i| GuideRef::new(Orientation::Horizontal, i));
        vertical.chain(horizontal).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vertical.len() + self.horizontal.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Sparse update for a field. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width; clamped to the field minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height; clamped to the field minimum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<FieldStyle>,
    /// `Some(None)` clears the binding; `None` leaves it untouched.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub binding: Option<Option<Binding>>,
}

mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Binding;

    #[allow(clippy::ref_option, clippy::option_option)]
    pub fn serialize<S: Serializer>(value: &Option<Option<Binding>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    #[allow(clippy::option_option)]
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<Binding>>, D::Error> {
        Option::<Binding>::deserialize(deserializer).map(Some)
    }
}

/// The authoritative fields and guides of one editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub guides: Guides,
}

impl Document {
    #[must_use]
    pub fn new(fields: Vec<Field>, guides: Guides) -> Self {
        Self { fields, guides }
    }

    /// Return a reference to a field by id.
    #[must_use]
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == *id)
    }

    pub fn field_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == *id)
    }

    #[must_use]
    pub fn index_of(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f.id == *id)
    }

    /// Append a field, drawing above everything already on its page.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Remove a field by id, returning it if it was present.
    pub fn remove(&mut self, id: &FieldId) -> Option<Field> {
        let index = self.index_of(id)?;
        Some(self.fields.remove(index))
    }

    /// Fields on one page, in list order.
    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(move |f| f.page == page)
    }

    /// Apply a partial update to an existing field. Returns false if the field doesn't exist.
    pub fn apply_partial(&mut self, id: &FieldId, partial: &PartialField) -> bool {
        let Some(field) = self.field_mut(id) else {
            return false;
        };
        if let Some(x) = partial.x {
            field.x = x;
        }
        if let Some(y) = partial.y {
            field.y = y;
        }
        if let Some(w) = partial.width {
            field.width = w.max(MIN_FIELD_WIDTH);
        }
        if let Some(h) = partial.height {
            field.height = h.max(MIN_FIELD_HEIGHT);
        }
        if let Some(ref label) = partial.label {
            field.label.clone_from(label);
        }
        if let Some(ref style) = partial.style {
            field.style = style.clone();
        }
        if let Some(ref binding) = partial.binding {
            field.binding.clone_from(binding);
        }
        true
    }

    /// Clamp every field to the minimum size and every guide onto the page.
    /// Returns true if anything changed.
    pub fn normalize(&mut self, viewport: &Viewport) -> bool {
        let mut changed = false;
        for field in &mut self.fields {
            let before = field.rect();
            field.set_rect(before);
            changed |= field.rect() != before;
        }
        for orientation in [Orientation::Vertical, Orientation::Horizontal] {
            for position in self.guides.list_mut(orientation) {
                let clamped = clamp_guide(*position, orientation, viewport);
                changed |= clamped != *position;
                *position = clamped;
            }
        }
        changed
    }

    /// Number of fields in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the document contains no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
