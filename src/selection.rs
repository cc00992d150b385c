//! Selection state and the rules that turn clicks and boxes into selection sets.
//!
//! The editor works in exactly one [`EditMode`] at a time, so a [`Selection`]
//! holds either field ids or guide references, never both. Both lists keep
//! the order in which items were selected.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Document, FieldId, GuideRef, Guides, Orientation, Rect};

/// Which kind of object pointer gestures operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Field,
    Guide,
}

/// Currently selected fields or guides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    fields: Vec<FieldId>,
    guides: Vec<GuideRef>,
}

impl Selection {
    #[must_use]
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    #[must_use]
    pub fn guides(&self) -> &[GuideRef] {
        &self.guides
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.guides.is_empty()
    }

    #[must_use]
    pub fn contains_field(&self, id: &FieldId) -> bool {
        self.fields.contains(id)
    }

    #[must_use]
    pub fn contains_guide(&self, guide: GuideRef) -> bool {
        self.guides.contains(&guide)
    }

    /// The only selected field, if exactly one is selected.
    #[must_use]
    pub fn single_field(&self) -> Option<FieldId> {
        match self.fields.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.guides.clear();
    }

    /// Replace the selection with the given fields.
    pub fn set_fields(&mut self, ids: Vec<FieldId>) {
        self.guides.clear();
        self.fields = ids;
    }

    /// Replace the selection with the given guides.
    pub fn set_guides(&mut self, guides: Vec<GuideRef>) {
        self.fields.clear();
        self.guides = guides;
    }

    /// Resolve a pointer press on a field.
    ///
    /// Shift toggles membership. Without shift, an unselected field collapses
    /// the selection to itself, while an already-selected field leaves a
    /// multi-selection intact so the group can be dragged by any member.
    /// Returns whether the field is selected afterwards.
    pub fn press_field(&mut self, id: FieldId, shift: bool) -> bool {
        self.guides.clear();
        if shift {
            if let Some(pos) = self.fields.iter().position(|f| *f == id) {
                self.fields.remove(pos);
                return false;
            }
            self.fields.push(id);
            return true;
        }
        if !self.fields.contains(&id) {
            self.fields = vec![id];
        }
        true
    }

    /// Resolve a pointer press on a guide. Same rules as [`Selection::press_field`].
    pub fn press_guide(&mut self, guide: GuideRef, shift: bool) -> bool {
        self.fields.clear();
        if shift {
            if let Some(pos) = self.guides.iter().position(|g| *g == guide) {
                self.guides.remove(pos);
                return false;
            }
            self.guides.push(guide);
            return true;
        }
        if !self.guides.contains(&guide) {
            self.guides = vec![guide];
        }
        true
    }

    /// Drop field ids and guide references that no longer resolve in `doc`.
    pub fn retain_existing(&mut self, doc: &Document) {
        self.fields.retain(|id| doc.field(id).is_some());
        self.guides.retain(|g| doc.guides.get(*g).is_some());
    }

    /// Selected guides of one orientation, sorted by position ascending.
    #[must_use]
    pub fn guide_positions(&self, guides: &Guides, orientation: Orientation) -> Vec<f64> {
        let mut positions: Vec<f64> = self
            .guides
            .iter()
            .filter(|g| g.orientation == orientation)
            .filter_map(|g| guides.get(*g))
            .collect();
        positions.sort_by(f64::total_cmp);
        positions
    }
}

/// Fields on `page` whose center lies inside `area` (bounds inclusive).
#[must_use]
pub fn fields_in_box(doc: &Document, page: u32, area: &Rect) -> Vec<FieldId> {
    doc.on_page(page)
        .filter(|f| {
            let (cx, cy) = f.rect().center();
            area.contains(cx, cy)
        })
        .map(|f| f.id)
        .collect()
}

/// Guides whose line crosses `area` (bounds inclusive).
#[must_use]
pub fn guides_in_box(guides: &Guides, area: &Rect) -> Vec<GuideRef> {
    guides
        .refs()
        .into_iter()
        .filter(|g| match (g.orientation, guides.get(*g)) {
            (Orientation::Vertical, Some(x)) => x >= area.x && x <= area.right(),
            (Orientation::Horizontal, Some(y)) => y >= area.y && y <= area.bottom(),
            (_, None) => false,
        })
        .collect()
}
