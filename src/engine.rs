//! The editing session: one owner for document, selection, gesture and history state.
//!
//! Hosts feed [`Event`]s into [`EngineCore::handle`] (or call the typed
//! handlers directly) and act on the returned [`Action`]s. In-progress
//! geometry lives in a draft copy of the document while a gesture or nudge is
//! active; the authoritative document only changes on commit, and every
//! commit pushes exactly one history snapshot.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::mem;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::batch::{self, clamp_split_position, merge_fields, split_field};
use crate::config::EditorConfig;
use crate::consts::{CLICK_SLOP_PX, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_X, DEFAULT_FIELD_Y};
use crate::doc::{Document, Field, FieldId, GuideRef, Orientation, PartialField, Rect};
use crate::guides;
use crate::hit::{Hit, HitPart, hit_test};
use crate::history::History;
use crate::input::{AxisLock, Button, Corner, DragAnchor, InputState, Key, Modifiers};
use crate::keymap::{EditorAction, KeymapError, ShortcutMap};
use crate::scheduler::FrameScheduler;
use crate::selection::{EditMode, Selection, fields_in_box, guides_in_box};
use crate::snap::{SnapLine, snap_resize_edges, snap_to_fields, snap_to_guides};
use crate::transform::{
    Nudge, NudgeDirection, clamp_resize, corner_edges, drag_delta, nudge_step, resize_from_corner, translate,
};
use crate::viewport::{ScreenPoint, Viewport};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The authoritative document changed; hand it to persistence.
    Committed(Document),
    SelectionChanged,
    RenderNeeded,
}

/// Serializable input for replaying a session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PointerDown {
        point: ScreenPoint,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        point: ScreenPoint,
    },
    PointerUp {
        point: ScreenPoint,
        #[serde(default)]
        button: Button,
    },
    /// A pointer move to be applied on the next frame tick.
    QueuePointerMove {
        point: ScreenPoint,
    },
    Frame {
        now_ms: u64,
    },
    KeyDown {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
        #[serde(default)]
        now_ms: u64,
    },
    KeyUp {
        key: String,
    },
    AddField,
    DeleteSelected,
    UpdateField {
        id: FieldId,
        fields: PartialField,
    },
    AddGuide {
        orientation: Orientation,
    },
    DeleteSelectedGuides,
    CascadeGuides {
        count: usize,
        orientation: Orientation,
    },
    CascadeFieldsToGuides,
    FillFieldsFromGuides,
    MergeSelected,
    StartSplit {
        orientation: Orientation,
    },
    CancelSplit,
    SetMode {
        mode: EditMode,
    },
    SetScale {
        scale: f64,
    },
    SetPage {
        page: u32,
    },
    SelectAll,
    Undo,
    Redo,
}

/// Core engine state.
pub struct EngineCore {
    doc: Document,
    /// Copy-on-write working copy while a gesture or nudge is in flight.
    draft: Option<Document>,
    selection: Selection,
    mode: EditMode,
    input: InputState,
    history: History,
    viewport: Viewport,
    keymap: ShortcutMap,
    scheduler: FrameScheduler,
    nudge: Option<Nudge>,
    precision: bool,
    axis_lock: AxisLock,
    page: u32,
    snap_lines: Vec<SnapLine>,
    last_pointer: Option<ScreenPoint>,
    snap_threshold_px: f64,
    default_guide_offset: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(Document::default())
    }
}

fn rebased(anchor: &DragAnchor, pointer: ScreenPoint, geometry: &Document) -> DragAnchor {
    DragAnchor {
        pointer,
        rects: anchor
            .rects
            .iter()
            .map(|(id, rect)| (*id, geometry.field(id).map_or(*rect, Field::rect)))
            .collect(),
        guides: anchor.guides.iter().map(|(g, pos)| (*g, geometry.guides.get(*g).unwrap_or(*pos))).collect(),
    }
}

fn nudge_action(direction: NudgeDirection) -> EditorAction {
    match direction {
        NudgeDirection::Left => EditorAction::NudgeLeft,
        NudgeDirection::Right => EditorAction::NudgeRight,
        NudgeDirection::Up => EditorAction::NudgeUp,
        NudgeDirection::Down => EditorAction::NudgeDown,
    }
}

impl EngineCore {
    /// Start a session over `doc` with default settings and shortcuts.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self::build(doc, &EditorConfig::default(), ShortcutMap::default())
    }

    /// Start a session over `doc` with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError`] if a shortcut override doesn't parse.
    pub fn with_config(doc: Document, config: &EditorConfig) -> Result<Self, KeymapError> {
        let keymap = config.shortcut_map()?;
        Ok(Self::build(doc, config, keymap))
    }

    fn build(mut doc: Document, config: &EditorConfig, keymap: ShortcutMap) -> Self {
        let viewport = Viewport::new(config.scale);
        if doc.normalize(&viewport) {
            debug!("normalized initial document");
        }
        Self {
            history: History::new(doc.clone(), config.history_limit),
            doc,
            draft: None,
            selection: Selection::default(),
            mode: EditMode::default(),
            input: InputState::default(),
            viewport,
            keymap,
            scheduler: FrameScheduler::new(),
            nudge: None,
            precision: false,
            axis_lock: AxisLock::None,
            page: config.page.max(1),
            snap_lines: Vec::new(),
            last_pointer: None,
            snap_threshold_px: config.snap_threshold_px,
            default_guide_offset: config.default_guide_offset,
        }
    }

    /// Replace the document and start a fresh history. Undersized fields and
    /// off-page guides are clamped before the first snapshot.
    pub fn load(&mut self, mut doc: Document) -> Vec<Action> {
        let normalized = doc.normalize(&self.viewport);
        debug!(fields = doc.len(), guides = doc.guides.len(), normalized, "load document");
        self.history.reset(doc.clone());
        self.doc = doc;
        self.draft = None;
        self.selection.clear();
        self.input = InputState::Idle;
        self.nudge = None;
        self.scheduler.clear();
        self.snap_lines.clear();
        self.axis_lock = AxisLock::None;
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::PointerDown { point, button, modifiers } => self.on_pointer_down(point, button, modifiers),
            Event::PointerMove { point } => self.on_pointer_move(point),
            Event::PointerUp { point, button } => self.on_pointer_up(point, button),
            Event::QueuePointerMove { point } => {
                self.queue_pointer_move(point);
                Vec::new()
            }
            Event::Frame { now_ms } => self.on_frame(now_ms),
            Event::KeyDown { key, modifiers, now_ms } => self.on_key_down(&Key::new(key), modifiers, now_ms),
            Event::KeyUp { key } => self.on_key_up(&Key::new(key)),
            Event::AddField => self.add_field(),
            Event::DeleteSelected => self.delete_selected(),
            Event::UpdateField { id, fields } => self.update_field(id, &fields),
            Event::AddGuide { orientation } => self.add_guide(orientation),
            Event::DeleteSelectedGuides => self.delete_selected_guides(),
            Event::CascadeGuides { count, orientation } => self.cascade_guides(count, orientation),
            Event::CascadeFieldsToGuides => self.cascade_fields_to_guides(),
            Event::FillFieldsFromGuides => self.fill_fields_from_guides(),
            Event::MergeSelected => self.merge_selected(),
            Event::StartSplit { orientation } => self.start_split(orientation),
            Event::CancelSplit => self.cancel_split(),
            Event::SetMode { mode } => self.set_mode(mode),
            Event::SetScale { scale } => self.set_scale(scale),
            Event::SetPage { page } => self.set_page(page),
            Event::SelectAll => self.select_all(),
            Event::Undo => self.undo(),
            Event::Redo => self.redo(),
        }
    }

    // --- Queries ---

    /// Authoritative document as of the last commit.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Geometry to draw: the in-progress draft if a gesture is active, else the document.
    #[must_use]
    pub fn geometry(&self) -> &Document {
        self.draft.as_ref().unwrap_or(&self.doc)
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn keymap(&self) -> &ShortcutMap {
        &self.keymap
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn precision(&self) -> bool {
        self.precision
    }

    #[must_use]
    pub fn axis_lock(&self) -> AxisLock {
        self.axis_lock
    }

    /// Snap lines active for the current gesture.
    #[must_use]
    pub fn snap_lines(&self) -> &[SnapLine] {
        &self.snap_lines
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Commit plumbing ---

    fn draft_mut(&mut self) -> &mut Document {
        self.draft.get_or_insert_with(|| self.doc.clone())
    }

    /// True (and logged) when a gesture or nudge is in flight.
    fn blocked(&self, op: &'static str) -> bool {
        let busy = !self.input.is_idle() || self.nudge.is_some();
        if busy {
            debug!(op, state = self.input.name(), "ignored during active gesture");
        }
        busy
    }

    fn apply_edit(&mut self, next: Document, reason: &'static str) -> Vec<Action> {
        if next == self.doc {
            debug!(reason, "no change to commit");
            return vec![Action::RenderNeeded];
        }
        self.doc = next;
        self.history.push(&self.doc);
        self.selection.retain_existing(&self.doc);
        debug!(
            reason,
            fields = self.doc.len(),
            guides = self.doc.guides.len(),
            history = self.history.len(),
            "committed"
        );
        vec![Action::Committed(self.doc.clone()), Action::RenderNeeded]
    }

    fn commit_draft(&mut self, reason: &'static str) -> Vec<Action> {
        match self.draft.take() {
            Some(draft) => self.apply_edit(draft, reason),
            None => vec![Action::RenderNeeded],
        }
    }

    fn restore(&mut self, doc: Document) -> Vec<Action> {
        self.doc = doc;
        self.draft = None;
        let before = self.selection.clone();
        self.selection.retain_existing(&self.doc);
        if !self.selection.guides().is_empty() {
            self.selection.clear();
        }
        let mut actions = vec![Action::Committed(self.doc.clone()), Action::RenderNeeded];
        if self.selection != before {
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    fn flush_pending_move(&mut self) -> Vec<Action> {
        match self.scheduler.take() {
            Some(point) => self.on_pointer_move(point),
            None => Vec::new(),
        }
    }

    fn snap_tolerance(&self) -> f64 {
        self.viewport.snap_tolerance(self.snap_threshold_px)
    }

    fn page_of(&self, id: &FieldId) -> u32 {
        self.doc.field(id).map_or(self.page, |f| f.page)
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, point: ScreenPoint, button: Button, modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        if matches!(self.input, InputState::Splitting { .. }) {
            self.last_pointer = Some(point);
            return self.commit_split(point);
        }
        if self.blocked("pointer_down") {
            return Vec::new();
        }

        self.last_pointer = Some(point);
        self.scheduler.clear();
        self.axis_lock = AxisLock::None;
        self.snap_lines.clear();

        let at = self.viewport.to_page(point);
        match hit_test(at, &self.doc, &self.viewport, &self.selection, self.mode, self.page) {
            Some(Hit::Field { id, part: HitPart::Handle(corner) }) => self.press_handle(id, corner, point),
            Some(Hit::Field { id, part: HitPart::Body }) => self.press_field(id, point, modifiers.shift),
            Some(Hit::Guide(guide)) => self.press_guide(guide, point, modifiers.shift),
            None => {
                let had_selection = !self.selection.is_empty();
                self.selection.clear();
                self.input = InputState::BoxSelecting { origin: point, current: point };
                trace!(x = point.x, y = point.y, "box select start");
                if had_selection {
                    vec![Action::SelectionChanged, Action::RenderNeeded]
                } else {
                    vec![Action::RenderNeeded]
                }
            }
        }
    }

    fn anchor_for(&self, pointer: ScreenPoint, ids: &[FieldId], guides: &[GuideRef]) -> DragAnchor {
        DragAnchor {
            pointer,
            rects: ids.iter().filter_map(|id| self.doc.field(id)).map(|f| (f.id, f.rect())).collect(),
            guides: guides.iter().filter_map(|g| self.doc.guides.get(*g).map(|pos| (*g, pos))).collect(),
        }
    }

    fn press_handle(&mut self, id: FieldId, corner: Corner, point: ScreenPoint) -> Vec<Action> {
        let anchor = self.anchor_for(point, &[id], &[]);
        self.input = InputState::Resizing { id, corner, anchor };
        trace!(%id, ?corner, "resize start");
        vec![Action::RenderNeeded]
    }

    fn press_field(&mut self, id: FieldId, point: ScreenPoint, shift: bool) -> Vec<Action> {
        let click_selects = !shift && self.selection.contains_field(&id) && self.selection.fields().len() > 1;
        if !self.selection.press_field(id, shift) {
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        let ids = self.selection.fields().to_vec();
        let anchor = self.anchor_for(point, &ids, &[]);
        self.input = InputState::DraggingFields { id, multi: ids.len() > 1, press: point, click_selects, anchor };
        trace!(%id, count = ids.len(), "drag start");
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    fn press_guide(&mut self, guide: GuideRef, point: ScreenPoint, shift: bool) -> Vec<Action> {
        let click_selects = !shift && self.selection.contains_guide(guide) && self.selection.guides().len() > 1;
        if !self.selection.press_guide(guide, shift) {
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        let refs = self.selection.guides().to_vec();
        let anchor = self.anchor_for(point, &[], &refs);
        self.input = InputState::DraggingGuides { guide, multi: refs.len() > 1, press: point, click_selects, anchor };
        trace!(?guide, count = refs.len(), "guide drag start");
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn on_pointer_move(&mut self, point: ScreenPoint) -> Vec<Action> {
        self.last_pointer = Some(point);
        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::DraggingFields { id, multi, anchor, .. } => self.drag_fields(id, multi, &anchor, point),
            InputState::Resizing { id, corner, anchor } => self.resize_field(id, corner, &anchor, point),
            InputState::DraggingGuides { anchor, .. } => self.drag_guides(&anchor, point),
            InputState::BoxSelecting { origin, .. } => self.update_box(origin, point),
            InputState::Splitting { id, orientation, .. } => self.track_split(id, orientation, point),
        }
    }

    /// Park a pointer move until the next [`EngineCore::on_frame`].
    pub fn queue_pointer_move(&mut self, point: ScreenPoint) {
        if self.scheduler.queue(point) {
            trace!(dropped = self.scheduler.dropped(), "coalesced pointer move");
        }
    }

    /// Guide and sibling snapping for a single moving field. Returns the lines that fired.
    fn snap_moving(&self, id: FieldId, rect: &mut Rect) -> Vec<SnapLine> {
        let tolerance = self.snap_tolerance();
        let guides = &self.doc.guides;
        let mut lines = Vec::new();

        let left = snap_to_guides(rect.x, &guides.vertical, tolerance);
        if left.snapped {
            rect.x = left.value;
            lines.push(SnapLine::vertical(left.value));
        } else {
            let right = snap_to_guides(rect.right(), &guides.vertical, tolerance);
            if right.snapped {
                rect.x = right.value - rect.width;
                lines.push(SnapLine::vertical(right.value));
            }
        }

        let snapped = snap_to_fields(&self.doc, &id, self.page_of(&id), *rect, &guides.horizontal, tolerance);
        rect.x = snapped.x;
        rect.y = snapped.y;
        lines.extend(snapped.lines);
        lines
    }

    fn drag_fields(&mut self, id: FieldId, multi: bool, anchor: &DragAnchor, point: ScreenPoint) -> Vec<Action> {
        let (dx, dy) = drag_delta(anchor.pointer, point, &self.viewport, self.precision, self.axis_lock);
        let mut moved: Vec<(FieldId, Rect)> = anchor.rects.iter().map(|(fid, r)| (*fid, translate(*r, dx, dy))).collect();
        let mut lines = Vec::new();

        if !multi && !self.precision {
            if let Some((_, rect)) = moved.iter_mut().find(|(fid, _)| *fid == id) {
                let unsnapped = *rect;
                lines = self.snap_moving(id, rect);
                match self.axis_lock {
                    AxisLock::None => {}
                    AxisLock::X => {
                        rect.y = unsnapped.y;
                        lines.retain(|l| l.orientation == Orientation::Vertical);
                    }
                    AxisLock::Y => {
                        rect.x = unsnapped.x;
                        lines.retain(|l| l.orientation == Orientation::Horizontal);
                    }
                }
            }
        }

        let draft = self.draft_mut();
        for (fid, rect) in moved {
            if let Some(field) = draft.field_mut(&fid) {
                field.x = rect.x;
                field.y = rect.y;
            }
        }
        self.snap_lines = lines;
        vec![Action::RenderNeeded]
    }

    fn resize_field(&mut self, id: FieldId, corner: Corner, anchor: &DragAnchor, point: ScreenPoint) -> Vec<Action> {
        let Some(&(_, orig)) = anchor.rects.first() else {
            return Vec::new();
        };
        let (dx, dy) = drag_delta(anchor.pointer, point, &self.viewport, self.precision, self.axis_lock);
        let mut rect = resize_from_corner(orig, corner, dx, dy);
        let mut lines = Vec::new();
        if !self.precision {
            (rect, lines) = snap_resize_edges(
                &self.doc,
                &id,
                self.page_of(&id),
                rect,
                corner_edges(corner),
                &self.doc.guides.vertical,
                &self.doc.guides.horizontal,
                self.snap_tolerance(),
            );
        }
        let rect = clamp_resize(rect, corner);
        if let Some(field) = self.draft_mut().field_mut(&id) {
            field.set_rect(rect);
        }
        self.snap_lines = lines;
        vec![Action::RenderNeeded]
    }

    fn drag_guides(&mut self, anchor: &DragAnchor, point: ScreenPoint) -> Vec<Action> {
        let (dx, dy) = drag_delta(anchor.pointer, point, &self.viewport, self.precision, self.axis_lock);
        let viewport = self.viewport;
        let draft = self.draft_mut();
        for (guide, origin) in &anchor.guides {
            let delta = match guide.orientation {
                Orientation::Vertical => dx,
                Orientation::Horizontal => dy,
            };
            guides::move_guide(&mut draft.guides, *guide, origin + delta, &viewport);
        }
        vec![Action::RenderNeeded]
    }

    fn update_box(&mut self, origin: ScreenPoint, point: ScreenPoint) -> Vec<Action> {
        self.input = InputState::BoxSelecting { origin, current: point };
        let a = self.viewport.to_page(origin);
        let b = self.viewport.to_page(point);
        let area = Rect::from_corners(a.x, a.y, b.x, b.y);

        let before = self.selection.clone();
        match self.mode {
            EditMode::Field => self.selection.set_fields(fields_in_box(&self.doc, self.page, &area)),
            EditMode::Guide => self.selection.set_guides(guides_in_box(&self.doc.guides, &area)),
        }
        if self.selection == before {
            vec![Action::RenderNeeded]
        } else {
            vec![Action::SelectionChanged, Action::RenderNeeded]
        }
    }

    pub fn on_pointer_up(&mut self, point: ScreenPoint, button: Button) -> Vec<Action> {
        if button != Button::Primary || matches!(self.input, InputState::Idle | InputState::Splitting { .. }) {
            return Vec::new();
        }

        let mut actions = self.flush_pending_move();
        if self.last_pointer != Some(point) {
            actions.extend(self.on_pointer_move(point));
        }

        let state = mem::take(&mut self.input);
        self.axis_lock = AxisLock::None;
        self.snap_lines.clear();

        match state {
            InputState::DraggingFields { id, press, click_selects, .. } => {
                if click_selects && press.distance(point) < CLICK_SLOP_PX {
                    trace!(%id, "click narrows selection");
                    self.draft = None;
                    self.selection.set_fields(vec![id]);
                    actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
                } else {
                    actions.extend(self.commit_draft("move_fields"));
                }
            }
            InputState::DraggingGuides { guide, press, click_selects, .. } => {
                if click_selects && press.distance(point) < CLICK_SLOP_PX {
                    self.draft = None;
                    self.selection.set_guides(vec![guide]);
                    actions.extend([Action::SelectionChanged, Action::RenderNeeded]);
                } else {
                    actions.extend(self.commit_draft("move_guides"));
                }
            }
            InputState::Resizing { .. } => actions.extend(self.commit_draft("resize")),
            InputState::BoxSelecting { origin, .. } => {
                if (origin.x - point.x).abs() < CLICK_SLOP_PX || (origin.y - point.y).abs() < CLICK_SLOP_PX {
                    if !self.selection.is_empty() {
                        self.selection.clear();
                        actions.push(Action::SelectionChanged);
                    }
                }
                actions.push(Action::RenderNeeded);
            }
            InputState::Idle | InputState::Splitting { .. } => {}
        }
        actions
    }

    /// Apply the latest queued pointer move and any due nudge repeats.
    pub fn on_frame(&mut self, now_ms: u64) -> Vec<Action> {
        let mut actions = self.flush_pending_move();
        if let Some(mut nudge) = self.nudge {
            let steps = nudge.due_steps(now_ms, self.precision);
            self.nudge = Some(nudge);
            if !steps.is_empty() {
                for step in steps {
                    self.apply_nudge(nudge.direction, step);
                }
                actions.push(Action::RenderNeeded);
            }
        }
        actions
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, now_ms: u64) -> Vec<Action> {
        let Some(action) = self.keymap.resolve(key, modifiers) else {
            trace!(key = %key.0, "unbound key");
            return Vec::new();
        };
        debug!(action = action.name(), "shortcut");
        match action {
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::Delete => match self.mode {
                EditMode::Field => self.delete_selected(),
                EditMode::Guide => self.delete_selected_guides(),
            },
            EditorAction::Cancel => self.cancel(),
            EditorAction::PrecisionMode => self.set_precision(true),
            EditorAction::LockAxisX => self.lock_axis(AxisLock::X),
            EditorAction::LockAxisY => self.lock_axis(AxisLock::Y),
            EditorAction::NudgeLeft => self.start_nudge(NudgeDirection::Left, now_ms),
            EditorAction::NudgeRight => self.start_nudge(NudgeDirection::Right, now_ms),
            EditorAction::NudgeUp => self.start_nudge(NudgeDirection::Up, now_ms),
            EditorAction::NudgeDown => self.start_nudge(NudgeDirection::Down, now_ms),
            EditorAction::ToggleMode => self.set_mode(match self.mode {
                EditMode::Field => EditMode::Guide,
                EditMode::Guide => EditMode::Field,
            }),
            EditorAction::SelectAll => self.select_all(),
            EditorAction::MergeFields => self.merge_selected(),
            EditorAction::SplitVertical => self.start_split(Orientation::Vertical),
            EditorAction::SplitHorizontal => self.start_split(Orientation::Horizontal),
        }
    }

    pub fn on_key_up(&mut self, key: &Key) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.precision && self.keymap.is_release_of(key, EditorAction::PrecisionMode) {
            actions.extend(self.set_precision(false));
        }
        if let Some(nudge) = self.nudge {
            if self.keymap.is_release_of(key, nudge_action(nudge.direction)) {
                self.nudge = None;
                actions.extend(self.commit_draft("nudge"));
            }
        }
        actions
    }

    fn cancel(&mut self) -> Vec<Action> {
        if matches!(self.input, InputState::Splitting { .. }) {
            return self.cancel_split();
        }
        if self.input.is_idle() && self.nudge.is_none() && !self.selection.is_empty() {
            self.selection.clear();
            return vec![Action::SelectionChanged, Action::RenderNeeded];
        }
        Vec::new()
    }

    fn rebase_anchor(&mut self) {
        let Some(pointer) = self.last_pointer else {
            return;
        };
        let geometry = self.draft.as_ref().unwrap_or(&self.doc);
        match &mut self.input {
            InputState::DraggingFields { anchor, .. }
            | InputState::Resizing { anchor, .. }
            | InputState::DraggingGuides { anchor, .. } => *anchor = rebased(anchor, pointer, geometry),
            InputState::Idle | InputState::BoxSelecting { .. } | InputState::Splitting { .. } => {}
        }
    }

    /// Enter or leave precision mode.
    ///
    /// An active drag is re-anchored at the current pointer and geometry, so
    /// the toggle itself never moves anything.
    pub fn set_precision(&mut self, enabled: bool) -> Vec<Action> {
        if self.precision == enabled {
            return Vec::new();
        }
        let mut actions = self.flush_pending_move();
        self.precision = enabled;
        self.rebase_anchor();
        if enabled {
            self.snap_lines.clear();
        }
        debug!(enabled, state = self.input.name(), "precision mode");
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Lock the current drag to one axis. Repeating the same lock releases it.
    pub fn lock_axis(&mut self, axis: AxisLock) -> Vec<Action> {
        if !matches!(
            self.input,
            InputState::DraggingFields { .. } | InputState::Resizing { .. } | InputState::DraggingGuides { .. }
        ) {
            debug!(state = self.input.name(), "axis lock outside a drag");
            return Vec::new();
        }
        let mut actions = self.flush_pending_move();
        self.axis_lock = if self.axis_lock == axis { AxisLock::None } else { axis };
        self.rebase_anchor();
        debug!(lock = ?self.axis_lock, "axis lock");
        actions.push(Action::RenderNeeded);
        actions
    }

    fn start_nudge(&mut self, direction: NudgeDirection, now_ms: u64) -> Vec<Action> {
        if self.nudge.is_some() {
            return Vec::new();
        }
        if self.blocked("nudge") {
            return Vec::new();
        }
        if self.selection.is_empty() {
            debug!("nudge with empty selection");
            return Vec::new();
        }
        self.nudge = Some(Nudge::new(direction, now_ms));
        self.apply_nudge(direction, nudge_step(0, self.precision));
        vec![Action::RenderNeeded]
    }

    fn apply_nudge(&mut self, direction: NudgeDirection, step: f64) {
        let (ux, uy) = direction.unit();
        let (dx, dy) = (ux * step, uy * step);
        let horizontal = matches!(direction, NudgeDirection::Left | NudgeDirection::Right);
        let viewport = self.viewport;
        let fields = self.selection.fields().to_vec();
        let refs = self.selection.guides().to_vec();

        let draft = self.draft_mut();
        for id in &fields {
            if let Some(field) = draft.field_mut(id) {
                field.x += dx;
                field.y += dy;
            }
        }
        for guide in refs {
            let delta = match (guide.orientation, horizontal) {
                (Orientation::Vertical, true) => dx,
                (Orientation::Horizontal, false) => dy,
                _ => continue,
            };
            if let Some(position) = draft.guides.get(guide) {
                guides::move_guide(&mut draft.guides, guide, position + delta, &viewport);
            }
        }
    }

    // --- Field commands ---

    /// Add a default-sized field on the current page.
    pub fn add_field(&mut self) -> Vec<Action> {
        if self.blocked("add_field") {
            return Vec::new();
        }
        let rect = Rect::new(DEFAULT_FIELD_X, DEFAULT_FIELD_Y, DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT);
        let field = Field::new(self.page, rect, format!("Field {}", self.doc.len() + 1));
        let id = field.id;
        let mut next = self.doc.clone();
        next.push(field);
        let mut actions = self.apply_edit(next, "add_field");
        if self.mode == EditMode::Field {
            self.selection.set_fields(vec![id]);
            actions.push(Action::SelectionChanged);
        }
        actions
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        if self.blocked("delete_selected") {
            return Vec::new();
        }
        let ids = self.selection.fields().to_vec();
        if ids.is_empty() {
            debug!("delete with no fields selected");
            return Vec::new();
        }
        let mut next = self.doc.clone();
        for id in &ids {
            next.remove(id);
        }
        self.selection.clear();
        let mut actions = self.apply_edit(next, "delete_fields");
        actions.push(Action::SelectionChanged);
        actions
    }

    /// Sparse property edit. Unknown ids are ignored.
    pub fn update_field(&mut self, id: FieldId, partial: &PartialField) -> Vec<Action> {
        if self.blocked("update_field") {
            return Vec::new();
        }
        let mut next = self.doc.clone();
        if !next.apply_partial(&id, partial) {
            debug!(%id, "update for unknown field");
            return Vec::new();
        }
        self.apply_edit(next, "update_field")
    }

    /// Stack copies of the selected field down the horizontal guides below it.
    pub fn cascade_fields_to_guides(&mut self) -> Vec<Action> {
        if self.blocked("cascade_fields") {
            return Vec::new();
        }
        let Some(template) = self.selection.single_field().and_then(|id| self.doc.field(&id)) else {
            debug!("cascade needs exactly one selected field");
            return Vec::new();
        };
        let created = batch::cascade_fields_to_guides(template, &self.doc.guides.horizontal);
        if created.is_empty() {
            debug!("cascade found fewer than two guides below the template");
            return Vec::new();
        }
        let mut next = self.doc.clone();
        next.fields.extend(created);
        self.apply_edit(next, "cascade_fields")
    }

    /// Fill the grid (or rows) formed by the selected guides with fields.
    pub fn fill_fields_from_guides(&mut self) -> Vec<Action> {
        if self.blocked("fill_fields") {
            return Vec::new();
        }
        let horizontal = self.selection.guide_positions(&self.doc.guides, Orientation::Horizontal);
        if horizontal.len() < 2 {
            debug!(selected = horizontal.len(), "fill needs two horizontal guides");
            return Vec::new();
        }
        let vertical = self.selection.guide_positions(&self.doc.guides, Orientation::Vertical);
        let created = batch::fill_fields_from_guides(&horizontal, &vertical, self.page, &self.viewport);
        if created.is_empty() {
            return Vec::new();
        }
        let mut next = self.doc.clone();
        next.fields.extend(created);
        self.apply_edit(next, "fill_fields")
    }

    /// Replace the selected fields with their bounding box.
    pub fn merge_selected(&mut self) -> Vec<Action> {
        if self.blocked("merge") {
            return Vec::new();
        }
        let Some((merged, replaced)) = merge_fields(&self.doc, self.selection.fields()) else {
            debug!(selected = self.selection.fields().len(), "merge needs two fields on one page");
            return Vec::new();
        };
        let merged_id = merged.id;
        let first = replaced.first().copied();
        let mut merged = Some(merged);
        let mut next = self.doc.clone();
        next.fields = mem::take(&mut next.fields)
            .into_iter()
            .filter_map(|f| {
                if Some(f.id) == first {
                    merged.take()
                } else if replaced.contains(&f.id) {
                    None
                } else {
                    Some(f)
                }
            })
            .collect();
        self.selection.set_fields(vec![merged_id]);
        let mut actions = self.apply_edit(next, "merge");
        actions.push(Action::SelectionChanged);
        actions
    }

    /// Enter split mode on the single selected field.
    pub fn start_split(&mut self, orientation: Orientation) -> Vec<Action> {
        if self.blocked("start_split") {
            return Vec::new();
        }
        let Some(id) = self.selection.single_field().filter(|id| self.doc.field(id).is_some()) else {
            debug!("split needs exactly one selected field");
            return Vec::new();
        };
        self.input = InputState::Splitting { id, orientation, position: None };
        debug!(%id, ?orientation, "split start");
        vec![Action::RenderNeeded]
    }

    pub fn cancel_split(&mut self) -> Vec<Action> {
        if !matches!(self.input, InputState::Splitting { .. }) {
            return Vec::new();
        }
        self.input = InputState::Idle;
        debug!("split cancelled");
        vec![Action::RenderNeeded]
    }

    /// Clamped, guide-snapped cut position under `point`.
    fn split_position(&self, rect: &Rect, orientation: Orientation, point: ScreenPoint) -> f64 {
        let at = self.viewport.to_page(point);
        let raw = match orientation {
            Orientation::Vertical => at.x,
            Orientation::Horizontal => at.y,
        };
        let clamped = clamp_split_position(rect, orientation, raw);
        let snap = snap_to_guides(clamped, self.doc.guides.list(orientation), self.snap_tolerance());
        if snap.snapped { clamp_split_position(rect, orientation, snap.value) } else { clamped }
    }

    fn track_split(&mut self, id: FieldId, orientation: Orientation, point: ScreenPoint) -> Vec<Action> {
        let Some(rect) = self.doc.field(&id).map(Field::rect) else {
            debug!(%id, "split target vanished");
            self.input = InputState::Idle;
            return vec![Action::RenderNeeded];
        };
        let position = self.split_position(&rect, orientation, point);
        self.input = InputState::Splitting { id, orientation, position: Some(position) };
        vec![Action::RenderNeeded]
    }

    fn commit_split(&mut self, point: ScreenPoint) -> Vec<Action> {
        let InputState::Splitting { id, orientation, .. } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        let Some(index) = self.doc.index_of(&id) else {
            debug!(%id, "split target vanished");
            return vec![Action::RenderNeeded];
        };
        let source = &self.doc.fields[index];
        let position = self.split_position(&source.rect(), orientation, point);
        let (first, second) = split_field(source, orientation, position);
        let ids = vec![first.id, second.id];

        let mut next = self.doc.clone();
        next.fields.remove(index);
        next.fields.insert(index, second);
        next.fields.insert(index, first);
        self.selection.set_fields(ids);
        let mut actions = self.apply_edit(next, "split");
        actions.push(Action::SelectionChanged);
        actions
    }

    // --- Guide commands ---

    /// Add a guide at the configured default offset.
    pub fn add_guide(&mut self, orientation: Orientation) -> Vec<Action> {
        if self.blocked("add_guide") {
            return Vec::new();
        }
        let mut next = self.doc.clone();
        guides::add_guide(&mut next.guides, orientation, self.default_guide_offset, &self.viewport);
        self.apply_edit(next, "add_guide")
    }

    pub fn delete_selected_guides(&mut self) -> Vec<Action> {
        if self.blocked("delete_guides") {
            return Vec::new();
        }
        let refs = self.selection.guides().to_vec();
        if refs.is_empty() {
            debug!("delete with no guides selected");
            return Vec::new();
        }
        let mut next = self.doc.clone();
        guides::delete_guides(&mut next.guides, &refs);
        self.selection.clear();
        let mut actions = self.apply_edit(next, "delete_guides");
        actions.push(Action::SelectionChanged);
        actions
    }

    /// Continue the spacing of the selected guides of one orientation.
    pub fn cascade_guides(&mut self, count: usize, orientation: Orientation) -> Vec<Action> {
        if self.blocked("cascade_guides") {
            return Vec::new();
        }
        let positions = self.selection.guide_positions(&self.doc.guides, orientation);
        if positions.len() < 2 {
            debug!(selected = positions.len(), ?orientation, "cascade needs two guides");
            return Vec::new();
        }
        let mut next = self.doc.clone();
        let created = guides::cascade_guides(&mut next.guides, &positions, count, orientation, &self.viewport);
        if created.is_empty() {
            debug!("cascade created no guides");
            return Vec::new();
        }
        self.apply_edit(next, "cascade_guides")
    }

    // --- Session commands ---

    /// Switch between field and guide editing. Clears the selection.
    pub fn set_mode(&mut self, mode: EditMode) -> Vec<Action> {
        if self.mode == mode || self.blocked("set_mode") {
            return Vec::new();
        }
        self.mode = mode;
        self.selection.clear();
        debug!(?mode, "mode");
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Change the zoom. Non-positive or non-finite scales are ignored.
    pub fn set_scale(&mut self, scale: f64) -> Vec<Action> {
        let mut actions = self.flush_pending_move();
        if !self.viewport.set_scale(scale) {
            debug!(scale, "ignored invalid scale");
            return actions;
        }
        self.rebase_anchor();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch the visible page (1-based; 0 is treated as 1). Clears the selection.
    pub fn set_page(&mut self, page: u32) -> Vec<Action> {
        let page = page.max(1);
        if self.page == page || self.blocked("set_page") {
            return Vec::new();
        }
        self.page = page;
        self.selection.clear();
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    /// Select every field on the current page, or every guide in guide mode.
    pub fn select_all(&mut self) -> Vec<Action> {
        if self.blocked("select_all") {
            return Vec::new();
        }
        match self.mode {
            EditMode::Field => self.selection.set_fields(self.doc.on_page(self.page).map(|f| f.id).collect()),
            EditMode::Guide => self.selection.set_guides(self.doc.guides.refs()),
        }
        vec![Action::SelectionChanged, Action::RenderNeeded]
    }

    pub fn undo(&mut self) -> Vec<Action> {
        if self.blocked("undo") {
            return Vec::new();
        }
        let Some(doc) = self.history.undo().cloned() else {
            debug!("nothing to undo");
            return Vec::new();
        };
        debug!(index = self.history.index(), len = self.history.len(), "undo");
        self.restore(doc)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if self.blocked("redo") {
            return Vec::new();
        }
        let Some(doc) = self.history.redo().cloned() else {
            debug!("nothing to redo");
            return Vec::new();
        };
        debug!(index = self.history.index(), len = self.history.len(), "redo");
        self.restore(doc)
    }
}
