use std::collections::HashSet;

use eframe::egui::{
    Align2, Color32, CursorIcon, FontId, Painter, PointerButton, Sense, Stroke, Ui, Vec2, vec2,
};

use crate::layout::{
    GlyphShape, HierarchyGlyph, HierarchyLayoutKind, HitAction, TREE_LEAF_RADIUS, TREE_NODE_RADIUS,
};
use crate::util::truncate_label;

use super::super::render_utils::{
    HOVER_STROKE, MATCH_COLOR, SELECTED_COLOR, faded, group_color, leaf_color, with_alpha,
};
use super::super::{SelectionEvent, SelectionState, ViewModel};
use super::stroke_rect;

impl ViewModel {
    /// One frame of the hierarchical view in whichever engine is active.
    /// Clicks go through the layout's depth-aware dispatch, so a depth-1 hit
    /// selects the whole group while a leaf hit selects one record.
    pub(in crate::app) fn draw_hierarchy(&mut self, ui: &mut Ui, events: &mut Vec<SelectionEvent>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        self.ensure_hierarchy_layout(rect.width(), rect.height());
        let selection = self.selection.clone();
        let matches = self.cached_search_matches();
        let Some(cache) = self.hierarchy_cache.take() else {
            return;
        };
        let layout = &cache.layout;

        if layout.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "no records to group",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            self.hierarchy_last_hover = None;
            self.hierarchy_cache = Some(cache);
            return;
        }

        let offset = rect.min.to_vec2();
        let pointer_local = response.hover_pos().map(|pos| pos - offset);
        let modifier = ui.input(|input| input.modifiers.command);
        let hovered_now = pointer_local.and_then(|pos| layout.hovered_record(pos));

        let edge_stroke = Stroke::new(1.0, ui.visuals().weak_text_color());
        for (from, to) in &layout.edges {
            painter.line_segment([*from + offset, *to + offset], edge_stroke);
        }

        for glyph in &layout.glyphs {
            paint_glyph(
                &painter,
                layout.kind,
                glyph,
                &selection,
                matches.as_deref(),
                offset,
                ui.visuals().weak_text_color(),
            );
        }
        for glyph in &layout.glyphs {
            paint_label(
                &painter,
                layout.kind,
                glyph,
                &selection,
                offset,
                ui.visuals().strong_text_color(),
            );
        }

        let can_interact = pointer_local
            .is_some_and(|pos| layout.hit_action(pos, modifier).is_some());
        if can_interact {
            ui.output_mut(|out| out.cursor_icon = CursorIcon::PointingHand);
        }

        match hovered_now {
            Some(index) => {
                if selection.hovered() != Some(index) {
                    events.push(SelectionEvent::HoverEnter(index));
                }
            }
            None => {
                if let Some(previous) = self.hierarchy_last_hover
                    && selection.hovered() == Some(previous)
                {
                    events.push(SelectionEvent::HoverLeave);
                }
            }
        }
        self.hierarchy_last_hover = hovered_now;

        if response.clicked_by(PointerButton::Primary)
            && let Some(pos) = pointer_local
        {
            match layout.hit_action(pos, modifier) {
                Some(HitAction::Single(index)) => events.push(SelectionEvent::Select(index)),
                Some(HitAction::Group(indices)) => {
                    events.push(SelectionEvent::SelectGroup(indices));
                }
                None => {}
            }
        }

        self.hierarchy_cache = Some(cache);
    }
}

fn leaf_fill(
    glyph: &HierarchyGlyph,
    selection: &SelectionState,
    matches: Option<&HashSet<usize>>,
) -> Color32 {
    let base = leaf_color(glyph.group_index);
    let Some(index) = glyph.record_index else {
        return base;
    };

    if selection.is_selected(index) {
        SELECTED_COLOR
    } else if matches.is_some_and(|set| set.contains(&index)) {
        MATCH_COLOR
    } else if selection.has_selection() {
        faded(base)
    } else {
        base
    }
}

fn paint_glyph(
    painter: &Painter,
    kind: HierarchyLayoutKind,
    glyph: &HierarchyGlyph,
    selection: &SelectionState,
    matches: Option<&HashSet<usize>>,
    offset: Vec2,
    weak_color: Color32,
) {
    let is_hovered = glyph
        .record_index
        .is_some_and(|index| selection.hovered() == Some(index));

    match glyph.shape {
        GlyphShape::Circle { center, radius } => {
            let center = center + offset;
            match glyph.depth {
                0 => {
                    if kind == HierarchyLayoutKind::Tree {
                        painter.circle_filled(center, radius, weak_color);
                    } else {
                        painter.circle_stroke(center, radius, Stroke::new(1.0, weak_color));
                    }
                }
                1 => {
                    let color = group_color(glyph.group_index);
                    if kind == HierarchyLayoutKind::Tree {
                        painter.circle_filled(center, radius, color);
                    } else {
                        painter.circle_filled(center, radius, with_alpha(color, 56));
                        painter.circle_stroke(center, radius, Stroke::new(1.5, color));
                    }
                }
                _ => {
                    painter.circle_filled(center, radius, leaf_fill(glyph, selection, matches));
                    if is_hovered {
                        painter.circle_stroke(
                            center,
                            radius + 1.5,
                            Stroke::new(1.5, HOVER_STROKE),
                        );
                    }
                }
            }
        }
        GlyphShape::Rect(tile) => {
            let tile = tile.translate(offset);
            // Half-pixel shrink leaves a hairline seam between sibling tiles.
            painter.rect_filled(tile.shrink(0.5), 0.0, leaf_fill(glyph, selection, matches));
            if is_hovered {
                stroke_rect(painter, tile, Stroke::new(1.5, HOVER_STROKE));
            }
        }
    }
}

/// Labels draw in a second pass so later glyphs cannot cover them. Visibility
/// depends on the engine: packed circles and treemap tiles label only what is
/// big enough to hold text, the node-link tree always labels groups but shows
/// leaf labels only on hover or selection.
fn paint_label(
    painter: &Painter,
    kind: HierarchyLayoutKind,
    glyph: &HierarchyGlyph,
    selection: &SelectionState,
    offset: Vec2,
    color: Color32,
) {
    if glyph.label.is_empty() {
        return;
    }
    let font = FontId::proportional(11.0);
    let highlighted = glyph.record_index.is_some_and(|index| {
        selection.is_selected(index) || selection.hovered() == Some(index)
    });

    match (kind, glyph.shape) {
        (HierarchyLayoutKind::CirclePacking, GlyphShape::Circle { center, radius }) => {
            let visible = match glyph.depth {
                1 => radius > 25.0,
                2 => radius > 12.0 || highlighted,
                _ => false,
            };
            if visible {
                let max_chars = ((radius * 2.0) / 6.0).max(4.0) as usize;
                painter.text(
                    center + offset,
                    Align2::CENTER_CENTER,
                    truncate_label(&glyph.label, max_chars),
                    font,
                    color,
                );
            }
        }
        (HierarchyLayoutKind::Treemap, GlyphShape::Rect(tile)) => {
            if (tile.width() > 30.0 && tile.height() > 16.0) || highlighted {
                let max_chars = ((tile.width() / 6.0).max(4.0)) as usize;
                painter.text(
                    tile.min + offset + vec2(3.0, 2.0),
                    Align2::LEFT_TOP,
                    truncate_label(&glyph.label, max_chars),
                    font,
                    color,
                );
            }
        }
        (HierarchyLayoutKind::Tree, GlyphShape::Circle { center, .. }) => match glyph.depth {
            1 => {
                painter.text(
                    center + offset - vec2(TREE_NODE_RADIUS + 4.0, 0.0),
                    Align2::RIGHT_CENTER,
                    truncate_label(&glyph.label, 22),
                    font,
                    color,
                );
            }
            2 if highlighted => {
                painter.text(
                    center + offset + vec2(TREE_LEAF_RADIUS + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    truncate_label(&glyph.label, 24),
                    font,
                    color,
                );
            }
            _ => {}
        },
        _ => {}
    }
}
