use std::collections::HashMap;

use eframe::egui::{
    Align2, Color32, CursorIcon, FontId, Painter, PointerButton, Pos2, Rect, Sense, Stroke, Ui,
    vec2,
};

use crate::data::Dataset;
use crate::hierarchy::UNKNOWN_GROUP;
use crate::layout::ScatterLayout;
use crate::util::format_number;

use super::super::render_utils::{
    HOVER_STROKE, MATCH_COLOR, SELECTED_COLOR, faded, group_color, with_alpha,
};
use super::super::{SelectionEvent, ViewModel};
use super::stroke_rect;

const POINT_RADIUS: f32 = 3.0;
/// Pointer slack around a point when hit-testing clicks and hover.
const POINT_HIT_RADIUS: f32 = 6.0;
const BRUSH_COLOR: Color32 = Color32::from_rgb(140, 190, 240);

impl ViewModel {
    /// One frame of the scatterplot: points, axes, hover, click-to-select,
    /// and the rubber-band brush. Emits selection events instead of mutating
    /// state directly.
    pub(in crate::app) fn draw_scatter(&mut self, ui: &mut Ui, events: &mut Vec<SelectionEvent>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        self.ensure_scatter_layout(rect.width(), rect.height());
        let selection = self.selection.clone();
        let matches = self.cached_search_matches();
        let groups = record_group_indices(&self.dataset, &self.params.group_attr);
        let Some(cache) = self.scatter_cache.take() else {
            return;
        };
        let layout = &cache.layout;

        let offset = rect.min.to_vec2();
        let to_screen = |pos: Pos2| pos + offset;
        let to_local = |pos: Pos2| pos - offset;

        draw_axes(
            &painter,
            rect,
            layout,
            &self.params.x_attr,
            &self.params.y_attr,
            ui.visuals().weak_text_color(),
        );

        for point in &layout.points {
            let center = to_screen(point.pos);
            let is_selected = selection.is_selected(point.record_index);
            let is_match = matches
                .as_ref()
                .is_some_and(|set| set.contains(&point.record_index));

            let base = group_color(groups.get(&point.record_index).copied().unwrap_or(0));
            let fill = if is_selected {
                SELECTED_COLOR
            } else if is_match {
                MATCH_COLOR
            } else if selection.has_selection() {
                faded(base)
            } else {
                base
            };
            painter.circle_filled(center, POINT_RADIUS, fill);

            if selection.hovered() == Some(point.record_index) {
                painter.circle_stroke(center, POINT_RADIUS + 2.5, Stroke::new(1.5, HOVER_STROKE));
            }
        }

        if layout.points.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "no plottable records",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
        }

        let pointer_local = response.hover_pos().map(to_local);
        let hovered_now = pointer_local.and_then(|pos| nearest_point(layout, pos));

        if hovered_now.is_some() {
            ui.output_mut(|out| out.cursor_icon = CursorIcon::PointingHand);
        }
        match hovered_now {
            Some(index) => {
                if selection.hovered() != Some(index) {
                    events.push(SelectionEvent::HoverEnter(index));
                }
            }
            None => {
                if let Some(previous) = self.scatter_last_hover
                    && selection.hovered() == Some(previous)
                {
                    events.push(SelectionEvent::HoverLeave);
                }
            }
        }
        self.scatter_last_hover = hovered_now;

        if response.drag_started_by(PointerButton::Primary)
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.scatter_brush_start = Some(to_local(pos));
        }

        let brush = match (self.scatter_brush_start, response.interact_pointer_pos()) {
            (Some(start), Some(current)) => Some(Rect::from_two_pos(start, to_local(current))),
            _ => None,
        };

        if response.drag_stopped_by(PointerButton::Primary) {
            if let Some(brush) = brush {
                events.push(SelectionEvent::Brush(layout.brush_select(brush)));
            }
            self.scatter_brush_start = None;
        } else if let Some(brush) = brush
            && response.dragged_by(PointerButton::Primary)
        {
            let screen = Rect::from_min_max(to_screen(brush.min), to_screen(brush.max));
            painter.rect_filled(screen, 0.0, with_alpha(BRUSH_COLOR, 28));
            stroke_rect(&painter, screen, Stroke::new(1.0, with_alpha(BRUSH_COLOR, 180)));
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(index) = hovered_now
        {
            events.push(SelectionEvent::Select(index));
        }
        if response.double_clicked() && hovered_now.is_none() {
            events.push(SelectionEvent::Clear);
        }

        self.scatter_cache = Some(cache);
    }
}

/// Group palette position per record, matching the first-occurrence order the
/// hierarchy assigns, so a record reads the same color in both views.
fn record_group_indices(dataset: &Dataset, group_attr: &str) -> HashMap<usize, usize> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut by_record = HashMap::with_capacity(dataset.len());

    for record in dataset.records() {
        let key = record
            .field(group_attr)
            .map(|value| value.display())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_owned());
        let next = order.len();
        let group = *order.entry(key).or_insert(next);
        by_record.insert(record.index, group);
    }

    by_record
}

/// The point closest to `pos` within the hit slack, in layout coordinates.
fn nearest_point(layout: &ScatterLayout, pos: Pos2) -> Option<usize> {
    layout
        .points
        .iter()
        .map(|point| (point.record_index, point.pos.distance(pos)))
        .filter(|(_, distance)| *distance <= POINT_HIT_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

fn draw_axes(
    painter: &Painter,
    rect: Rect,
    layout: &ScatterLayout,
    x_attr: &str,
    y_attr: &str,
    color: Color32,
) {
    let stroke = Stroke::new(1.0, color);
    painter.line_segment([rect.left_bottom(), rect.right_bottom()], stroke);
    painter.line_segment([rect.left_top(), rect.left_bottom()], stroke);

    let font = FontId::proportional(11.0);
    let (x_min, x_max) = layout.x_scale.domain();
    let (y_min, y_max) = layout.y_scale.domain();

    painter.text(
        rect.left_bottom() + vec2(14.0, -4.0),
        Align2::LEFT_BOTTOM,
        format_number(x_min),
        font.clone(),
        color,
    );
    painter.text(
        rect.right_bottom() + vec2(-4.0, -4.0),
        Align2::RIGHT_BOTTOM,
        format_number(x_max),
        font.clone(),
        color,
    );
    painter.text(
        rect.left_top() + vec2(4.0, 4.0),
        Align2::LEFT_TOP,
        format_number(y_max),
        font.clone(),
        color,
    );
    painter.text(
        rect.left_bottom() + vec2(4.0, -16.0),
        Align2::LEFT_BOTTOM,
        format_number(y_min),
        font.clone(),
        color,
    );
    painter.text(
        rect.center_bottom() + vec2(0.0, -4.0),
        Align2::CENTER_BOTTOM,
        x_attr,
        font.clone(),
        color,
    );
    painter.text(
        rect.left_center() + vec2(4.0, -12.0),
        Align2::LEFT_CENTER,
        y_attr,
        font,
        color,
    );
}
