use eframe::egui::{Painter, Rect, Stroke};

mod hierarchy;
mod scatter;

/// Rectangle outline drawn as four segments, kept on the rect edge.
pub(super) fn stroke_rect(painter: &Painter, rect: Rect, stroke: Stroke) {
    painter.line_segment([rect.left_top(), rect.right_top()], stroke);
    painter.line_segment([rect.right_top(), rect.right_bottom()], stroke);
    painter.line_segment([rect.right_bottom(), rect.left_bottom()], stroke);
    painter.line_segment([rect.left_bottom(), rect.left_top()], stroke);
}
