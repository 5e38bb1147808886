use eframe::egui::{Rect, pos2, vec2};

use crate::hierarchy::HierarchyNode;

use super::{GlyphShape, HierarchyGlyph};

/// Inset between a group's allocated rectangle and the tile area its leaves
/// cover. Leaves tile the inset rectangle exactly.
pub const TREEMAP_PADDING: f32 = 2.0;

/// Rectangular subdivision: only leaves are rendered, area proportional to
/// aggregate. The surface is first split among groups, then each group's
/// inset rectangle is tiled by its leaves (squarified rows, largest first).
pub fn layout(root: &HierarchyNode, width: f32, height: f32) -> Vec<HierarchyGlyph> {
    if root.children.is_empty() {
        return Vec::new();
    }

    let surface = Rect::from_min_size(pos2(0.0, 0.0), vec2(width.max(0.0), height.max(0.0)));
    let group_weights = root
        .children
        .iter()
        .map(|group| group.aggregate)
        .collect::<Vec<_>>();
    let group_rects = squarify(&group_weights, surface);

    let mut glyphs = Vec::new();
    for (group_index, (group, rect)) in root.children.iter().zip(group_rects).enumerate() {
        let inner = rect.shrink(TREEMAP_PADDING.min(rect.width() * 0.5).min(rect.height() * 0.5));
        let leaf_weights = group
            .children
            .iter()
            .map(|leaf| leaf.aggregate)
            .collect::<Vec<_>>();
        let leaf_rects = squarify(&leaf_weights, inner);

        for (leaf, leaf_rect) in group.children.iter().zip(leaf_rects) {
            glyphs.push(HierarchyGlyph {
                shape: GlyphShape::Rect(leaf_rect),
                depth: 2,
                record_index: leaf.record_index,
                group_index,
                label: leaf.name.clone(),
                group_records: Vec::new(),
            });
        }
    }

    glyphs
}

/// Tiles `rect` with one sub-rectangle per weight, in input order, each with
/// area proportional to its weight. Rows are packed squarified-style: items
/// join the current row while the worst aspect ratio does not degrade, then
/// the row is laid along the shorter side and the remainder recurses.
fn squarify(weights: &[f64], rect: Rect) -> Vec<Rect> {
    let mut rects = vec![Rect::from_min_size(rect.min, vec2(0.0, 0.0)); weights.len()];
    if weights.is_empty() {
        return rects;
    }

    let total: f64 = weights.iter().map(|weight| weight.max(0.0)).sum();
    let surface_area = (rect.width() * rect.height()) as f64;
    let areas = weights
        .iter()
        .map(|weight| {
            if total > 0.0 {
                weight.max(0.0) / total * surface_area
            } else {
                surface_area / weights.len() as f64
            }
        })
        .collect::<Vec<_>>();

    // Largest first, restored to input order through the index indirection.
    let mut order = (0..weights.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| areas[*b].total_cmp(&areas[*a]));

    let mut remaining = rect;
    let mut row: Vec<usize> = Vec::new();
    let mut row_area = 0.0_f64;

    let mut pending = order.into_iter().peekable();
    while let Some(&next) = pending.peek() {
        let side = remaining.width().min(remaining.height()) as f64;
        let with_next = row_area + areas[next];

        let keep_growing = if row.is_empty() {
            true
        } else {
            let current = worst_row_ratio(&row, row_area, side, &areas);
            row.push(next);
            let grown = worst_row_ratio(&row, with_next, side, &areas);
            row.pop();
            grown <= current
        };

        if keep_growing {
            row.push(next);
            row_area = with_next;
            pending.next();
        } else {
            remaining = lay_row(&row, row_area, remaining, &mut rects, &areas);
            row.clear();
            row_area = 0.0;
        }
    }

    if !row.is_empty() {
        lay_row(&row, row_area, remaining, &mut rects, &areas);
    }

    rects
}

fn worst_row_ratio(row: &[usize], row_area: f64, side: f64, areas: &[f64]) -> f64 {
    if row.is_empty() || row_area <= 0.0 || side <= 0.0 {
        return f64::INFINITY;
    }

    let min = row.iter().map(|i| areas[*i]).fold(f64::INFINITY, f64::min);
    let max = row.iter().map(|i| areas[*i]).fold(0.0_f64, f64::max);
    if min <= 0.0 {
        return f64::INFINITY;
    }

    let side_sq = side * side;
    let sum_sq = row_area * row_area;
    ((side_sq * max) / sum_sq).max(sum_sq / (side_sq * min))
}

/// Lays the row as a strip along the shorter side of `remaining`; returns the
/// rectangle left over.
fn lay_row(
    row: &[usize],
    row_area: f64,
    remaining: Rect,
    rects: &mut [Rect],
    areas: &[f64],
) -> Rect {
    let horizontal = remaining.width() >= remaining.height();

    if horizontal {
        // Vertical strip on the left, items stacked top to bottom.
        let strip_width = if remaining.height() > 0.0 {
            (row_area / remaining.height() as f64) as f32
        } else {
            0.0
        };
        let mut y = remaining.top();
        for &index in row {
            let item_height = if strip_width > 0.0 {
                (areas[index] / strip_width as f64) as f32
            } else {
                0.0
            };
            rects[index] = Rect::from_min_size(
                pos2(remaining.left(), y),
                vec2(strip_width, item_height),
            );
            y += item_height;
        }
        Rect::from_min_max(
            pos2(remaining.left() + strip_width, remaining.top()),
            remaining.max,
        )
    } else {
        // Horizontal strip on top, items laid left to right.
        let strip_height = if remaining.width() > 0.0 {
            (row_area / remaining.width() as f64) as f32
        } else {
            0.0
        };
        let mut x = remaining.left();
        for &index in row {
            let item_width = if strip_height > 0.0 {
                (areas[index] / strip_height as f64) as f32
            } else {
                0.0
            };
            rects[index] = Rect::from_min_size(
                pos2(x, remaining.top()),
                vec2(item_width, strip_height),
            );
            x += item_width;
        }
        Rect::from_min_max(
            pos2(remaining.left(), remaining.top() + strip_height),
            remaining.max,
        )
    }
}
