use eframe::egui::{Pos2, pos2};

use crate::hierarchy::HierarchyNode;

use super::{GlyphShape, HierarchyGlyph};

/// Left margin before the root node.
const MARGIN_X: f32 = 24.0;
/// Horizontal space reserved on the right for leaf labels.
const LABEL_GUTTER: f32 = 140.0;
const MARGIN_Y: f32 = 12.0;

/// Node radii, matching the rendered size per depth.
pub const TREE_NODE_RADIUS: f32 = 6.0;
pub const TREE_LEAF_RADIUS: f32 = 4.0;

/// Node-link layout: depth maps to the x axis, sibling order to the y axis.
/// Leaves are spaced evenly, each parent is centered over its children, so
/// sibling subtrees can never overlap. Also returns the parent→child links.
pub fn layout(
    root: &HierarchyNode,
    width: f32,
    height: f32,
) -> (Vec<HierarchyGlyph>, Vec<(Pos2, Pos2)>) {
    if root.children.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let leaf_count: usize = root.children.iter().map(|group| group.children.len()).sum();
    let inner_height = (height - (2.0 * MARGIN_Y)).max(0.0);
    let depth_step = ((width - MARGIN_X - LABEL_GUTTER).max(0.0)) * 0.5;
    let x_of = |depth: usize| MARGIN_X + (depth as f32 * depth_step);
    let leaf_y = |leaf_slot: usize| {
        if leaf_count == 0 {
            MARGIN_Y + (inner_height * 0.5)
        } else {
            MARGIN_Y + (inner_height * ((leaf_slot as f32 + 0.5) / leaf_count as f32))
        }
    };

    let mut glyphs = Vec::new();
    let mut edges = Vec::new();
    let mut group_positions = Vec::with_capacity(root.children.len());
    let mut next_slot = 0usize;

    // Leaves and groups first; the root is centered over the groups afterward.
    for (group_index, group) in root.children.iter().enumerate() {
        let mut leaf_positions = Vec::with_capacity(group.children.len());
        for leaf in &group.children {
            let pos = pos2(x_of(2), leaf_y(next_slot));
            next_slot += 1;
            leaf_positions.push(pos);
            glyphs.push(HierarchyGlyph {
                shape: GlyphShape::Circle {
                    center: pos,
                    radius: TREE_LEAF_RADIUS,
                },
                depth: 2,
                record_index: leaf.record_index,
                group_index,
                label: leaf.name.clone(),
                group_records: Vec::new(),
            });
        }

        let group_y = if leaf_positions.is_empty() {
            MARGIN_Y + (inner_height * 0.5)
        } else {
            leaf_positions.iter().map(|pos| pos.y).sum::<f32>() / leaf_positions.len() as f32
        };
        let group_pos = pos2(x_of(1), group_y);
        group_positions.push(group_pos);

        for leaf_pos in &leaf_positions {
            edges.push((group_pos, *leaf_pos));
        }

        glyphs.push(HierarchyGlyph {
            shape: GlyphShape::Circle {
                center: group_pos,
                radius: TREE_NODE_RADIUS,
            },
            depth: 1,
            record_index: None,
            group_index,
            label: group.name.clone(),
            group_records: group.leaf_indices(),
        });
    }

    let root_y = group_positions.iter().map(|pos| pos.y).sum::<f32>()
        / group_positions.len().max(1) as f32;
    let root_pos = pos2(x_of(0), root_y);
    for group_pos in &group_positions {
        edges.push((root_pos, *group_pos));
    }
    glyphs.push(HierarchyGlyph {
        shape: GlyphShape::Circle {
            center: root_pos,
            radius: TREE_NODE_RADIUS,
        },
        depth: 0,
        record_index: None,
        group_index: 0,
        label: root.name.clone(),
        group_records: Vec::new(),
    });

    (glyphs, edges)
}
