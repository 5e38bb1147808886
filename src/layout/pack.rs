use eframe::egui::{Vec2, pos2, vec2};

use crate::hierarchy::HierarchyNode;

use super::{GlyphShape, HierarchyGlyph};

/// Gap kept between a parent circle and the disc its children are packed into.
pub const PACK_PADDING: f32 = 3.0;

const GOLDEN_ANGLE: f32 = 2.399_963;

/// Nested circle packing: every node gets a circle sized by its aggregate,
/// children are packed inside the parent and siblings never overlap. Siblings
/// are laid out around the group centroid along golden-angle directions, each
/// pushed just far enough out to clear the circles already placed, then the
/// whole cluster is scaled into the parent.
pub fn layout(root: &HierarchyNode, width: f32, height: f32) -> Vec<HierarchyGlyph> {
    if root.children.is_empty() {
        return Vec::new();
    }

    let root_radius = ((width.min(height) * 0.5) - PACK_PADDING).max(0.0);
    let root_center = pos2(width * 0.5, height * 0.5);

    let mut glyphs = Vec::new();
    glyphs.push(HierarchyGlyph {
        shape: GlyphShape::Circle {
            center: root_center,
            radius: root_radius,
        },
        depth: 0,
        record_index: None,
        group_index: 0,
        label: root.name.clone(),
        group_records: Vec::new(),
    });

    let group_weights = root
        .children
        .iter()
        .map(|group| group.aggregate)
        .collect::<Vec<_>>();
    let group_circles = pack_into(&group_weights, root_center.to_vec2(), root_radius);

    for (group_index, (group, (center, radius))) in
        root.children.iter().zip(group_circles).enumerate()
    {
        glyphs.push(HierarchyGlyph {
            shape: GlyphShape::Circle {
                center: center.to_pos2(),
                radius,
            },
            depth: 1,
            record_index: None,
            group_index,
            label: group.name.clone(),
            group_records: group.leaf_indices(),
        });

        let leaf_weights = group
            .children
            .iter()
            .map(|leaf| leaf.aggregate)
            .collect::<Vec<_>>();
        let leaf_circles = pack_into(&leaf_weights, center, radius);

        for (leaf, (leaf_center, leaf_radius)) in group.children.iter().zip(leaf_circles) {
            glyphs.push(HierarchyGlyph {
                shape: GlyphShape::Circle {
                    center: leaf_center.to_pos2(),
                    radius: leaf_radius,
                },
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

/// Packs sibling circles (radius proportional to sqrt of weight) and scales
/// the cluster to fit a parent disc of `parent_radius` around `parent_center`.
fn pack_into(weights: &[f64], parent_center: Vec2, parent_radius: f32) -> Vec<(Vec2, f32)> {
    if weights.is_empty() {
        return Vec::new();
    }

    let all_zero = weights.iter().all(|weight| *weight <= 0.0);
    let radii = weights
        .iter()
        .map(|weight| {
            if all_zero {
                1.0
            } else {
                (weight.max(0.0) as f32).sqrt()
            }
        })
        .collect::<Vec<_>>();

    let centers = pack_siblings(&radii);

    let bound = centers
        .iter()
        .zip(&radii)
        .map(|(center, radius)| center.length() + radius)
        .fold(0.0_f32, f32::max);
    if bound <= 0.0 {
        return centers
            .into_iter()
            .map(|_| (parent_center, 0.0))
            .collect();
    }

    let scale = (parent_radius - PACK_PADDING).max(0.0) / bound;
    centers
        .into_iter()
        .zip(radii)
        .map(|(center, radius)| (parent_center + (center * scale), radius * scale))
        .collect()
}

/// Places sibling circles around the origin without overlap. The first circle
/// sits at the origin; each subsequent circle walks outward along a
/// golden-angle direction until it clears everything already placed, which
/// leaves it tangent to the binding neighbor.
fn pack_siblings(radii: &[f32]) -> Vec<Vec2> {
    let mut centers: Vec<Vec2> = Vec::with_capacity(radii.len());

    for (index, &radius) in radii.iter().enumerate() {
        if index == 0 {
            centers.push(Vec2::ZERO);
            continue;
        }

        let angle = index as f32 * GOLDEN_ANGLE;
        let direction = vec2(angle.cos(), angle.sin());

        let mut distance = 0.0_f32;
        for (placed, &placed_radius) in centers.iter().zip(radii) {
            let along = direction.dot(*placed);
            let min_gap = radius + placed_radius;
            let discriminant = (along * along) - (placed.length_sq() - (min_gap * min_gap));
            if discriminant >= 0.0 {
                distance = distance.max(along + discriminant.sqrt());
            }
        }

        centers.push(direction * distance);
    }

    centers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(glyph: &HierarchyGlyph) -> (Vec2, f32) {
        match glyph.shape {
            GlyphShape::Circle { center, radius } => (center.to_vec2(), radius),
            GlyphShape::Rect(_) => panic!("pack layout only produces circles"),
        }
    }

    fn leaf(index: usize, weight: f64) -> HierarchyNode {
        HierarchyNode {
            name: format!("#{index}"),
            group_key: Some("g".to_owned()),
            aggregate: weight,
            children: Vec::new(),
            record_index: Some(index),
        }
    }

    fn tree(groups: &[&[f64]]) -> HierarchyNode {
        let mut next_index = 0;
        let children = groups
            .iter()
            .enumerate()
            .map(|(g, weights)| {
                let leaves = weights
                    .iter()
                    .map(|weight| {
                        let node = leaf(next_index, *weight);
                        next_index += 1;
                        node
                    })
                    .collect::<Vec<_>>();
                HierarchyNode {
                    name: format!("group-{g}"),
                    group_key: Some(format!("group-{g}")),
                    aggregate: weights.iter().sum(),
                    children: leaves,
                    record_index: None,
                }
            })
            .collect::<Vec<_>>();
        HierarchyNode {
            name: "root".to_owned(),
            group_key: None,
            aggregate: children.iter().map(|c| c.aggregate).sum(),
            children,
            record_index: None,
        }
    }

    #[test]
    fn empty_tree_produces_no_geometry() {
        let root = tree(&[]);
        assert!(layout(&root, 400.0, 300.0).is_empty());
    }

    #[test]
    fn children_stay_inside_their_parent_circle() {
        let root = tree(&[&[10.0, 20.0, 5.0], &[40.0], &[1.0, 1.0]]);
        let glyphs = layout(&root, 400.0, 300.0);

        let (root_center, root_radius) = circle(&glyphs[0]);
        for glyph in glyphs.iter().filter(|g| g.depth == 1) {
            let (center, radius) = circle(glyph);
            assert!(
                (center - root_center).length() + radius <= root_radius + 0.01,
                "group escapes root"
            );
        }

        for group in glyphs.iter().filter(|g| g.depth == 1) {
            let (group_center, group_radius) = circle(group);
            for glyph in glyphs
                .iter()
                .filter(|g| g.depth == 2 && g.group_index == group.group_index)
            {
                let (center, radius) = circle(glyph);
                assert!(
                    (center - group_center).length() + radius <= group_radius + 0.01,
                    "leaf escapes its group"
                );
            }
        }
    }

    #[test]
    fn sibling_circles_do_not_overlap() {
        let root = tree(&[&[3.0, 9.0, 1.0, 14.0, 6.0, 2.0, 2.0]]);
        let glyphs = layout(&root, 500.0, 500.0);
        let leaves = glyphs.iter().filter(|g| g.depth == 2).collect::<Vec<_>>();

        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                let (ca, ra) = circle(a);
                let (cb, rb) = circle(b);
                assert!(
                    (ca - cb).length() >= (ra + rb) - 0.01,
                    "leaves {} and {} overlap",
                    a.label,
                    b.label
                );
            }
        }
    }

    #[test]
    fn radius_is_monotone_in_aggregate_among_siblings() {
        let root = tree(&[&[1.0, 16.0, 4.0]]);
        let glyphs = layout(&root, 400.0, 400.0);
        let radius_of = |record: usize| {
            glyphs
                .iter()
                .find(|g| g.record_index == Some(record))
                .map(|g| circle(g).1)
                .expect("leaf present")
        };

        assert!(radius_of(1) > radius_of(2));
        assert!(radius_of(2) > radius_of(0));
    }

    #[test]
    fn zero_weight_groups_do_not_panic() {
        let root = tree(&[&[0.0, 0.0], &[0.0]]);
        let glyphs = layout(&root, 200.0, 200.0);
        assert_eq!(glyphs.iter().filter(|g| g.depth == 2).count(), 3);
    }

    #[test]
    fn group_glyphs_carry_their_record_sets() {
        let root = tree(&[&[1.0, 2.0], &[3.0]]);
        let glyphs = layout(&root, 300.0, 300.0);
        let groups = glyphs.iter().filter(|g| g.depth == 1).collect::<Vec<_>>();
        assert_eq!(groups[0].group_records, vec![0, 1]);
        assert_eq!(groups[1].group_records, vec![2]);
    }
}
