use eframe::egui::{Pos2, Rect};

use crate::hierarchy::HierarchyNode;

mod pack;
mod scale;
mod scatter;
mod tree;
mod treemap;

pub use scale::LinearScale;
pub use scatter::{ScatterLayout, ScatterPoint};
pub use tree::{TREE_LEAF_RADIUS, TREE_NODE_RADIUS};

/// Pointer slack around node-link tree nodes, matching the invisible click
/// targets the small circles need.
const TREE_HIT_RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HierarchyLayoutKind {
    CirclePacking,
    Treemap,
    Tree,
}

impl HierarchyLayoutKind {
    pub const ALL: [Self; 3] = [Self::CirclePacking, Self::Treemap, Self::Tree];

    pub fn label(self) -> &'static str {
        match self {
            Self::CirclePacking => "Circle packing",
            Self::Treemap => "Treemap",
            Self::Tree => "Tree",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GlyphShape {
    Circle { center: Pos2, radius: f32 },
    Rect(Rect),
}

impl GlyphShape {
    fn contains(&self, pos: Pos2) -> bool {
        match self {
            Self::Circle { center, radius } => center.distance(pos) <= *radius,
            Self::Rect(rect) => {
                pos.x >= rect.min.x
                    && pos.x <= rect.max.x
                    && pos.y >= rect.min.y
                    && pos.y <= rect.max.y
            }
        }
    }
}

/// One positioned visual primitive of a hierarchy render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyGlyph {
    pub shape: GlyphShape,
    pub depth: u8,
    /// Present exactly on leaves.
    pub record_index: Option<usize>,
    /// Position of the glyph's group in first-occurrence order; drives the
    /// color palette and sibling lookup.
    pub group_index: usize,
    pub label: String,
    /// For depth-1 glyphs: every record index under the group.
    pub group_records: Vec<usize>,
}

/// What a click on a glyph means: one record, or a whole group at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitAction {
    Single(usize),
    Group(Vec<usize>),
}

/// The positioned primitives for one hierarchy render pass. Derived
/// deterministically from the tree, the chosen engine, and the surface size;
/// rebuilt (never patched) when any of those change.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyLayout {
    pub kind: HierarchyLayoutKind,
    pub glyphs: Vec<HierarchyGlyph>,
    pub edges: Vec<(Pos2, Pos2)>,
}

impl HierarchyLayout {
    pub fn compute(
        root: &HierarchyNode,
        kind: HierarchyLayoutKind,
        width: f32,
        height: f32,
    ) -> Self {
        let (glyphs, edges) = match kind {
            HierarchyLayoutKind::CirclePacking => (pack::layout(root, width, height), Vec::new()),
            HierarchyLayoutKind::Treemap => (treemap::layout(root, width, height), Vec::new()),
            HierarchyLayoutKind::Tree => tree::layout(root, width, height),
        };

        Self {
            kind,
            glyphs,
            edges,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Record indices of every rendered leaf, ascending.
    pub fn leaf_record_indices(&self) -> Vec<usize> {
        let mut indices = self
            .glyphs
            .iter()
            .filter_map(|glyph| glyph.record_index)
            .collect::<Vec<_>>();
        indices.sort_unstable();
        indices
    }

    /// The leaf glyph under the pointer, if any. Hover is a leaf-only
    /// affordance in every engine.
    pub fn leaf_at(&self, pos: Pos2) -> Option<&HierarchyGlyph> {
        match self.kind {
            HierarchyLayoutKind::CirclePacking | HierarchyLayoutKind::Treemap => self
                .glyphs
                .iter()
                .filter(|glyph| glyph.depth == 2 && glyph.shape.contains(pos))
                .min_by(|a, b| glyph_extent(a).total_cmp(&glyph_extent(b))),
            HierarchyLayoutKind::Tree => self
                .nearest_node(pos)
                .filter(|glyph| glyph.depth == 2),
        }
    }

    pub fn hovered_record(&self, pos: Pos2) -> Option<usize> {
        self.leaf_at(pos).and_then(|glyph| glyph.record_index)
    }

    /// Depth-aware click dispatch. Each engine has its own aggregate-selection
    /// trigger: circle packing exposes clickable depth-1 circles, the treemap
    /// qualifies a leaf click with a modifier, the node-link tree exposes
    /// clickable depth-1 nodes.
    pub fn hit_action(&self, pos: Pos2, modifier: bool) -> Option<HitAction> {
        match self.kind {
            HierarchyLayoutKind::CirclePacking => {
                let hit = self
                    .glyphs
                    .iter()
                    .filter(|glyph| glyph.depth >= 1 && glyph.shape.contains(pos))
                    .max_by(|a, b| {
                        a.depth
                            .cmp(&b.depth)
                            .then(glyph_extent(b).total_cmp(&glyph_extent(a)))
                    })?;
                Self::action_for(hit)
            }
            HierarchyLayoutKind::Treemap => {
                let leaf = self.leaf_at(pos)?;
                if modifier {
                    // No group-level geometry to click; the modifier promotes
                    // a leaf click to its whole sibling group.
                    Some(HitAction::Group(self.sibling_records(leaf.group_index)))
                } else {
                    leaf.record_index.map(HitAction::Single)
                }
            }
            HierarchyLayoutKind::Tree => {
                let hit = self.nearest_node(pos)?;
                Self::action_for(hit)
            }
        }
    }

    fn action_for(glyph: &HierarchyGlyph) -> Option<HitAction> {
        match glyph.depth {
            2 => glyph.record_index.map(HitAction::Single),
            1 => Some(HitAction::Group(glyph.group_records.clone())),
            _ => None,
        }
    }

    fn sibling_records(&self, group_index: usize) -> Vec<usize> {
        self.glyphs
            .iter()
            .filter(|glyph| glyph.depth == 2 && glyph.group_index == group_index)
            .filter_map(|glyph| glyph.record_index)
            .collect()
    }

    /// Nearest interactive (depth 1 or 2) tree node within the hit slack.
    fn nearest_node(&self, pos: Pos2) -> Option<&HierarchyGlyph> {
        self.glyphs
            .iter()
            .filter(|glyph| glyph.depth >= 1)
            .filter_map(|glyph| match glyph.shape {
                GlyphShape::Circle { center, .. } => {
                    let distance = center.distance(pos);
                    (distance <= TREE_HIT_RADIUS).then_some((glyph, distance))
                }
                GlyphShape::Rect(_) => None,
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(glyph, _)| glyph)
    }
}

fn glyph_extent(glyph: &HierarchyGlyph) -> f32 {
    match glyph.shape {
        GlyphShape::Circle { radius, .. } => radius,
        GlyphShape::Rect(rect) => rect.width().max(rect.height()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, Record, Value};
    use crate::hierarchy::{WeightMode, build_hierarchy};
    use eframe::egui::pos2;

    fn communities() -> Dataset {
        let populations = [10.0, 20.0, 0.0, 5.0, 100.0];
        let states = ["A", "A", "B", "B", "A"];
        let records = populations
            .iter()
            .zip(states.iter())
            .enumerate()
            .map(|(index, (population, state))| {
                let fields = [
                    ("population".to_owned(), Value::Number(*population)),
                    ("state".to_owned(), Value::Text((*state).to_owned())),
                ]
                .into_iter()
                .collect();
                Record::new(index, fields)
            })
            .collect();
        Dataset::new(vec!["population".to_owned(), "state".to_owned()], records)
    }

    fn hierarchy() -> crate::hierarchy::HierarchyNode {
        build_hierarchy(
            &communities(),
            "state",
            &WeightMode::Column("population".to_owned()),
            None,
        )
    }

    #[test]
    fn all_engines_render_the_same_leaf_set() {
        let root = hierarchy();
        let mut leaf_sets = HierarchyLayoutKind::ALL
            .iter()
            .map(|kind| HierarchyLayout::compute(&root, *kind, 640.0, 480.0).leaf_record_indices());
        let first = leaf_sets.next().expect("three engines");
        assert_eq!(first, vec![0, 1, 2, 3, 4]);
        assert!(leaf_sets.all(|set| set == first));
    }

    #[test]
    fn recomputing_with_identical_inputs_is_identical() {
        let root = hierarchy();
        for kind in HierarchyLayoutKind::ALL {
            let first = HierarchyLayout::compute(&root, kind, 640.0, 480.0);
            let second = HierarchyLayout::compute(&root, kind, 640.0, 480.0);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn empty_tree_is_empty_for_every_engine() {
        let root = build_hierarchy(&Dataset::default(), "state", &WeightMode::Count, None);
        for kind in HierarchyLayoutKind::ALL {
            let layout = HierarchyLayout::compute(&root, kind, 640.0, 480.0);
            assert!(layout.is_empty());
            assert!(layout.hit_action(pos2(320.0, 240.0), false).is_none());
            assert!(layout.hovered_record(pos2(320.0, 240.0)).is_none());
        }
    }

    #[test]
    fn circle_packing_group_click_selects_every_member() {
        let root = hierarchy();
        let layout = HierarchyLayout::compute(&root, HierarchyLayoutKind::CirclePacking, 640.0, 480.0);

        // Pick a point inside group "A" but outside every leaf circle:
        // probe along the group circle's interior.
        let group = layout
            .glyphs
            .iter()
            .find(|glyph| glyph.depth == 1 && glyph.label == "A")
            .expect("group glyph");
        let GlyphShape::Circle { center, radius } = group.shape else {
            panic!("circle expected");
        };

        let mut group_hit = None;
        'probe: for step_x in -20..=20 {
            for step_y in -20..=20 {
                let probe = pos2(
                    center.x + (step_x as f32 / 20.0) * radius,
                    center.y + (step_y as f32 / 20.0) * radius,
                );
                if let Some(action) = layout.hit_action(probe, false)
                    && matches!(action, HitAction::Group(_))
                {
                    group_hit = Some(action);
                    break 'probe;
                }
            }
        }

        assert_eq!(group_hit, Some(HitAction::Group(vec![0, 1, 4])));
    }

    #[test]
    fn circle_packing_leaf_click_selects_one_record() {
        let root = hierarchy();
        let layout = HierarchyLayout::compute(&root, HierarchyLayoutKind::CirclePacking, 640.0, 480.0);
        let leaf = layout
            .glyphs
            .iter()
            .find(|glyph| glyph.record_index == Some(4))
            .expect("leaf glyph");
        let GlyphShape::Circle { center, .. } = leaf.shape else {
            panic!("circle expected");
        };
        assert_eq!(layout.hit_action(center, false), Some(HitAction::Single(4)));
    }

    #[test]
    fn treemap_modifier_click_selects_the_sibling_group() {
        let root = hierarchy();
        let layout = HierarchyLayout::compute(&root, HierarchyLayoutKind::Treemap, 640.0, 480.0);
        let leaf = layout
            .glyphs
            .iter()
            .find(|glyph| glyph.record_index == Some(0))
            .expect("leaf glyph");
        let GlyphShape::Rect(rect) = leaf.shape else {
            panic!("rect expected");
        };

        let plain = layout.hit_action(rect.center(), false);
        assert_eq!(plain, Some(HitAction::Single(0)));

        let qualified = layout.hit_action(rect.center(), true);
        assert_eq!(qualified, Some(HitAction::Group(vec![0, 1, 4])));
    }

    #[test]
    fn tree_click_targets_only_interactive_depths() {
        let root = hierarchy();
        let layout = HierarchyLayout::compute(&root, HierarchyLayoutKind::Tree, 640.0, 480.0);

        let root_glyph = layout
            .glyphs
            .iter()
            .find(|glyph| glyph.depth == 0)
            .expect("root glyph");
        let GlyphShape::Circle { center, .. } = root_glyph.shape else {
            panic!("circle expected");
        };
        assert!(layout.hit_action(center, false).is_none());

        let group = layout
            .glyphs
            .iter()
            .find(|glyph| glyph.depth == 1 && glyph.label == "B")
            .expect("group glyph");
        let GlyphShape::Circle { center, .. } = group.shape else {
            panic!("circle expected");
        };
        assert_eq!(
            layout.hit_action(center, false),
            Some(HitAction::Group(vec![2, 3]))
        );
    }
}
