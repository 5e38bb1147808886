use eframe::egui::Color32;

/// Ordinal palette for group keys, indexed by first-occurrence order.
const GROUP_PALETTE: [Color32; 10] = [
    Color32::from_rgb(31, 119, 180),
    Color32::from_rgb(255, 127, 14),
    Color32::from_rgb(44, 160, 44),
    Color32::from_rgb(214, 39, 40),
    Color32::from_rgb(148, 103, 189),
    Color32::from_rgb(140, 86, 75),
    Color32::from_rgb(227, 119, 194),
    Color32::from_rgb(127, 127, 127),
    Color32::from_rgb(188, 189, 34),
    Color32::from_rgb(23, 190, 207),
];

/// Selection highlight shared by every view, so a selected record reads the
/// same in the scatterplot and the hierarchy.
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(214, 69, 65);
/// Search-match highlight, only shown while no selection is active.
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(240, 196, 60);
pub(super) const HOVER_STROKE: Color32 = Color32::from_rgb(255, 165, 0);

pub(super) fn group_color(group_index: usize) -> Color32 {
    GROUP_PALETTE[group_index % GROUP_PALETTE.len()]
}

/// Leaf shade of a group color, one step brighter than the group itself.
pub(super) fn leaf_color(group_index: usize) -> Color32 {
    blend_color(group_color(group_index), Color32::WHITE, 0.30)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Faded variant used for glyphs outside the active selection or search.
pub(super) fn faded(color: Color32) -> Color32 {
    with_alpha(color, 64)
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
