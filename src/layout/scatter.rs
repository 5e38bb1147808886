use eframe::egui::{Pos2, Rect, pos2};

use crate::data::Dataset;

use super::scale::LinearScale;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatterPoint {
    pub record_index: usize,
    pub pos: Pos2,
}

/// Positioned points for one scatter render pass. Rebuilt whenever the
/// dataset, the chosen attributes, or the surface size change; never patched
/// in place.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterLayout {
    pub points: Vec<ScatterPoint>,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
}

impl ScatterLayout {
    /// Maps two numeric attributes onto the surface: x over `[0, width]`,
    /// y over `[height, 0]` so larger values plot higher. Records missing
    /// either attribute are skipped.
    pub fn compute(
        dataset: &Dataset,
        x_attr: &str,
        y_attr: &str,
        width: f32,
        height: f32,
    ) -> Self {
        let xs = dataset.records().iter().filter_map(|r| r.numeric(x_attr));
        let ys = dataset.records().iter().filter_map(|r| r.numeric(y_attr));
        let x_scale = LinearScale::fit(xs, (0.0, width));
        let y_scale = LinearScale::fit(ys, (height, 0.0));

        let points = dataset
            .records()
            .iter()
            .filter_map(|record| {
                let x = record.numeric(x_attr)?;
                let y = record.numeric(y_attr)?;
                Some(ScatterPoint {
                    record_index: record.index,
                    pos: pos2(x_scale.apply(x), y_scale.apply(y)),
                })
            })
            .collect();

        Self {
            points,
            x_scale,
            y_scale,
        }
    }

    /// Records whose point falls within the brush rectangle, edges inclusive.
    /// A zero-area rectangle selects nothing.
    pub fn brush_select(&self, brush: Rect) -> Vec<usize> {
        if brush.width() <= 0.0 || brush.height() <= 0.0 {
            return Vec::new();
        }

        self.points
            .iter()
            .filter(|point| {
                point.pos.x >= brush.min.x
                    && point.pos.x <= brush.max.x
                    && point.pos.y >= brush.min.y
                    && point.pos.y <= brush.max.y
            })
            .map(|point| point.record_index)
            .collect()
    }
}
