use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Align, Context, Layout};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::data::Dataset;
use crate::hierarchy::{WeightMode, build_hierarchy};
use crate::layout::{HierarchyLayout, HierarchyLayoutKind, ScatterLayout};
use crate::util::truncate_label;

use super::super::{
    HierarchyCache, HierarchyKey, InitialParams, ScatterCache, ScatterKey, SearchMatchCache,
    SelectionState, ViewModel, ViewParams,
};

impl ViewModel {
    pub(in crate::app) fn new(dataset: Dataset, initial: &InitialParams) -> Self {
        let params = Self::default_params(&dataset, initial);
        Self {
            dataset,
            dataset_revision: 0,
            params,
            selection: SelectionState::default(),
            search: String::new(),
            scatter_cache: None,
            hierarchy_cache: None,
            search_match_cache: None,
            scatter_brush_start: None,
            scatter_last_hover: None,
            hierarchy_last_hover: None,
        }
    }

    fn default_params(dataset: &Dataset, initial: &InitialParams) -> ViewParams {
        let numeric = dataset.numeric_columns();
        let text = dataset.text_columns();

        let pick = |wanted: &Option<String>, pool: &[String], preferred: usize| {
            wanted
                .as_ref()
                .filter(|name| pool.iter().any(|column| column == *name))
                .cloned()
                .or_else(|| pool.get(preferred).cloned())
                .or_else(|| pool.first().cloned())
                .unwrap_or_default()
        };

        let x_attr = pick(&initial.x_attribute, &numeric, 0);
        let y_attr = pick(&initial.y_attribute, &numeric, 1);
        let group_attr = pick(&initial.group_attribute, &text, 0);
        let weight = initial
            .weight_attribute
            .as_ref()
            .filter(|name| numeric.iter().any(|column| column == *name))
            .cloned()
            .map(WeightMode::Column)
            .unwrap_or(WeightMode::Count);
        let label_attr = text.iter().find(|column| **column != group_attr).cloned();

        ViewParams {
            x_attr,
            y_attr,
            group_attr,
            weight,
            label_attr,
            hierarchy_layout: HierarchyLayoutKind::CirclePacking,
        }
    }

    /// Swaps in a freshly loaded dataset. Selection identifiers that no
    /// longer resolve are dropped; attribute choices that disappeared are
    /// re-defaulted.
    pub(in crate::app) fn replace_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.dataset_revision = self.dataset_revision.wrapping_add(1);
        self.scatter_cache = None;
        self.hierarchy_cache = None;
        self.search_match_cache = None;
        self.selection.retain_valid(self.dataset.len());
        self.revalidate_params();
        log::debug!(
            "dataset replaced: {} records, revision {}",
            self.dataset.len(),
            self.dataset_revision
        );
    }

    fn revalidate_params(&mut self) {
        let numeric = self.dataset.numeric_columns();
        let text = self.dataset.text_columns();
        let keep = |attr: &str, pool: &[String]| pool.iter().any(|column| column == attr);

        if !keep(&self.params.x_attr, &numeric) {
            self.params.x_attr = numeric.first().cloned().unwrap_or_default();
        }
        if !keep(&self.params.y_attr, &numeric) {
            self.params.y_attr = numeric
                .get(1)
                .or_else(|| numeric.first())
                .cloned()
                .unwrap_or_default();
        }
        if !keep(&self.params.group_attr, &text) {
            self.params.group_attr = text.first().cloned().unwrap_or_default();
        }
        if let WeightMode::Column(name) = &self.params.weight
            && !keep(name, &numeric)
        {
            self.params.weight = WeightMode::Count;
        }
        if let Some(label) = &self.params.label_attr
            && !keep(label, &text)
        {
            self.params.label_attr = text
                .iter()
                .find(|column| **column != self.params.group_attr)
                .cloned();
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        dataset_path: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        let mut events = Vec::new();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("datalens");
                    ui.separator();
                    ui.label(format!("dataset: {}", dataset_path.display()));
                    ui.label(format!("records: {}", self.dataset.len()));
                    ui.label(format!("columns: {}", self.dataset.columns().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload dataset"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(hovered) = self.selection.hovered() {
                            ui.label(format!("hover: {}", self.record_label(hovered)));
                        } else if self.selection.has_selection() {
                            ui.label(format!("{} selected", self.selection.selection_len()));
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui, &mut events));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                self.draw_scatter(&mut columns[0], &mut events);
                self.draw_hierarchy(&mut columns[1], &mut events);
            });
        });

        // Views only emit events; every mutation happens here, after all
        // surfaces drew against the same state.
        let dataset_len = self.dataset.len();
        for event in events {
            self.selection.apply(event, dataset_len);
        }
    }

    /// Human-readable name for one record, used by labels and the status bar.
    pub(in crate::app) fn record_label(&self, index: usize) -> String {
        let label = self
            .params
            .label_attr
            .as_deref()
            .and_then(|attr| {
                self.dataset
                    .record(index)
                    .and_then(|record| record.field(attr))
            })
            .map(|value| value.display());
        label.unwrap_or_else(|| format!("#{index}"))
    }

    pub(in crate::app) fn ensure_scatter_layout(&mut self, width: f32, height: f32) {
        let key = ScatterKey {
            revision: self.dataset_revision,
            x_attr: self.params.x_attr.clone(),
            y_attr: self.params.y_attr.clone(),
            width,
            height,
        };

        let stale = self
            .scatter_cache
            .as_ref()
            .is_none_or(|cache| cache.key != key);
        if stale {
            let layout =
                ScatterLayout::compute(&self.dataset, &key.x_attr, &key.y_attr, width, height);
            self.scatter_cache = Some(ScatterCache { key, layout });
        }
    }

    pub(in crate::app) fn ensure_hierarchy_layout(&mut self, width: f32, height: f32) {
        let key = HierarchyKey {
            revision: self.dataset_revision,
            group_attr: self.params.group_attr.clone(),
            weight: self.params.weight.clone(),
            label_attr: self.params.label_attr.clone(),
            kind: self.params.hierarchy_layout,
            width,
            height,
        };

        let stale = self
            .hierarchy_cache
            .as_ref()
            .is_none_or(|cache| cache.key != key);
        if stale {
            let root = build_hierarchy(
                &self.dataset,
                &key.group_attr,
                &key.weight,
                key.label_attr.as_deref(),
            );
            let layout = HierarchyLayout::compute(&root, key.kind, width, height);
            self.hierarchy_cache = Some(HierarchyCache { key, layout });
        }
    }

    /// Records whose label or group key fuzzy-matches the search query.
    /// Only consulted while no selection is active, mirroring how a search
    /// highlight gives way to an explicit selection.
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        if self.selection.has_selection() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.revision == self.dataset_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let label_attr = self.params.label_attr.clone();
        let group_attr = self.params.group_attr.clone();
        let matches = self
            .dataset
            .records()
            .iter()
            .filter(|record| {
                let mut haystack = String::new();
                if let Some(attr) = label_attr.as_deref()
                    && let Some(value) = record.field(attr)
                {
                    haystack.push_str(&value.display());
                    haystack.push(' ');
                }
                if let Some(value) = record.field(&group_attr) {
                    haystack.push_str(&value.display());
                }
                matcher.fuzzy_match(&haystack, query).is_some()
            })
            .map(|record| record.index)
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            revision: self.dataset_revision,
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    pub(in crate::app) fn selection_summary_labels(&self, limit: usize) -> Vec<String> {
        let mut indices = self.selection.selected().iter().copied().collect::<Vec<_>>();
        indices.sort_unstable();
        indices
            .into_iter()
            .take(limit)
            .map(|index| truncate_label(&self.record_label(index), 28))
            .collect()
    }
}
