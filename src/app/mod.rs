use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2};

use crate::data::{Dataset, load_dataset};
use crate::hierarchy::WeightMode;
use crate::layout::{HierarchyLayout, HierarchyLayoutKind, ScatterLayout};

mod render_utils;
mod selection;
mod ui;
mod views;

pub use selection::{SelectionEvent, SelectionState};

/// Attribute choices passed on the command line; anything absent is defaulted
/// from the dataset's columns once it loads.
#[derive(Clone, Debug, Default)]
pub struct InitialParams {
    pub x_attribute: Option<String>,
    pub y_attribute: Option<String>,
    pub group_attribute: Option<String>,
    pub weight_attribute: Option<String>,
}

pub struct DataLensApp {
    dataset_path: PathBuf,
    initial: InitialParams,
    state: AppState,
    reload_rx: Option<Receiver<Result<Dataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Dataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

/// The view parameters every layout depends on. Compared by value when
/// deciding whether a cached layout is still current.
#[derive(Clone, Debug, PartialEq)]
struct ViewParams {
    x_attr: String,
    y_attr: String,
    group_attr: String,
    weight: WeightMode,
    label_attr: Option<String>,
    hierarchy_layout: HierarchyLayoutKind,
}

struct ViewModel {
    dataset: Dataset,
    dataset_revision: u64,
    params: ViewParams,
    selection: SelectionState,
    search: String,
    scatter_cache: Option<ScatterCache>,
    hierarchy_cache: Option<HierarchyCache>,
    search_match_cache: Option<SearchMatchCache>,
    scatter_brush_start: Option<Pos2>,
    scatter_last_hover: Option<usize>,
    hierarchy_last_hover: Option<usize>,
}

#[derive(Clone, Debug, PartialEq)]
struct ScatterKey {
    revision: u64,
    x_attr: String,
    y_attr: String,
    width: f32,
    height: f32,
}

struct ScatterCache {
    key: ScatterKey,
    layout: ScatterLayout,
}

#[derive(Clone, Debug, PartialEq)]
struct HierarchyKey {
    revision: u64,
    group_attr: String,
    weight: WeightMode,
    label_attr: Option<String>,
    kind: HierarchyLayoutKind,
    width: f32,
    height: f32,
}

struct HierarchyCache {
    key: HierarchyKey,
    layout: HierarchyLayout,
}

struct SearchMatchCache {
    revision: u64,
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl DataLensApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        dataset_path: PathBuf,
        initial: InitialParams,
    ) -> Self {
        let state = Self::start_load(dataset_path.clone());
        Self {
            dataset_path,
            initial,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(dataset_path: PathBuf) -> Receiver<Result<Dataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&dataset_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(dataset_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(dataset_path),
        }
    }
}

impl eframe::App for DataLensApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(dataset) => {
                            AppState::Ready(Box::new(ViewModel::new(dataset, &self.initial)))
                        }
                        Err(error) => {
                            log::error!("dataset load failed: {error}");
                            AppState::Error(error)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.dataset_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.dataset_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.dataset_path.clone()));
                }

                // Last write wins: only the most recently spawned reload is
                // polled; an older channel that was replaced gets dropped with
                // its result unread.
                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(dataset)) => model.replace_dataset(dataset),
                        Ok(Err(error)) => {
                            // Keep the current dataset on a failed reload; the
                            // old views stay coherent.
                            log::error!("dataset reload failed: {error}");
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            log::error!("dataset reload worker disconnected");
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
