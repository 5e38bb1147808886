use eframe::egui::{self, Ui};

use crate::hierarchy::WeightMode;
use crate::layout::HierarchyLayoutKind;

use super::super::{SelectionEvent, ViewModel};

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui, events: &mut Vec<SelectionEvent>) {
        ui.add_space(4.0);
        ui.heading("Scatterplot");
        ui.add_space(4.0);

        let numeric = self.dataset.numeric_columns();
        let text = self.dataset.text_columns();

        attribute_picker(ui, "X attribute", &mut self.params.x_attr, &numeric);
        attribute_picker(ui, "Y attribute", &mut self.params.y_attr, &numeric);

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Hierarchy");
        ui.add_space(4.0);

        attribute_picker(ui, "Group by", &mut self.params.group_attr, &text);
        weight_picker(ui, &mut self.params.weight, &numeric);

        egui::ComboBox::from_label("Layout")
            .selected_text(self.params.hierarchy_layout.label())
            .show_ui(ui, |ui| {
                for kind in HierarchyLayoutKind::ALL {
                    ui.selectable_value(&mut self.params.hierarchy_layout, kind, kind.label());
                }
            });

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Search");
        ui.add_space(4.0);

        ui.add(
            egui::TextEdit::singleline(&mut self.search).hint_text("fuzzy match records..."),
        );
        if self.selection.has_selection() && !self.search.trim().is_empty() {
            ui.small("search highlight resumes when the selection is cleared");
        }

        ui.add_space(10.0);
        ui.separator();
        ui.heading("Selection");
        ui.add_space(4.0);

        if self.selection.has_selection() {
            ui.label(format!("{} records selected", self.selection.selection_len()));
            if ui.button("Clear selection").clicked() {
                events.push(SelectionEvent::Clear);
            }

            const SUMMARY_ROWS: usize = 12;
            for label in self.selection_summary_labels(SUMMARY_ROWS) {
                ui.small(label);
            }
            let hidden = self
                .selection
                .selection_len()
                .saturating_sub(SUMMARY_ROWS);
            if hidden > 0 {
                ui.small(format!("... and {hidden} more"));
            }
        } else {
            ui.label("Click, brush, or pick a group to select.");
        }
    }
}

fn attribute_picker(ui: &mut Ui, label: &str, current: &mut String, columns: &[String]) {
    egui::ComboBox::from_label(label)
        .selected_text(current.as_str())
        .show_ui(ui, |ui| {
            for column in columns {
                ui.selectable_value(current, column.clone(), column);
            }
        });
}

fn weight_picker(ui: &mut Ui, weight: &mut WeightMode, columns: &[String]) {
    let selected_text = match weight {
        WeightMode::Count => "record count".to_owned(),
        WeightMode::Column(name) => name.clone(),
    };

    egui::ComboBox::from_label("Weight")
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            ui.selectable_value(weight, WeightMode::Count, "record count");
            for column in columns {
                ui.selectable_value(
                    weight,
                    WeightMode::Column(column.clone()),
                    column,
                );
            }
        });
}
