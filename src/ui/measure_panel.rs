use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::SketchSettings;
use crate::geodesy::{format_area, format_bearing, format_distance};
use crate::sketch::{export_table, DrawSession};

/// Right-hand measurement panel: one row per vertex with the arriving
/// segment's distance and bearing, the perimeter/area summary, and a
/// copy-as-TSV button.
pub fn measure_panel_ui(
    mut contexts: EguiContexts,
    session: Res<DrawSession>,
    settings: Res<SketchSettings>,
) -> Result {
    let rows = session.measure_rows();
    if rows.is_empty() {
        return Ok(());
    }
    let summary = session.summary();

    egui::SidePanel::right("measure_panel")
        .default_width(280.0)
        .resizable(true)
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::same(10)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Measurements").size(16.0).strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button("Copy")
                        .on_hover_text("Copy the table as tab-separated text")
                        .clicked()
                    {
                        let table = export_table(
                            &rows,
                            &summary,
                            settings.distance_unit,
                            settings.area_unit,
                        );
                        ui.ctx().copy_text(table);
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("measure_rows")
                    .num_columns(5)
                    .striped(true)
                    .min_col_width(24.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new("#").strong());
                        ui.label(egui::RichText::new("X").strong());
                        ui.label(egui::RichText::new("Y").strong());
                        ui.label(
                            egui::RichText::new(format!(
                                "Dist ({})",
                                settings.distance_unit.label()
                            ))
                            .strong(),
                        );
                        ui.label(egui::RichText::new("Bearing").strong());
                        ui.end_row();

                        for row in &rows {
                            ui.label(row.index.to_string());
                            ui.label(format!("{:.6}", row.coord.x));
                            ui.label(format!("{:.6}", row.coord.y));
                            ui.label(
                                row.distance_m
                                    .map(|d| format_distance(d, settings.distance_unit))
                                    .unwrap_or_default(),
                            );
                            ui.label(row.bearing_deg.map(format_bearing).unwrap_or_default());
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                ui.separator();

                ui.label(format!(
                    "Perimeter: {}",
                    format_distance(summary.perimeter_m, settings.distance_unit)
                ));
                if let Some(area) = summary.area_m2 {
                    ui.label(format!("Area: {}", format_area(area, settings.area_unit)));
                }
            });
        });
    Ok(())
}
