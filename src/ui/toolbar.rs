use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{
    CurrentTool, NewSketchRequest, RedoRequest, SketchSettings, SketchTool, UndoRequest,
};
use crate::geodesy::{AreaUnit, DistanceUnit};
use crate::sketch::DrawSession;

/// Main toolbar: tool buttons, snap toggle, unit selection, and history
/// controls.
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut settings: ResMut<SketchSettings>,
    session: Res<DrawSession>,
    mut undo_requests: MessageWriter<UndoRequest>,
    mut redo_requests: MessageWriter<RedoRequest>,
    mut new_requests: MessageWriter<NewSketchRequest>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                // Tool buttons with keyboard shortcuts
                for tool in SketchTool::all() {
                    let selected = current_tool.tool == *tool;
                    let button = egui::Button::new(
                        egui::RichText::new(tool_button_label(tool)).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    let response = ui.add(button);
                    if response.clicked() {
                        current_tool.tool = *tool;
                    }
                    response.on_hover_text(tool.display_name());
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.checkbox(&mut settings.snap_enabled, "Snap");

                ui.add_space(8.0);

                ui.label("Distance:");
                egui::ComboBox::from_id_salt("distance_unit_select")
                    .selected_text(settings.distance_unit.label())
                    .width(60.0)
                    .show_ui(ui, |ui| {
                        for unit in DistanceUnit::all() {
                            let is_selected = settings.distance_unit == *unit;
                            if ui.selectable_label(is_selected, unit.label()).clicked() {
                                settings.distance_unit = *unit;
                            }
                        }
                    });

                ui.label("Area:");
                egui::ComboBox::from_id_salt("area_unit_select")
                    .selected_text(settings.area_unit.label())
                    .width(70.0)
                    .show_ui(ui, |ui| {
                        for unit in AreaUnit::all() {
                            let is_selected = settings.area_unit == *unit;
                            if ui.selectable_label(is_selected, unit.label()).clicked() {
                                settings.area_unit = *unit;
                            }
                        }
                    });

                // Right-aligned history and session controls
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new("New").min_size(egui::vec2(0.0, 24.0)))
                        .clicked()
                    {
                        new_requests.write(NewSketchRequest);
                    }

                    ui.add_space(4.0);

                    if ui
                        .add_enabled(
                            session.can_redo(),
                            egui::Button::new("Redo").min_size(egui::vec2(0.0, 24.0)),
                        )
                        .clicked()
                    {
                        redo_requests.write(RedoRequest);
                    }

                    if ui
                        .add_enabled(
                            session.can_undo(),
                            egui::Button::new("Undo").min_size(egui::vec2(0.0, 24.0)),
                        )
                        .clicked()
                    {
                        undo_requests.write(UndoRequest);
                    }
                });
            });
        });
    Ok(())
}

/// Get the button label for a tool (with keyboard shortcut)
fn tool_button_label(tool: &SketchTool) -> &'static str {
    match tool {
        SketchTool::Select => "Select [V]",
        SketchTool::Point => "Point [P]",
        SketchTool::Line => "Line [L]",
        SketchTool::Polygon => "Polygon [G]",
        SketchTool::Rectangle => "Rectangle [R]",
    }
}
