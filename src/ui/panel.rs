// src/ui/panel.rs
//! Overlay panels for the showcase
//!
//! A status panel with the stage phase, the composed placements and the scene
//! objects, plus a small annotation window for the hero model.

use crate::{
    gfx::scene::{object::Object, scene::Scene},
    stage::Stage,
};

/// Status panel listing the stage progress, placements and scene objects
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `stage` - Stage whose progress is displayed; float toggles recompose it
/// * `scene` - Mutable scene reference for visibility toggles
/// * `selected_index` - Currently selected object index
pub fn showcase_panel(
    ui: &imgui::Ui,
    stage: &mut Stage,
    scene: &mut Scene,
    selected_index: &mut Option<usize>,
) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.28).clamp(320.0, 460.0);

    ui.window("Showcase")
        .size([panel_width, 0.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .resizable(true)
        .collapsible(true)
        .build(|| {
            render_stage_status(ui, stage);
            ui.separator();
            render_placements(ui, stage);
            ui.separator();
            render_object_list(ui, scene, selected_index);
            render_selected_object(ui, scene, selected_index);
        });
}

/// Floating annotation next to the hero model
pub fn annotation_overlay(ui: &imgui::Ui, text: &str) {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }

    ui.window("##annotation")
        .position(
            [display_size[0] * 0.5 + 40.0, display_size[1] * 0.5 - 80.0],
            imgui::Condition::Always,
        )
        .flags(
            imgui::WindowFlags::NO_DECORATION
                | imgui::WindowFlags::ALWAYS_AUTO_RESIZE
                | imgui::WindowFlags::NO_MOVE
                | imgui::WindowFlags::NO_SAVED_SETTINGS
                | imgui::WindowFlags::NO_FOCUS_ON_APPEARING
                | imgui::WindowFlags::NO_NAV,
        )
        .bg_alpha(0.8)
        .build(|| {
            ui.text(text);
        });
}

fn render_stage_status(ui: &imgui::Ui, stage: &Stage) {
    ui.text(format!("Stage: {}", stage.phase().label()));
    ui.text(format!(
        "Slots: {} (scan #{})",
        stage.registry().len(),
        stage.registry().generation()
    ));
    ui.text(format!(
        "Placed: {} / {} requested",
        stage.placed_count(),
        stage.descriptors().len()
    ));
}

fn render_placements(ui: &imgui::Ui, stage: &mut Stage) {
    if !ui.collapsing_header("Placements", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    let mut any = false;
    let mut toggled = None;
    for (index, instance) in stage.instances().enumerate() {
        any = true;
        let mut floating = instance.descriptor.floating;
        if ui.checkbox(format!("Float##placement{}", index), &mut floating) {
            toggled = Some((index, floating));
        }
        ui.same_line();

        let position = instance.slot.position;
        let loaded = if stage.placement_object(index).is_some() {
            "ready"
        } else {
            "loading"
        };
        ui.text(format!(
            "{}: {} x{:.2} at ({:.2}, {:.2}, {:.2}), {}",
            index,
            instance.descriptor.asset_url,
            instance.descriptor.scale,
            position.x,
            position.y,
            position.z,
            loaded
        ));
    }

    if !any {
        ui.text_disabled("Nothing placed yet");
    }

    // Placements pair with descriptors by index
    if let Some((index, floating)) = toggled {
        let mut descriptors = stage.descriptors().to_vec();
        if let Some(descriptor) = descriptors.get_mut(index) {
            descriptor.floating = floating;
            stage.set_placements(descriptors);
        }
    }
}

/// Renders the object selection list
fn render_object_list(ui: &imgui::Ui, scene: &Scene, selected_index: &mut Option<usize>) {
    ui.text("Scene Objects");

    let object_names = scene.get_object_names();
    if object_names.is_empty() {
        render_empty_state(ui);
        return;
    }

    ui.child_window("object_list")
        .size([0.0, 120.0])
        .border(true)
        .build(|| {
            for (i, object_name) in object_names.iter().enumerate() {
                let is_selected = *selected_index == Some(i);

                if ui
                    .selectable_config(object_name)
                    .selected(is_selected)
                    .allow_double_click(false)
                    .build()
                {
                    *selected_index = Some(i);
                }
            }
        });
}

fn render_selected_object(ui: &imgui::Ui, scene: &mut Scene, selected_index: &Option<usize>) {
    let Some(object) = selected_index.and_then(|index| scene.objects.get_mut(index)) else {
        return;
    };

    ui.spacing();
    ui.text(format!("Selected: {}", object.name));
    ui.text_disabled(&object.source);
    ui.checkbox("Visible in Scene", &mut object.visible);
    render_object_info(ui, object);
}

/// Renders object statistics information
fn render_object_info(ui: &imgui::Ui, object: &Object) {
    ui.columns(2, "stats", false);
    ui.text("Meshes:");
    ui.next_column();
    ui.text(format!("{}", object.meshes.len()));
    ui.next_column();
    ui.text("Triangles:");
    ui.next_column();
    ui.text(format!("{}", object.triangle_count()));
    ui.next_column();
    ui.text("Vertices:");
    ui.next_column();
    ui.text(format!("{}", object.vertex_count()));
    ui.columns(1, "", false);
}

/// Renders empty state when no objects are in the scene
fn render_empty_state(ui: &imgui::Ui) {
    ui.spacing();
    ui.text_disabled("No objects yet");
    ui.text_disabled("Models appear here as their assets finish loading.");
}
