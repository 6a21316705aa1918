use crate::DataMasterApp;

pub fn tools_panel(app: &mut DataMasterApp, ctx: &egui::Context) {
    let actions = app.session.action_state();

    egui::SidePanel::right("tools_panel")
        .resizable(false)
        .exact_width(250.0)
        .show(ctx, |ui| {
            ui.heading("File Operations");
            ui.horizontal(|ui| {
                ui.label("Path:");
                ui.text_edit_singleline(&mut app.settings.last_path);
            });
            ui.horizontal(|ui| {
                if ui.button("Import File...").clicked() {
                    app.import();
                }
                if ui.add_enabled(actions.has_data, egui::Button::new("Export File...")).clicked() {
                    app.export();
                }
            });
            ui.separator();

            ui.heading("Row Operations");
            if ui.add_enabled(!app.session.document().columns().is_empty(), egui::Button::new("Add Row")).clicked() {
                app.add_row();
            }
            let can_delete = actions.has_data && !app.selected_rows.is_empty();
            if ui.add_enabled(can_delete, egui::Button::new("Delete Selected Row(s)")).clicked() {
                app.delete_selected_rows();
            }
            ui.separator();

            ui.heading("History");
            ui.horizontal(|ui| {
                if ui.add_enabled(actions.can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(actions.can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            if ui.add_enabled(actions.has_timeline, egui::Button::new("Show Timeline...")).clicked() {
                app.show_timeline = true;
            }
            if ui.add_enabled(actions.can_restart, egui::Button::new("Restart All Edits")).clicked() {
                app.confirm_restart = true;
            }
            ui.separator();

            ui.heading("Tools");
            ui.add_enabled_ui(actions.has_data, |ui| {
                ui.horizontal(|ui| {
                    let response = ui.text_edit_singleline(&mut app.find_text);
                    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Find").clicked() || submitted {
                        app.find();
                    }
                });
                if ui.button("Get Document Info").clicked() {
                    app.show_info = true;
                }
            });
        });
}

pub fn status_bar(app: &DataMasterApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let document = app.session.document();
            ui.label(format!("{} rows x {} columns", document.row_count(), document.column_count()));
            if let Some(text) = app.last_event_text() {
                ui.separator();
                ui.label(text);
            }
            if !app.status.is_empty() {
                ui.separator();
                ui.label(&app.status);
            }
        });
    });
}
