use crate::DataMasterApp;

enum CellAction {
    Begin(usize, usize),
    Commit,
    Cancel,
    ToggleRow(usize),
}

pub fn table_panel(app: &mut DataMasterApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let document = app.session.document();
        if document.columns().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Load data to begin analysis.");
            });
            return;
        }

        // Collect what the user asked for, then apply it once the grid no
        // longer borrows the document.
        let mut action = None;

        egui::ScrollArea::both().auto_shrink([false, false]).show(ui, |ui| {
            egui::Grid::new("document_grid")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    ui.strong("");
                    for column in document.columns() {
                        ui.strong(&column.name)
                            .on_hover_text(column.column_type.name());
                    }
                    ui.end_row();

                    for (row, values) in document.rows().iter().enumerate() {
                        let selected = app.selected_rows.contains(&row);
                        if ui.selectable_label(selected, row.to_string()).clicked() {
                            action = Some(CellAction::ToggleRow(row));
                        }
                        for (col, value) in values.iter().enumerate() {
                            if app.editing == Some((row, col)) {
                                let response = ui.text_edit_singleline(&mut app.edit_buffer);
                                if app.focus_edit {
                                    response.request_focus();
                                    app.focus_edit = false;
                                }
                                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                                    action = Some(CellAction::Cancel);
                                } else if response.lost_focus() {
                                    action = Some(CellAction::Commit);
                                }
                            } else {
                                let highlighted = app.highlight == Some((row, col));
                                let response = ui.selectable_label(highlighted, value.to_string());
                                if highlighted {
                                    response.scroll_to_me(Some(egui::Align::Center));
                                } else if response.double_clicked() {
                                    action = Some(CellAction::Begin(row, col));
                                }
                            }
                        }
                        ui.end_row();
                    }
                });
        });

        match action {
            Some(CellAction::Begin(row, col)) => {
                app.commit_edit();
                app.highlight = None;
                app.begin_edit(row, col);
            }
            Some(CellAction::Commit) => app.commit_edit(),
            Some(CellAction::Cancel) => app.cancel_edit(),
            Some(CellAction::ToggleRow(row)) => {
                if !app.selected_rows.remove(&row) {
                    app.selected_rows.insert(row);
                }
            }
            None => {}
        }
    });
}
