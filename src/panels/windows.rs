use crate::DataMasterApp;

pub fn timeline_window(app: &mut DataMasterApp, ctx: &egui::Context) {
    if !app.show_timeline {
        return;
    }
    let mut open = true;
    let mut selected = None;
    egui::Window::new("Edit History Timeline")
        .open(&mut open)
        .default_size([600.0, 400.0])
        .show(ctx, |ui| {
            ui.label("Double-click to jump to a state:");
            egui::ScrollArea::vertical().show(ui, |ui| {
                for item in app.session.timeline() {
                    let text = if item.is_current {
                        egui::RichText::new(item.label).strong()
                    } else {
                        egui::RichText::new(item.label)
                    };
                    if ui.selectable_label(item.is_current, text).double_clicked() {
                        selected = Some(item.target);
                    }
                }
            });
        });
    if let Some(target) = selected {
        app.jump_to(target);
        open = false;
    }
    app.show_timeline = open;
}

pub fn info_window(app: &mut DataMasterApp, ctx: &egui::Context) {
    if !app.show_info {
        return;
    }
    let mut open = true;
    let info = app.session.info().to_string();
    egui::Window::new("Document Info")
        .open(&mut open)
        .default_size([700.0, 600.0])
        .show(ctx, |ui| {
            ui.monospace(info);
        });
    app.show_info = open;
}

pub fn restart_dialog(app: &mut DataMasterApp, ctx: &egui::Context) {
    if !app.confirm_restart {
        return;
    }
    let mut answer = None;
    egui::Window::new("Confirm Restart")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Discard all changes made in this session?");
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("No").clicked() {
                    answer = Some(false);
                }
            });
        });
    match answer {
        Some(true) => {
            app.confirm_restart = false;
            app.restart();
        }
        Some(false) => app.confirm_restart = false,
        None => {}
    }
}
