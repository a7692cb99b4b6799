mod form;

use eframe::{egui, App, Frame, NativeOptions};
use egui::{Align, Align2, Color32, Layout, RichText};
use log::{info, warn};
use rceditor_container::MANIFEST_FILE;
use rceditor_core::{
    init_logging, DirectoryChooser, EditorViewModel, Notification, NotificationKind,
};
use rceditor_settings::{PreferencesStore, DEFAULT_LOG_LEVEL};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::form::{show_form, DateDrafts};

const APP_TITLE: &str = "RC Editor";

/// 以 rfd 開啟原生資料夾選擇器。 / Native folder picker backed by `rfd`.
struct RfdChooser {
    start: Option<PathBuf>,
}

impl DirectoryChooser for RfdChooser {
    fn choose_directory(&self, caption: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title(caption);
        if let Some(start) = self.start.as_deref().filter(|dir| dir.is_dir()) {
            dialog = dialog.set_directory(start);
        }
        dialog.pick_folder()
    }
}

struct RcEditorApp {
    view_model: EditorViewModel,
    preferences: Option<PreferencesStore>,
    dates: DateDrafts,
    notices: VecDeque<Notification>,
    remembered: Option<PathBuf>,
}

impl RcEditorApp {
    fn new(cc: &eframe::CreationContext<'_>, preferences: Option<PreferencesStore>) -> Self {
        let ctx = cc.egui_ctx.clone();
        let view_model =
            EditorViewModel::default().with_waker(Arc::new(move || ctx.request_repaint()));
        Self {
            view_model,
            preferences,
            dates: DateDrafts::default(),
            notices: VecDeque::new(),
            remembered: None,
        }
    }

    fn chooser(&self) -> RfdChooser {
        let start = self
            .preferences
            .as_ref()
            .and_then(|store| store.preferences().last_directory.clone());
        RfdChooser { start }
    }

    fn recent(&self) -> Vec<PathBuf> {
        recent_dirs(self.preferences.as_ref())
    }

    fn pump(&mut self) {
        self.view_model.pump();
        self.notices.extend(self.view_model.take_notifications());
        self.remember_loaded_container();
    }

    fn remember_loaded_container(&mut self) {
        if !self.view_model.is_loaded() {
            return;
        }
        let Some(dir) = self.view_model.container_dir().map(Path::to_path_buf) else {
            return;
        };
        if self.remembered.as_ref() == Some(&dir) {
            return;
        }
        if let Some(store) = self.preferences.as_mut() {
            if let Err(err) = store.update(|prefs| prefs.remember_container(&dir)) {
                warn!("event=preferences_save module=gui status=error error={err}");
            }
        }
        self.remembered = Some(dir);
    }

    fn quit(&mut self, ctx: &egui::Context) {
        self.view_model.handle_app_quit();
        self.notices.extend(self.view_model.take_notifications());
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        let busy = self.view_model.is_busy();
        let loaded = self.view_model.is_loaded();
        let recent = self.recent();
        egui::TopBottomPanel::top("menu_bar")
            .resizable(false)
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.add_enabled(!busy, egui::Button::new("New…")).clicked() {
                            ui.close_menu();
                            let chooser = self.chooser();
                            self.view_model.handle_new_document_selected(&chooser);
                        }
                        if ui.add_enabled(!busy, egui::Button::new("Open…")).clicked() {
                            ui.close_menu();
                            let chooser = self.chooser();
                            self.view_model.handle_open_directory_selected(&chooser);
                        }
                        ui.add_enabled_ui(!busy && !recent.is_empty(), |ui| {
                            ui.menu_button("Open Recent", |ui| {
                                for dir in &recent {
                                    if ui.button(dir.display().to_string()).clicked() {
                                        ui.close_menu();
                                        self.view_model.open_container(dir.clone());
                                    }
                                }
                            });
                        });
                        if ui
                            .add_enabled(!busy && loaded, egui::Button::new("Save"))
                            .clicked()
                        {
                            ui.close_menu();
                            self.save();
                        }
                        ui.separator();
                        if ui.button("Exit").clicked() {
                            ui.close_menu();
                            self.quit(ctx);
                        }
                    });
                });
            });
    }

    fn save(&mut self) {
        if let Some(rejected) = self.dates.commit_for_save(self.view_model.view_state_mut()) {
            warn!("event=container_save module=gui status=rejected reason=invalid_date");
            self.notices.push_back(rejected);
            return;
        }
        self.view_model.handle_save_document_selected();
        self.notices.extend(self.view_model.take_notifications());
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    match self.view_model.container_dir() {
                        Some(dir) => ui.label(dir.display().to_string()),
                        None => ui.label("No Resource Container"),
                    };
                    if self.view_model.is_busy() {
                        ui.separator();
                        ui.spinner();
                        ui.label("Working…");
                    }
                });
            });
    }

    fn show_editor_area(&mut self, ctx: &egui::Context) {
        let enabled = self.view_model.is_loaded() && !self.view_model.is_busy();
        egui::CentralPanel::default().show(ctx, |ui| {
            if !self.view_model.is_loaded() && !self.view_model.is_busy() {
                ui.centered_and_justified(|ui| {
                    ui.label("Create or open a Resource Container from the File menu.");
                });
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_enabled_ui(enabled, |ui| {
                        show_form(ui, self.view_model.view_state_mut(), &mut self.dates);
                    });
                });
        });
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };
        let (title, color) = match notice.kind {
            NotificationKind::Error => ("Error", Color32::LIGHT_RED),
            NotificationKind::Success => ("Saved", Color32::LIGHT_GREEN),
        };
        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&notice.message).color(color));
                ui.add_space(8.0);
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.notices.pop_front();
        }
    }
}

impl App for RcEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.pump();

        if ctx.input(|input| input.viewport().close_requested()) && !self.view_model.quit_requested()
        {
            self.view_model.handle_app_quit();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_editor_area(ctx);
        self.show_notification(ctx);
    }
}

/// 「最近開啟」選單的項目，最新的在前。 / Entries of the Open Recent menu, newest first.
fn recent_dirs(preferences: Option<&PreferencesStore>) -> Vec<PathBuf> {
    preferences
        .map(|store| store.preferences().recent.iter().cloned().collect())
        .unwrap_or_default()
}

fn load_preferences() -> Option<PreferencesStore> {
    match PreferencesStore::load_default() {
        Ok(store) => Some(store),
        Err(err) => {
            eprintln!("rceditor: preferences unavailable: {err}");
            None
        }
    }
}

fn start_logging(preferences: Option<&PreferencesStore>) {
    let Some(store) = preferences else {
        return;
    };
    let Some(dir) = store.dir() else {
        return;
    };
    let level = store.preferences().log_level.as_str();
    let level = if level.is_empty() { DEFAULT_LOG_LEVEL } else { level };
    if let Err(err) = init_logging(level, dir.join("logs")) {
        eprintln!("rceditor: logging disabled: {err}");
    }
}

fn main() -> eframe::Result<()> {
    let mut preferences = load_preferences();
    start_logging(preferences.as_ref());
    if let Some(store) = preferences.as_mut() {
        match store.prune_recent(MANIFEST_FILE) {
            Ok(0) => {}
            Ok(removed) => info!("event=preferences_prune module=gui status=ok removed={removed}"),
            Err(err) => warn!("event=preferences_prune module=gui status=error error={err}"),
        }
    }
    info!("event=gui_start module=gui status=ok");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 760.0])
            .with_title(APP_TITLE),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| Box::new(RcEditorApp::new(cc, preferences))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rceditor_settings::EditorPreferences;

    #[test]
    fn recent_menu_lists_newest_first() {
        let mut prefs = EditorPreferences::default();
        prefs.remember_container(Path::new("/work/en_ulb"));
        prefs.remember_container(Path::new("/work/en_tn"));
        let store = PreferencesStore::new("/unused/preferences.json", prefs);

        assert_eq!(
            recent_dirs(Some(&store)),
            vec![PathBuf::from("/work/en_tn"), PathBuf::from("/work/en_ulb")]
        );
        assert!(recent_dirs(None).is_empty());
    }
}
