use eframe::egui;
use egui::{Color32, RichText};
use rceditor_core::{
    format_date, parse_date, remove_item, ManifestViewState, Notification, ProjectRow, SourceRow,
    TextItem, SAVE_REJECTED_MESSAGE,
};

const DIRECTIONS: [&str; 2] = ["ltr", "rtl"];
const CHECKING_LEVELS: [&str; 3] = ["1", "2", "3"];
const LABEL_WIDTH: f32 = 140.0;

/// 日期欄位的輸入草稿。 / Text buffers behind the two date fields.
///
/// The view-state stores real dates; the user types text. A draft only reaches the
/// view-state once it parses, and drafts are reseeded whenever the view-state revision moves.
#[derive(Debug, Default)]
pub struct DateDrafts {
    pub issued: String,
    pub modified: String,
    issued_error: Option<String>,
    modified_error: Option<String>,
    revision: Option<u64>,
}

impl DateDrafts {
    pub fn sync(&mut self, state: &ManifestViewState) {
        if self.revision == Some(state.revision()) {
            return;
        }
        self.issued = format_date(state.issued);
        self.modified = format_date(state.modified);
        self.issued_error = None;
        self.modified_error = None;
        self.revision = Some(state.revision());
    }

    /// Pushes parseable drafts into `state`; unparseable ones keep their error text.
    pub fn commit(&mut self, state: &mut ManifestViewState) {
        match parse_date("issued", self.issued.trim()) {
            Ok(date) => {
                state.issued = date;
                self.issued_error = None;
            }
            Err(err) => self.issued_error = Some(err.to_string()),
        }
        match parse_date("modified", self.modified.trim()) {
            Ok(date) => {
                state.modified = date;
                self.modified_error = None;
            }
            Err(err) => self.modified_error = Some(err.to_string()),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.issued_error.is_some() || self.modified_error.is_some()
    }

    /// 存檔前提交日期；草稿無效時回傳拒絕通知。 / Commits the drafts ahead of a save and
    /// returns the rejection notice when either one still fails to parse.
    pub fn commit_for_save(&mut self, state: &mut ManifestViewState) -> Option<Notification> {
        self.commit(state);
        self.has_errors().then(|| Notification::error(SAVE_REJECTED_MESSAGE))
    }
}

pub fn show_form(ui: &mut egui::Ui, state: &mut ManifestViewState, dates: &mut DateDrafts) {
    dates.sync(state);

    ui.heading("Dublin Core");
    egui::Grid::new("dublin_core")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .min_col_width(LABEL_WIDTH)
        .show(ui, |ui| {
            text_row(ui, "Title", &mut state.title);
            text_row(ui, "Identifier", &mut state.identifier);
            text_row(ui, "Type", &mut state.kind);
            text_row(ui, "Format", &mut state.format);
            text_row(ui, "Conforms to", &mut state.conforms_to);
            text_row(ui, "Version", &mut state.version);
            text_row(ui, "Creator", &mut state.creator);
            text_row(ui, "Publisher", &mut state.publisher);
            text_row(ui, "Rights", &mut state.rights);
            text_row(ui, "Subject", &mut state.subject);

            ui.label("Description");
            ui.add(
                egui::TextEdit::multiline(&mut state.description)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            ui.end_row();

            let mut dates_changed = false;
            dates_changed |= date_row(ui, "Issued", &mut dates.issued, &dates.issued_error);
            dates_changed |= date_row(ui, "Modified", &mut dates.modified, &dates.modified_error);
            if dates_changed {
                dates.commit(state);
            }
        });

    ui.separator();
    ui.heading("Language");
    egui::Grid::new("language")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .min_col_width(LABEL_WIDTH)
        .show(ui, |ui| {
            text_row(ui, "Identifier", &mut state.language_identifier);
            text_row(ui, "Title", &mut state.language_title);
            ui.label("Direction");
            choice(ui, "language_direction", &mut state.language_direction, &DIRECTIONS);
            ui.end_row();
        });

    ui.separator();
    text_list(ui, "Contributors", "contributors", &mut state.contributors);
    ui.separator();
    text_list(ui, "Relations", "relations", &mut state.relations);

    ui.separator();
    ui.heading("Sources");
    source_grid(ui, &mut state.sources);

    ui.separator();
    ui.heading("Checking");
    egui::Grid::new("checking")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .min_col_width(LABEL_WIDTH)
        .show(ui, |ui| {
            ui.label("Level");
            choice(ui, "checking_level", &mut state.checking_level, &CHECKING_LEVELS);
            ui.end_row();
        });
    text_list(ui, "Checking entities", "checking_entities", &mut state.checking_entities);

    ui.separator();
    ui.heading("Projects");
    project_grid(ui, &mut state.projects);
}

fn text_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
    ui.end_row();
}

fn date_row(ui: &mut egui::Ui, label: &str, draft: &mut String, error: &Option<String>) -> bool {
    ui.label(label);
    let changed = ui
        .horizontal(|ui| {
            let response = ui.add(egui::TextEdit::singleline(draft).hint_text("YYYY-MM-DD"));
            if let Some(error) = error {
                ui.label(RichText::new(error).color(Color32::LIGHT_RED));
            }
            response.changed()
        })
        .inner;
    ui.end_row();
    changed
}

fn choice(ui: &mut egui::Ui, id: &str, value: &mut String, options: &[&str]) {
    egui::ComboBox::from_id_source(id)
        .selected_text(value.as_str())
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), "(none)");
            for option in options {
                ui.selectable_value(value, (*option).to_string(), *option);
            }
        });
}

fn text_list(ui: &mut egui::Ui, title: &str, id: &str, items: &mut Vec<TextItem>) {
    ui.horizontal(|ui| {
        ui.strong(title);
        if ui.small_button("Add").clicked() {
            items.push(TextItem::new(""));
        }
    });
    let mut doomed = None;
    ui.push_id(id, |ui| {
        for item in items.iter_mut() {
            ui.push_id(item.id(), |ui| {
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut item.text);
                    if ui.small_button("Remove").clicked() {
                        doomed = Some(item.id());
                    }
                });
            });
        }
    });
    if let Some(id) = doomed {
        remove_item(items, id);
    }
}

fn source_grid(ui: &mut egui::Ui, sources: &mut Vec<SourceRow>) {
    let mut doomed = None;
    egui::Grid::new("sources")
        .num_columns(4)
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Identifier");
            ui.strong("Language");
            ui.strong("Version");
            ui.label("");
            ui.end_row();
            for (index, row) in sources.iter_mut().enumerate() {
                ui.text_edit_singleline(&mut row.identifier);
                ui.text_edit_singleline(&mut row.language);
                ui.text_edit_singleline(&mut row.version);
                if ui.small_button("Remove").clicked() {
                    doomed = Some(index);
                }
                ui.end_row();
            }
        });
    if let Some(index) = doomed {
        sources.remove(index);
    }
    if ui.small_button("Add source").clicked() {
        sources.push(SourceRow::default());
    }
}

fn project_grid(ui: &mut egui::Ui, projects: &mut Vec<ProjectRow>) {
    let mut doomed = None;
    egui::ScrollArea::horizontal()
        .id_source("projects_scroll")
        .show(ui, |ui| {
            egui::Grid::new("projects")
                .num_columns(7)
                .striped(true)
                .show(ui, |ui| {
                    for header in ["Title", "Versification", "Identifier", "Sort", "Path", "Category"] {
                        ui.strong(header);
                    }
                    ui.label("");
                    ui.end_row();
                    for (index, row) in projects.iter_mut().enumerate() {
                        ui.text_edit_singleline(&mut row.title);
                        ui.text_edit_singleline(&mut row.versification);
                        ui.text_edit_singleline(&mut row.identifier);
                        let sort_ok = row.sort.trim().parse::<i64>().is_ok();
                        let sort = ui.add(
                            egui::TextEdit::singleline(&mut row.sort).desired_width(48.0),
                        );
                        if !sort_ok {
                            sort.on_hover_text("Sort must be a whole number");
                        }
                        ui.text_edit_singleline(&mut row.path);
                        ui.text_edit_singleline(&mut row.category);
                        if ui.small_button("Remove").clicked() {
                            doomed = Some(index);
                        }
                        ui.end_row();
                    }
                });
        });
    if let Some(index) = doomed {
        projects.remove(index);
    }
    if ui.small_button("Add project").clicked() {
        projects.push(ProjectRow::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rceditor_container::Manifest;
    use rceditor_core::NotificationKind;

    #[test]
    fn drafts_follow_revision_changes() {
        let mut state = ManifestViewState::new();
        let mut manifest = Manifest::default();
        manifest.dublin_core.issued = "2021-02-03".into();
        manifest.dublin_core.modified = "2021-02-04".into();
        state.load(&manifest).unwrap();

        let mut drafts = DateDrafts::default();
        drafts.sync(&state);
        assert_eq!(drafts.issued, "2021-02-03");

        drafts.issued = "typing...".into();
        drafts.sync(&state);
        assert_eq!(drafts.issued, "typing...", "same revision keeps the draft");

        state.clear();
        drafts.sync(&state);
        assert_eq!(drafts.issued, format_date(state.issued));
    }

    #[test]
    fn commit_only_applies_parseable_dates() {
        let mut state = ManifestViewState::new();
        let mut drafts = DateDrafts::default();
        drafts.sync(&state);
        let before = state.modified;

        drafts.issued = "2020-12-31".into();
        drafts.modified = "31/12/2020".into();
        drafts.commit(&mut state);

        assert_eq!(state.issued, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap());
        assert_eq!(state.modified, before);
        assert!(drafts.has_errors());

        drafts.modified = "2021-01-01".into();
        drafts.commit(&mut state);
        assert!(!drafts.has_errors());
    }

    #[test]
    fn save_is_blocked_while_a_draft_is_invalid() {
        let mut state = ManifestViewState::new();
        let mut drafts = DateDrafts::default();
        drafts.sync(&state);
        let before = state.issued;

        drafts.issued = "2020-13-01".into();
        let blocked = drafts.commit_for_save(&mut state).expect("save should be blocked");
        assert_eq!(blocked.kind, NotificationKind::Error);
        assert_eq!(blocked.message, SAVE_REJECTED_MESSAGE);
        assert_eq!(state.issued, before);

        drafts.issued = "2020-12-01".into();
        assert!(drafts.commit_for_save(&mut state).is_none());
        assert_eq!(state.issued, NaiveDate::from_ymd_opt(2020, 12, 1).unwrap());
    }
}
