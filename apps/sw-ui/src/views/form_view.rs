use sw_app::ExpenseForm;

#[derive(Default)]
pub struct FormView;

impl FormView {
    /// Draw the form. Returns true when the user asked to submit.
    pub fn show(&mut self, ui: &mut egui::Ui, form: &mut ExpenseForm, busy: bool) -> bool {
        ui.heading("Add expense");
        ui.add_space(6.0);

        egui::Grid::new("expense_form")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Item name");
                ui.text_edit_singleline(&mut form.name);
                ui.end_row();

                ui.label("Item cost");
                ui.text_edit_singleline(&mut form.cost);
                ui.end_row();
            });

        ui.add_space(6.0);
        let submitted = ui
            .add_enabled(!busy, egui::Button::new("Add item"))
            .clicked();

        if busy {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Saving...");
            });
        }

        if form.has_error() {
            ui.colored_label(egui::Color32::from_rgb(230, 80, 80), &form.error);
        }

        submitted
    }
}
