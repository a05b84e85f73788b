use std::sync::Arc;
use std::time::Instant;

use sw_app::{AppConfig, AppError, ExpenseForm, ExpenseTracker};
use sw_store::{DocumentStore, JsonFileStore};

use crate::views::{ChartView, FormView};
use crate::write_worker::{WriteMessage, WriteWorker};

pub struct SpendwheelApp {
    config: AppConfig,
    store: Option<Arc<dyn DocumentStore>>,
    tracker: Option<ExpenseTracker>,
    form: ExpenseForm,
    form_view: FormView,
    chart_view: ChartView,
    write_worker: Option<WriteWorker>,
    status: Option<String>,
    last_refresh: Instant,
}

impl SpendwheelApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            config,
            store: None,
            tracker: None,
            form: ExpenseForm::new(),
            form_view: FormView,
            chart_view: ChartView,
            write_worker: None,
            status: None,
            last_refresh: Instant::now(),
        };
        if let Err(e) = app.connect() {
            tracing::error!("failed to open store: {e}");
            app.status = Some(e.to_string());
        }
        app
    }

    fn connect(&mut self) -> Result<(), AppError> {
        let store: Arc<dyn DocumentStore> =
            Arc::new(JsonFileStore::open(self.config.store_dir.clone())?);
        let tracker =
            ExpenseTracker::connect(store.as_ref(), &self.config.collection, self.config.chart.clone())?;
        self.status = Some(format!(
            "Watching '{}' in {}",
            self.config.collection,
            self.config.store_dir.display()
        ));
        self.store = Some(store);
        self.tracker = Some(tracker);
        Ok(())
    }

    fn poll_worker(&mut self) {
        let Some(worker) = &self.write_worker else {
            return;
        };
        let Some(msg) = worker.poll() else {
            return;
        };

        match msg {
            WriteMessage::Done { id } => {
                self.form.complete();
                self.status = Some(format!("Added {id}"));
            }
            WriteMessage::Failed { message } => {
                self.status = Some(message);
            }
        }
        self.write_worker = None;
    }

    fn poll_store(&mut self, now: Instant) {
        if now.duration_since(self.last_refresh) >= self.config.refresh_interval() {
            self.last_refresh = now;
            if let Some(store) = &self.store
                && let Err(e) = store.refresh()
            {
                tracing::warn!("store refresh failed: {e}");
                self.status = Some(format!("Refresh failed: {e}"));
            }
        }

        let Some(tracker) = &mut self.tracker else {
            return;
        };
        match tracker.pump(now) {
            Ok(report) if !report.is_idle() => {
                tracing::debug!(
                    batches = report.batches,
                    unmatched = report.deltas.unmatched,
                    "tracker pumped"
                );
            }
            Ok(_) => {}
            Err(e) => {
                self.status = Some(e.to_string());
                self.tracker = None;
            }
        }
    }

    fn submit(&mut self) {
        let Some(expense) = self.form.submit() else {
            return;
        };
        let Some(store) = &self.store else {
            self.status = Some("No store open".to_string());
            return;
        };
        self.write_worker = Some(WriteWorker::start(
            Arc::clone(store),
            &self.config.collection,
            expense,
        ));
    }
}

impl eframe::App for SpendwheelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_worker();
        self.poll_store(now);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    ui.label(status);
                }
                if let Some(tracker) = &self.tracker {
                    ui.separator();
                    ui.label(format!("{} item(s)", tracker.snapshot().len()));
                }
            });
        });

        let mut submit = false;
        egui::SidePanel::left("form")
            .default_width(240.0)
            .show(ctx, |ui| {
                submit = self
                    .form_view
                    .show(ui, &mut self.form, self.write_worker.is_some());
            });
        if submit {
            self.submit();
        }

        egui::CentralPanel::default().show(ctx, |ui| match &self.tracker {
            Some(tracker) => self.chart_view.show(ui, tracker, now),
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("Not connected to a store");
                });
            }
        });

        let animating = self.tracker.as_ref().is_some_and(|t| t.is_animating(now));
        if animating || self.write_worker.is_some() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.config.refresh_interval());
        }
    }
}
