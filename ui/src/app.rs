use std::sync::Arc;

use crate::{state::State, widgets};

pub struct UsuariosApp {
    state: State,
}

impl UsuariosApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }
}

impl eframe::App for UsuariosApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.time.tick();
        let now = self.state.time.now();

        let table = &mut self.state.table;
        if !table.is_mounted() {
            // Finished fetches wake the UI even when no input arrives.
            let repaint = ctx.clone();
            table.set_notify(Arc::new(move || repaint.request_repaint()));
            table.mount(now);
        }
        table.sync(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::users_panel(table, now, ui);
        });
    }
}
