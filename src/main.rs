mod app;
mod conversation;
mod event;
mod persona;
mod responder;
mod theme;

use app::SohbetApp;
use eframe::egui;
use persona::PersonaCatalog;
use responder::{Responder, SpawnedReplyScheduler};
use std::sync::{mpsc, Arc};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Optional persona id as the first argument boots straight into that
    // chat; unknown ids fall back like any other lookup.
    let initial_persona = std::env::args().nth(1);

    let catalog = Arc::new(PersonaCatalog::builtin()?);
    let responder = Arc::new(Responder::new(Arc::clone(&catalog)));
    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sohbet-runtime")
        .build()?;

    let scheduler =
        SpawnedReplyScheduler::new(runtime.handle().clone(), Arc::clone(&responder), tx);
    let app = SohbetApp::new(rx, Box::new(scheduler), responder, catalog, initial_persona);
    let _runtime = runtime;

    info!("sohbet starting");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([375.0, 812.0])
            .with_min_inner_size([320.0, 568.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sohbet",
        native_options,
        Box::new(move |creation_context| {
            app.theme().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )?;

    Ok(())
}
