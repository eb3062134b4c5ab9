//! fusion-tui - A terminal front end for an image-fusion service
//!
//! Pick a character image and a reference image, optionally describe the
//! scene, and send both to the service. It uses the Component Architecture
//! pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod render;
mod services;
mod tui;
mod workflow;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::HttpProcessingClient;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn main() -> Result<()> {
    let config = Config::resolve();
    let log_path = logging::init(&config);
    info!(
        api_base_url = %config.api_base_url,
        log_file = ?log_path,
        "starting fusion-tui"
    );

    let client = HttpProcessingClient::new(&config.api_base_url)
        .context("failed to create processing client")?;
    info!(endpoint = %client.endpoint(), "processing client ready");

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(config, Arc::new(client));
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        error!(error = ?err, "application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            let area = frame.area();
            if let Err(e) = app.draw(frame, area) {
                error!(error = %e, "draw error");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick to collect a settled submission
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
