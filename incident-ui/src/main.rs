mod app;
mod bridge;
mod form;
mod logging;

use incident_core::ClientConfig;
use leptos::*;

fn main() {
    if let Err(err) = logging::init() {
        logging::console_error(&format!("incident view logging disabled: {err}"));
    }

    let config = match ClientConfig::from_build_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "cannot start incident view");
            return;
        }
    };
    tracing::info!(base_url = %config.base_url, "mounting incident view");

    mount_to_body(move || view! { <app::App config=config.clone()/> });
}
