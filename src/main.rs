use dioxus::prelude::*;
use tracing_subscriber::EnvFilter;
use wellsheet::ui::app::App;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wellsheet=info")),
        )
        .init();

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new().with_window(
                dioxus::desktop::WindowBuilder::new()
                    .with_title("Well Scenarios")
                    .with_inner_size(dioxus::desktop::LogicalSize::new(1400.0, 800.0)),
            ),
        )
        .launch(App);
}
