mod annotations;
mod app;
mod app_dir;
mod app_state;
mod file_store;
mod input;
mod navigation;
mod preferences;
mod tile_bridge;
mod ui;

fn main() -> eframe::Result {
    app::run()
}
