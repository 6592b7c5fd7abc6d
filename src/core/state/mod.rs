pub mod app_state;
pub mod settings;

pub use app_state::AppState;
pub use settings::{load_settings, settings_path, ManagerSettings};
