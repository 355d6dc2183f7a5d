pub mod analysis;
pub mod commands;
pub mod models;

#[cfg(feature = "desktop")]
use commands::{
    accounts::{close_modal, get_account_overview, list_accounts, open_modal, select_account},
    contact::launch_contact,
    issues::{
        get_facets, get_issue_detail, get_statistics, list_categories, list_issues, reset_facets,
        update_facets,
    },
    settings::{get_settings, save_settings},
    workflow::{
        add_analysis, record_issue_opportunity, save_manual_categorization, take_resolution_action,
        validate_issue_analysis,
    },
};

#[cfg(feature = "desktop")]
fn setup_state(app: &tauri::App) -> Result<models::dashboard::SharedState, String> {
    use std::sync::{Arc, Mutex};
    use tauri::Manager;

    let state = Arc::new(Mutex::new(commands::seed::initial_state(chrono::Utc::now())?));

    let config_dir = app
        .path()
        .app_config_dir()
        .map_err(|e| format!("Could not resolve config directory: {e}"))?;
    match commands::settings::load_effective_settings(&config_dir.to_string_lossy()) {
        Ok(settings) => commands::settings::apply_settings(&state, &settings)?,
        Err(e) => log::warn!("starting with default settings: {e}"),
    }

    Ok(state)
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::Manager;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let state = setup_state(app)?;
            app.manage(state);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            list_accounts,
            select_account,
            get_account_overview,
            open_modal,
            close_modal,
            list_issues,
            get_statistics,
            get_facets,
            update_facets,
            reset_facets,
            get_issue_detail,
            list_categories,
            save_manual_categorization,
            add_analysis,
            validate_issue_analysis,
            take_resolution_action,
            record_issue_opportunity,
            launch_contact,
            get_settings,
            save_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
