use log::info;
use softsy_frontend::config;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(e) = console_log::init_with_level(config::log_level()) {
        gloo_console::warn!(format!("error initializing log: {}", e));
    }

    info!("Starting Softsy site enhancements");
    if let Err(e) = softsy_frontend::boot() {
        log::error!("Boot failed: {}", e);
    }
}
