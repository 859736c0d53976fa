use tracing_subscriber::EnvFilter;

use crate::env::get_env_bool;

pub fn init() {
    // One confirmation line on success, one diagnostic on failure, unless
    // RUST_LOG asks for something else.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if get_env_bool("LOG_JSON").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    };
}
