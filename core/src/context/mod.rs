mod app_config;

pub use app_config::{
    APP_NAME, AppConfig, DEFAULT_SEGMENT_COUNT, DEFAULT_TICK_INTERVAL_MS, default_log_dir,
};
