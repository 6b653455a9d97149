pub const APP_NAME: &str = "rdnsmap";
pub const CLI_HEADER_MSG: &str = "rdns - Batch reverse DNS lookups";

// Config
pub const CONFIG_FILE: &str = "rdns.toml";
pub const CURRENT_DIR: &str = ".";
pub const LOG_ENV_VAR: &str = "RDNS_LOG";

// Lookups
pub const LOOKUP_TIMEOUT: u64 = 3000;
pub const LOOKUP_PARALLELISM: usize = 0;
pub const RANDOM_IP_COUNT: usize = 50;

// Logging
pub const LOGFILE_NAME: &str = "rdns.log";
pub const LOGGING_JSON: bool = false;
pub const LOGGING_QUIET: bool = false;
