use std::path::PathBuf;

/// XDG app name used for all default paths.
pub const APP_NAME: &str = "mnemo";

/// Resolve the state directory (memory document, transcripts, run logs).
pub fn state_dir() -> PathBuf {
    if let Some(project_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
        return project_dirs
            .state_dir()
            .unwrap_or_else(|| project_dirs.data_local_dir())
            .to_path_buf();
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        return base_dirs
            .home_dir()
            .join(".local")
            .join("state")
            .join(APP_NAME);
    }

    std::env::temp_dir().join(format!("{APP_NAME}-state"))
}

/// Resolve the config directory (config.toml, prompts.toml).
pub fn config_dir() -> PathBuf {
    if let Some(project_dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
        return project_dirs.config_dir().to_path_buf();
    }

    if let Some(base_dirs) = directories::BaseDirs::new() {
        return base_dirs.home_dir().join(".config").join(APP_NAME);
    }

    std::env::temp_dir().join(format!("{APP_NAME}-config"))
}

pub fn default_config_file() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_prompts_file() -> PathBuf {
    config_dir().join("prompts.toml")
}

pub fn default_memory_file() -> PathBuf {
    state_dir().join("memory.txt")
}

/// Directory scanned for `*.log` chat transcripts.
pub fn default_logs_dir() -> PathBuf {
    state_dir().join("logs")
}
