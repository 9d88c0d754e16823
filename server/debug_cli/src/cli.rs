use std::env;

use crate::models::CLIConfig;

const DEFAULT_URL: &str = "http://localhost:8000";

pub fn parse_config() -> CLIConfig {
    let mut cfg = CLIConfig {
        base_url: env_or("SHOPBOT_URL", DEFAULT_URL.to_string()),
        user_id: env_opt("SHOPBOT_USER"),
        bot_id: env_opt("SHOPBOT_BOT"),
    };

    let args: Vec<String> = env::args().collect();
    let mut idx = 1;
    while idx < args.len() {
        match args[idx].as_str() {
            "--base" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.base_url = value.clone();
                    idx += 1;
                }
            }
            "--user" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.user_id = Some(value.clone());
                    idx += 1;
                }
            }
            "--bot" => {
                if let Some(value) = args.get(idx + 1) {
                    cfg.bot_id = Some(value.clone());
                    idx += 1;
                }
            }
            _ => {}
        }
        idx += 1;
    }

    cfg
}

fn env_or(key: &str, fallback: String) -> String {
    env::var(key).unwrap_or(fallback)
}

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}
