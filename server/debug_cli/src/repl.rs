use std::io;

use crate::client::HTTPClient;
use crate::models::{CLIConfig, CreateTaskRequest, NewBotRequest};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self { config, client }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            if io::stdin().read_line(&mut line).is_err() {
                break;
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.create_task(&line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "signup" => {
                let mut words = rest.split_whitespace();
                match words.next() {
                    Some(email) => {
                        let name = words.next().map(|s| s.to_string());
                        match self.client.signup(email, name) {
                            Ok(user) => {
                                self.config.user_id = Some(user.id.clone());
                                render::user(&user);
                            }
                            Err(err) => render::error(&err),
                        }
                    }
                    None => render::error("usage: /signup <email> [name]"),
                }
            }
            "bots" => match self.require_user() {
                Some(user_id) => match self.client.list_bots(&user_id) {
                    Ok(bots) => render::bots(&bots),
                    Err(err) => render::error(&err),
                },
                None => {}
            },
            "newbot" => {
                let user_id = match self.require_user() {
                    Some(user_id) => user_id,
                    None => return false,
                };
                let mut words = rest.split_whitespace();
                let name = match words.next() {
                    Some(name) => name.to_string(),
                    None => {
                        render::error("usage: /newbot <name> [retailer]");
                        return false;
                    }
                };
                let retailers: Vec<String> = words.map(|s| s.to_string()).collect();
                match self.client.create_bot(&NewBotRequest {
                    user_id,
                    name,
                    retailers,
                }) {
                    Ok(bot) => {
                        self.config.bot_id = Some(bot.id.clone());
                        render::bots(std::slice::from_ref(&bot));
                    }
                    Err(err) => render::error(&err),
                }
            }
            "use" => {
                if rest.is_empty() {
                    render::info(&format!("bot: {:?}", self.config.bot_id));
                } else {
                    self.config.bot_id = Some(rest.to_string());
                    render::info("bot selected");
                }
            }
            "tasks" => {
                if let Some(user_id) = self.require_user() {
                    match self.client.list_tasks(&user_id, self.config.bot_id.as_deref()) {
                        Ok(tasks) => render::tasks(&tasks),
                        Err(err) => render::error(&err),
                    }
                }
            }
            "show" => {
                if rest.is_empty() {
                    render::error("usage: /show <task_id>");
                } else if let Some(user_id) = self.require_user() {
                    match self.client.list_tasks(&user_id, None) {
                        Ok(tasks) => match tasks.iter().find(|t| t.id == rest) {
                            Some(task) => render::task(task),
                            None => render::error("task not found in page"),
                        },
                        Err(err) => render::error(&err),
                    }
                }
            }
            "approve" => {
                let mut words = rest.split_whitespace();
                let task_id = words.next();
                let index = words.next().and_then(|raw| raw.parse::<i64>().ok());
                match (task_id, index) {
                    (Some(task_id), Some(index)) => match self.client.approve(task_id, index) {
                        Ok(task) => render::task(&task),
                        Err(err) => render::error(&err),
                    },
                    _ => render::error("usage: /approve <task_id> <index>"),
                }
            }
            "search" => {
                if rest.is_empty() {
                    render::error("usage: /search <query>");
                } else {
                    match self.client.search(rest, None) {
                        Ok(resp) => render::candidates(&resp.results),
                        Err(err) => render::error(&err),
                    }
                }
            }
            "retailers" => match self.client.retailers() {
                Ok(value) => render::info(&value.to_string()),
                Err(err) => render::error(&err),
            },
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    self.config.base_url = rest.to_string();
                    self.client = HTTPClient::new(&self.config.base_url);
                    render::info("base url updated");
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn create_task(&mut self, prompt: &str) {
        let user_id = match self.require_user() {
            Some(user_id) => user_id,
            None => return,
        };
        let bot_id = match &self.config.bot_id {
            Some(bot_id) => bot_id.clone(),
            None => {
                render::error("no bot selected, use /newbot or /use");
                return;
            }
        };
        match self.client.create_task(&CreateTaskRequest {
            user_id,
            bot_id,
            prompt: prompt.to_string(),
        }) {
            Ok(task) => render::task(&task),
            Err(err) => render::error(&err),
        }
    }

    fn require_user(&self) -> Option<String> {
        match &self.config.user_id {
            Some(user_id) => Some(user_id.clone()),
            None => {
                render::error("no user selected, use /signup first");
                None
            }
        }
    }
}
