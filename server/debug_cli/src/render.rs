use std::io::{self, Write};

use crate::models::{BotInfo, CLIConfig, CandidateInfo, TaskInfo, UserInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("ShopBot Debug CLI");
    println!("API: {}", cfg.base_url);
    println!(
        "User: {}  Bot: {}",
        cfg.user_id.clone().unwrap_or_else(|| "-".to_string()),
        cfg.bot_id.clone().unwrap_or_else(|| "-".to_string())
    );
    println!("Type /help for commands; a bare line creates a task.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                      Show commands");
    println!("  /exit | /quit              Exit");
    println!("  /signup <email> [name]     Sign up (or fetch) a user and select it");
    println!("  /bots                      List bots for the selected user");
    println!("  /newbot <name> [retailer]  Create a bot and select it");
    println!("  /use <bot_id>              Select a bot");
    println!("  /tasks                     List tasks for the selected user");
    println!("  /show <task_id>            Show one task with candidates");
    println!("  /approve <task_id> <idx>   Approve a candidate by index");
    println!("  /search <query>            Raw candidate search");
    println!("  /retailers                 List supported retailers");
    println!("  /config                    Show current config");
    println!("  /base <url>                Update base URL");
}

pub fn user(user: &UserInfo) {
    println!(
        "user {} <{}> plan={} {}",
        user.id,
        user.email,
        user.plan,
        user.name.clone().unwrap_or_default()
    );
}

pub fn bots(bots: &[BotInfo]) {
    if bots.is_empty() {
        println!("no bots");
        return;
    }
    for bot in bots {
        println!("{} {} retailers={}", bot.id, bot.name, bot.retailers.join(","));
    }
}

pub fn tasks(tasks: &[TaskInfo]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        println!("[{}] {} - {}", task.status, task.id, task.prompt);
    }
}

pub fn task(task: &TaskInfo) {
    println!("task {} [{}]", task.id, task.status);
    println!("prompt: {}", task.prompt);
    candidates(&task.candidates);
    if let Some(selection) = &task.selection {
        println!("selection: {} (${:.2})", selection.title, selection.price);
    }
    for line in &task.logs {
        println!("log: {}", line);
    }
}

pub fn candidates(items: &[CandidateInfo]) {
    for (idx, item) in items.iter().enumerate() {
        println!(
            "  [{}] {} ${:.2} *{:.1} ({}) {}",
            idx, item.title, item.price, item.rating, item.retailer, item.url
        );
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  user: {}", cfg.user_id.clone().unwrap_or_default());
    println!("  bot: {}", cfg.bot_id.clone().unwrap_or_default());
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
