use colored::Colorize;
use userdir::api::{CmdMessage, MessageLevel};
use userdir::config::{DirectoryConfig, CONFIG_KEYS};
use userdir::model::User;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 14;
const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 28;
const COMPANY_WIDTH: usize = 20;
const PHONE_WIDTH: usize = 22;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    let header = format!(
        "{}{}{}{}{}",
        pad("ID", ID_WIDTH),
        pad("NAME", NAME_WIDTH),
        pad("EMAIL", EMAIL_WIDTH),
        pad("COMPANY", COMPANY_WIDTH),
        "PHONE"
    );
    println!("{}", header.bold());

    for user in users {
        println!(
            "{}{}{}{}{}",
            pad(&user.id.to_string(), ID_WIDTH).yellow(),
            pad(&user.name, NAME_WIDTH),
            pad(&user.email, EMAIL_WIDTH),
            pad(&user.company.name, COMPANY_WIDTH).dimmed(),
            truncate_to_width(&user.phone, PHONE_WIDTH).dimmed()
        );
    }
}

pub fn print_user_details(user: &User) {
    println!("{} {}", user.id.to_string().yellow(), user.name.bold());
    if !user.username.is_empty() {
        println!("@{}", user.username.dimmed());
    }
    println!("--------------------------------");
    field("Email", &user.email);
    field("Phone", &user.phone);
    field("Website", &user.website);
    field("Company", &user.company.name);

    let address: Vec<&str> = [
        user.address.street.as_str(),
        user.address.city.as_str(),
        user.address.zipcode.as_str(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect();
    field("Address", &address.join(", "));
}

pub fn print_config(config: &DirectoryConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn field(label: &str, value: &str) {
    if value.is_empty() {
        println!("{:<9}{}", label, "-".dimmed());
    } else {
        println!("{:<9}{}", label, value);
    }
}

/// Truncate to fit, then pad with spaces to exactly `width` columns.
fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width.saturating_sub(1));
    let fill = width.saturating_sub(cell.width());
    format!("{}{}", cell, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
