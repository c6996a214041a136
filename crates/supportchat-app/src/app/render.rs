use chrono::Local;
use colored::Colorize;
use supportchat_core::{Message, Role};

/// One transcript entry, with its id when `show_ids` is set
pub fn render_message(message: &Message, show_ids: bool) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let author = match message.role {
        Role::User => "You".bright_blue().bold(),
        Role::Assistant => "Support".bright_green().bold(),
    };

    let mut out = format!("{} {} {}", format!("[{}]", time).bright_black(), author, message.content);
    if show_ids {
        out.push_str(&format!(" {}", format!("({})", message.id).bright_black()));
    }

    if let Some(sources) = &message.sources {
        for source in sources {
            out.push_str(&format!(
                "\n    {} {} {} {}",
                "↳".bright_black(),
                source.title.cyan(),
                format!("{}% match", source.match_percent()).bright_black(),
                source.url.underline()
            ));
            if let Some(excerpt) = &source.excerpt {
                out.push_str(&format!("\n      {}", excerpt.bright_black()));
            }
        }
    }

    out
}
