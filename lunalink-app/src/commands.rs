//! Interactive command parsing for the terminal client.

use std::path::PathBuf;

use chrono::NaiveDate;
use lunalink_notify::SettingsUpdate;

use crate::actions;
use crate::app::SharedState;

pub const HELP: &str = "\
Commands:
  <text>                         send a chat message
  /hug                           send a virtual hug
  /invite <email>                invite your partner by email
  /email-check                   check email setup and send a test email
  /mood <emoji> <text>           share your mood
  /note <title> | <content>      add a shared note
  /anniversary <YYYY-MM-DD> <title>
  /file <path> [caption]         send an image, video or voice note
  /history [page]                show recent messages
  /media                         list shared media
  /push on|off                   enable or disable push notifications
  /notify on|off                 toggle desktop notifications
  /sounds on|off                 toggle notification sounds
  /away, /back                   mark the window hidden or visible
  /help, /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Hug,
    Invite(String),
    EmailCheck,
    Mood { emoji: String, text: String },
    Note { title: String, content: String },
    Anniversary { date: NaiveDate, title: String },
    File { path: PathBuf, caption: Option<String> },
    History(Option<u32>),
    Media,
    Push(bool),
    Settings(SettingsUpdate),
    Away(bool),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(Command::Say(line.to_string())));
        };

        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };

        let cmd = match name {
            "hug" => Command::Hug,
            "invite" if !args.is_empty() => Command::Invite(args.to_string()),
            "invite" => return Err(CommandError::Usage("/invite <email>")),
            "email-check" => Command::EmailCheck,
            "mood" => {
                let Some((emoji, text)) = args.split_once(char::is_whitespace) else {
                    return Err(CommandError::Usage("/mood <emoji> <text>"));
                };
                Command::Mood {
                    emoji: emoji.to_string(),
                    text: text.trim().to_string(),
                }
            }
            "note" => {
                let (title, content) = args.split_once('|').unwrap_or(("", args));
                if content.trim().is_empty() {
                    return Err(CommandError::Usage("/note <title> | <content>"));
                }
                Command::Note {
                    title: title.trim().to_string(),
                    content: content.trim().to_string(),
                }
            }
            "anniversary" => {
                const USAGE: &str = "/anniversary <YYYY-MM-DD> <title>";
                let (date, title) = args
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage(USAGE))?;
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|_| CommandError::Usage(USAGE))?;
                Command::Anniversary {
                    date,
                    title: title.trim().to_string(),
                }
            }
            "file" => {
                let (path, caption) = match args.split_once(char::is_whitespace) {
                    Some((path, caption)) => (path, Some(caption.trim().to_string())),
                    None => (args, None),
                };
                if path.is_empty() {
                    return Err(CommandError::Usage("/file <path> [caption]"));
                }
                Command::File {
                    path: PathBuf::from(path),
                    caption,
                }
            }
            "history" if args.is_empty() => Command::History(None),
            "history" => Command::History(Some(
                args.parse()
                    .map_err(|_| CommandError::Usage("/history [page]"))?,
            )),
            "media" => Command::Media,
            "push" => Command::Push(on_off(args, "/push on|off")?),
            "notify" => Command::Settings(SettingsUpdate {
                notifications_enabled: Some(on_off(args, "/notify on|off")?),
                ..SettingsUpdate::default()
            }),
            "sounds" => Command::Settings(SettingsUpdate {
                sounds_enabled: Some(on_off(args, "/sounds on|off")?),
                ..SettingsUpdate::default()
            }),
            "away" => Command::Away(true),
            "back" => Command::Away(false),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

fn on_off(arg: &str, usage: &'static str) -> Result<bool, CommandError> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Run one command. Returns `false` when the session should end.
pub async fn execute(state: &SharedState, command: Command) -> bool {
    match command {
        Command::Say(text) => actions::send_message(state, &text).await,
        Command::Hug => actions::send_virtual_hug(state).await,
        Command::Invite(email) => actions::send_invitation(state, &email).await,
        Command::EmailCheck => actions::check_email_config(state).await,
        Command::Mood { emoji, text } => actions::update_mood(state, &emoji, &text).await,
        Command::Note { title, content } => actions::add_note(state, &title, &content, true).await,
        Command::Anniversary { date, title } => {
            actions::add_anniversary(state, date, &title).await
        }
        Command::File { path, caption } => {
            actions::send_file(state, &path, caption.as_deref()).await
        }
        Command::History(page) => actions::show_history(state, page).await,
        Command::Media => actions::show_media(state).await,
        Command::Push(true) => actions::enable_push(state).await,
        Command::Push(false) => actions::disable_push(state).await,
        Command::Settings(update) => actions::update_settings(state, update),
        Command::Away(away) => state.page().set_away(away),
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}
