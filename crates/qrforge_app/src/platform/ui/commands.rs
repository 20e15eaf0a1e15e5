use qrforge_core::{ContactField, ErrorCorrection, InputKind, Msg, RenderConfig, Rgb};

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Msg),
    Config(ConfigEdit),
    Show,
    Help,
    /// Hold later commands until the render in flight settles.
    Wait,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEdit {
    Foreground(Rgb),
    Background(Rgb),
    Size(u32),
    Level(ErrorCorrection),
}

impl ConfigEdit {
    pub fn apply(self, mut config: RenderConfig) -> RenderConfig {
        match self {
            ConfigEdit::Foreground(color) => config.foreground = color,
            ConfigEdit::Background(color) => config.background = color,
            ConfigEdit::Size(size) => config.size = size,
            ConfigEdit::Level(level) => config.error_correction = level,
        }
        config.clamped()
    }
}

pub const HELP: &str = "\
commands:
  kind url|text|contact    switch input kind
  url <address>            set the URL input
  text <text>              set the text input (\\n for a newline)
  first|last|phone|email|org|site <value>
                           set a contact field
  fg <color>  bg <color>   set colors (#rrggbb, #rgb, black, white)
  size <px>                set the image size
  level L|M|Q|H            set error correction
  download                 save the current image
  copy                     copy the payload to the clipboard
  reset                    clear all inputs
  wait                     wait for the render in flight
  show                     print the current state
  help                     print this help
  quit                     exit";

/// Parses one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };
    let arg = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "kind" => Command::Send(Msg::KindSelected(
            arg.parse::<InputKind>().map_err(|err| err.to_string())?,
        )),
        "url" => Command::Send(Msg::UrlChanged(rest.to_string())),
        "text" => Command::Send(Msg::TextChanged(rest.replace("\\n", "\n"))),
        "first" => contact(ContactField::FirstName, rest),
        "last" => contact(ContactField::LastName, rest),
        "phone" => contact(ContactField::Phone, rest),
        "email" => contact(ContactField::Email, rest),
        "org" => contact(ContactField::Organization, rest),
        "site" => contact(ContactField::Url, rest),
        "fg" => Command::Config(ConfigEdit::Foreground(
            arg.parse::<Rgb>().map_err(|err| err.to_string())?,
        )),
        "bg" => Command::Config(ConfigEdit::Background(
            arg.parse::<Rgb>().map_err(|err| err.to_string())?,
        )),
        "size" => Command::Config(ConfigEdit::Size(
            arg.parse::<u32>()
                .map_err(|_| format!("size must be a whole number of pixels, got {arg:?}"))?,
        )),
        "level" => Command::Config(ConfigEdit::Level(
            arg.parse::<ErrorCorrection>().map_err(|err| err.to_string())?,
        )),
        "download" => Command::Send(Msg::DownloadClicked),
        "copy" => Command::Send(Msg::CopyClicked),
        "reset" => Command::Send(Msg::ResetClicked),
        "wait" => Command::Wait,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}; type help")),
    };
    Ok(Some(command))
}

fn contact(field: ContactField, value: &str) -> Command {
    Command::Send(Msg::ContactChanged {
        field,
        value: value.to_string(),
    })
}
