//! The fixed list of client commands and what their arguments look like.

/// Marks a line as a command rather than chat text.
pub const COMMAND_PREFIX: char = '/';
/// Marks a token as a channel rather than a nickname.
pub const CHANNEL_PREFIX: char = '#';
/// Index of the "no command" entry, also the fallback after ambiguous matches.
pub const SENTINEL: usize = 0;

/// What a parameter slot holds, which also decides how it is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Nick,
    Channel,
    NickOrChannel,
    /// Opaque text, usually the rest of the line.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub label: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
}

impl Param {
    const fn required(label: &'static str, kind: ParamKind) -> Self {
        Self { label, kind, optional: false }
    }

    const fn optional(label: &'static str, kind: ParamKind) -> Self {
        Self { label, kind, optional: true }
    }

    /// `<label>`, lowercased. Optional slots render the same way.
    pub fn placeholder(&self) -> String {
        format!("<{}>", self.label.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    None,
    Away,
    Help,
    TlsConnect,
    Connect,
    Quit,
    Query,
    Join,
    Part,
    Whois,
    Me,
    Msg,
    Nick,
    Names,
    Status,
}

const NO_PARAMS: &[Param] = &[];
const AWAY_PARAMS: &[Param] = &[Param::optional("text", ParamKind::Text)];
const CONNECT_PARAMS: &[Param] = &[
    Param::required("server", ParamKind::Text),
    Param::required("nick", ParamKind::Text),
    Param::optional("pass", ParamKind::Text),
];
const QUIT_PARAMS: &[Param] = &[Param::optional("message", ParamKind::Text)];
const QUERY_PARAMS: &[Param] = &[Param::required("target", ParamKind::NickOrChannel)];
const CHANNEL_PARAMS: &[Param] = &[Param::required("channel", ParamKind::Channel)];
const NICK_PARAMS: &[Param] = &[Param::required("nick", ParamKind::Nick)];
// A new nickname, so nobody else's name is offered for it.
const NEW_NICK_PARAMS: &[Param] = &[Param::required("newnick", ParamKind::Text)];
const ME_PARAMS: &[Param] = &[Param::required("action", ParamKind::Text)];
const MSG_PARAMS: &[Param] = &[
    Param::required("target", ParamKind::NickOrChannel),
    Param::required("message", ParamKind::Text),
];

impl CommandKind {
    /// Declared parameter slots, in order.
    pub fn params(self) -> &'static [Param] {
        match self {
            CommandKind::None | CommandKind::Help | CommandKind::Names | CommandKind::Status => {
                NO_PARAMS
            }
            CommandKind::Away => AWAY_PARAMS,
            CommandKind::TlsConnect | CommandKind::Connect => CONNECT_PARAMS,
            CommandKind::Quit => QUIT_PARAMS,
            CommandKind::Query => QUERY_PARAMS,
            CommandKind::Join | CommandKind::Part => CHANNEL_PARAMS,
            CommandKind::Whois => NICK_PARAMS,
            CommandKind::Nick => NEW_NICK_PARAMS,
            CommandKind::Me => ME_PARAMS,
            CommandKind::Msg => MSG_PARAMS,
        }
    }

    /// Kind of the first argument, which is the only one the completer looks at.
    pub fn first_param_kind(self) -> Option<ParamKind> {
        self.params().first().map(|p| p.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub kind: CommandKind,
    pub help: &'static str,
}

const fn cmd(name: &'static str, kind: CommandKind, help: &'static str) -> CommandDescriptor {
    CommandDescriptor { name, kind, help }
}

pub static COMMANDS: &[CommandDescriptor] = &[
    cmd("", CommandKind::None, "No command given."),
    cmd("/away", CommandKind::Away, "Toggle presence."),
    cmd("/help", CommandKind::Help, "Give this help"),
    cmd("/tlsconnect", CommandKind::TlsConnect, "Connect to IRC server using TLS."),
    cmd("/connect", CommandKind::Connect, "Connect to IRC server."),
    cmd("/quit", CommandKind::Quit, "Quit the IRC client."),
    cmd("/query", CommandKind::Query, "Start talking to a nick or channel."),
    cmd("/x", CommandKind::Query, "Shorthand for /query."),
    cmd("/join", CommandKind::Join, "Join a channel."),
    cmd("/part", CommandKind::Part, "Leave a channel."),
    cmd("/whois", CommandKind::Whois, "Show information about someone."),
    cmd("/me", CommandKind::Me, "Show a string describing you doing something."),
    cmd("/msg", CommandKind::Msg, "Send a message to a specific target."),
    cmd("/nick", CommandKind::Nick, "Change your nickname."),
    cmd("/names", CommandKind::Names, "List members on current channel."),
    cmd("/status", CommandKind::Status, "Toggle status join, quit messages."),
];

/// Exact, case-sensitive lookup.
pub fn lookup(name: &str) -> Option<&'static CommandDescriptor> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Entry at `index`, falling back to the sentinel for out-of-range indices.
pub fn get(index: usize) -> &'static CommandDescriptor {
    COMMANDS.get(index).unwrap_or(&COMMANDS[SENTINEL])
}

/// Every command whose name starts with `prefix`, ignoring case, in registry order.
pub fn prefix_matches(prefix: &str) -> Vec<(usize, &'static CommandDescriptor)> {
    let lower = prefix.to_lowercase();
    COMMANDS
        .iter()
        .enumerate()
        .filter(|(_, c)| c.name.starts_with(&lower))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHelp {
    pub name: &'static str,
    pub placeholders: Vec<String>,
    pub help: &'static str,
}

impl CommandHelp {
    pub fn render(&self) -> String {
        let mut out = self.name.to_string();
        for p in &self.placeholders {
            out.push(' ');
            out.push_str(p);
        }
        out.push_str(" - ");
        out.push_str(self.help);
        out
    }
}

pub fn describe_all() -> Vec<CommandHelp> {
    COMMANDS
        .iter()
        .map(|c| CommandHelp {
            name: c.name,
            placeholders: c.kind.params().iter().map(Param::placeholder).collect(),
            help: c.help,
        })
        .collect()
}
