//! Chat line classification.
//!
//! The router is pure: it reads the emote index and the sender's role
//! and returns exactly one `Route` for every input. Handlers act on the
//! result; nothing here touches room state.

use std::sync::Arc;
use std::time::Duration;

use crate::catalogue::{Emote, EmoteIndex};
use crate::config::Config;
use crate::room::{Role, TeleportSlot};

const MODERATOR_ONLY: &str = "Only moderators can use this command!";
const SUPER_ADMIN_ONLY: &str = "Only super admins can use this command!";
const VIP_MODERATOR_ONLY: &str = "Only moderators can use VIP teleport!";

/// Random-output commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunCommand {
    Rizz { target: Option<String> },
    Roast { target: Option<String> },
    Joke,
    Ship { first: Option<String>, second: String },
    Iq { target: Option<String> },
    LovePercentage { target: Option<String> },
    HatePercentage { target: Option<String> },
    StraightMeter { target: Option<String> },
}

/// A classified, fully parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move the sender to a stored slot.
    Teleport(TeleportSlot),
    /// Play an emote once on the sender.
    PlayEmote { number: usize, emote: Emote },
    /// Moderator plays an emote on another user.
    ModEmoteOnTarget {
        number: usize,
        emote: Emote,
        target: String,
    },
    Help,
    ListEmotes,
    StartLoop { number: usize, emote: Emote },
    StopLoop,
    SetTeleport(TeleportSlot),
    Summon { target: String },
    Goto { target: String },
    Tele { target: String, slot: TeleportSlot },
    Kick { target: String },
    AddModerator { target: String },
    RemoveModerator { target: String },
    ModList,
    /// `None` keeps the broadcast's current interval.
    Repeat {
        message: String,
        interval: Option<Duration>,
    },
    BroadcastOff,
    Fun(FunCommand),
    Spam { message: String, count: u32 },
    /// A known command with unusable arguments.
    Malformed { hint: String },
    /// A known command whose argument names nothing.
    NotFound { what: String },
}

/// Outcome of routing one chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Action(Action),
    NoAction,
    Unauthorized(String),
    UnknownCommand(String),
}

impl Route {
    fn malformed(hint: impl Into<String>) -> Self {
        Route::Action(Action::Malformed { hint: hint.into() })
    }

    fn not_found(what: impl Into<String>) -> Self {
        Route::Action(Action::NotFound { what: what.into() })
    }
}

/// Classifies chat lines into actions.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    prefix: char,
    emotes: Arc<EmoteIndex>,
    min_broadcast_interval: Duration,
    spam_limit: u32,
}

impl CommandRouter {
    pub fn new(config: &Config, emotes: Arc<EmoteIndex>) -> Self {
        Self {
            prefix: config.chat.prefix(),
            emotes,
            min_broadcast_interval: Duration::from_secs(config.broadcast.min_interval_secs),
            spam_limit: config.chat.spam_limit,
        }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Classify one chat line. First match wins:
    /// bare teleport keyword, bare number, `<number> @user`, then prefixed command.
    pub fn route(&self, text: &str, role: Role) -> Route {
        let text = text.trim();

        if let Some(route) = self.route_bare(text, role) {
            return route;
        }

        let Some(body) = text.strip_prefix(self.prefix) else {
            return Route::NoAction;
        };
        // "!" alone, or the prefix followed by whitespace, names nothing.
        if body.is_empty() || body.starts_with(char::is_whitespace) {
            return Route::NoAction;
        }

        let (command, rest) = match body.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (body, ""),
        };
        self.route_command(command, rest, role)
    }

    fn route_bare(&self, text: &str, role: Role) -> Option<Route> {
        if let Some(slot) = TeleportSlot::parse(text) {
            if slot.is_restricted() && !role.is_moderator() {
                return Some(Route::Unauthorized(VIP_MODERATOR_ONLY.to_string()));
            }
            return Some(Route::Action(Action::Teleport(slot)));
        }

        if is_number(text) {
            // Out-of-range numbers are ignored, not reported.
            let route = match self.emote_by_number(text) {
                Some((number, emote)) => Route::Action(Action::PlayEmote { number, emote }),
                None => Route::NoAction,
            };
            return Some(route);
        }

        if role.is_moderator() {
            let mut tokens = text.split_whitespace();
            if let (Some(first), Some(second), None) = (tokens.next(), tokens.next(), tokens.next()) {
                if second.starts_with('@') && is_number(first) {
                    if let (Some((number, emote)), Some(target)) =
                        (self.emote_by_number(first), parse_target(second))
                    {
                        return Some(Route::Action(Action::ModEmoteOnTarget {
                            number,
                            emote,
                            target,
                        }));
                    }
                }
            }
        }

        None
    }

    fn route_command(&self, command: &str, rest: &str, role: Role) -> Route {
        let args: Vec<&str> = rest.split_whitespace().collect();

        match command {
            "help" => Route::Action(Action::Help),
            "emotes" => Route::Action(Action::ListEmotes),
            "loop" => self.route_loop(&args),
            "stop" => Route::Action(Action::StopLoop),

            "setvip" => require(role, Role::Moderator, || {
                Route::Action(Action::SetTeleport(TeleportSlot::Vip))
            }),
            c if c.starts_with("setf") => require(role, Role::Moderator, || {
                match TeleportSlot::parse(&c[3..]) {
                    Some(slot) => Route::Action(Action::SetTeleport(slot)),
                    None => Route::malformed("Use !setf1 to !setf10, or !setvip"),
                }
            }),

            "summon" => require(role, Role::Moderator, || {
                with_target(&args, "Usage: !summon @user", |target| Action::Summon { target })
            }),
            "goto" => require(role, Role::Moderator, || {
                with_target(&args, "Usage: !goto @user", |target| Action::Goto { target })
            }),
            "tele" => require(role, Role::Moderator, || route_tele(&args)),
            "modlist" => require(role, Role::Moderator, || Route::Action(Action::ModList)),
            "repeat" => require(role, Role::Moderator, || self.route_repeat(rest, &args)),
            "off" => require(role, Role::Moderator, || Route::Action(Action::BroadcastOff)),

            "kick" => require(role, Role::SuperAdmin, || {
                with_target(&args, "Usage: !kick @user", |target| Action::Kick { target })
            }),
            "addmod" => require(role, Role::SuperAdmin, || {
                with_target(&args, "Usage: !addmod @user", |target| Action::AddModerator {
                    target,
                })
            }),
            "delmod" => require(role, Role::SuperAdmin, || {
                with_target(&args, "Usage: !delmod @user", |target| {
                    Action::RemoveModerator { target }
                })
            }),

            "rizz" => fun(FunCommand::Rizz {
                target: optional_target(&args),
            }),
            "roast" => fun(FunCommand::Roast {
                target: optional_target(&args),
            }),
            "joke" => fun(FunCommand::Joke),
            "ship" => route_ship(&args),
            "iq" => fun(FunCommand::Iq {
                target: optional_target(&args),
            }),
            "lovepercentage" => fun(FunCommand::LovePercentage {
                target: optional_target(&args),
            }),
            "hatepercentage" => fun(FunCommand::HatePercentage {
                target: optional_target(&args),
            }),
            "straightmeter" => fun(FunCommand::StraightMeter {
                target: optional_target(&args),
            }),
            "spam" => self.route_spam(rest),

            other => match self.emotes.find(other) {
                Some(emote) => {
                    let number = self.emotes.number_of(&emote.name).unwrap_or_default();
                    Route::Action(Action::PlayEmote {
                        number,
                        emote: emote.clone(),
                    })
                }
                None => Route::UnknownCommand(other.to_string()),
            },
        }
    }

    fn route_loop(&self, args: &[&str]) -> Route {
        let Some(&identifier) = args.first() else {
            return Route::malformed("Please specify an emote NUMBER to loop. Example: !loop 1");
        };
        match self.emote_by_number(identifier) {
            Some((number, emote)) => Route::Action(Action::StartLoop { number, emote }),
            None => Route::not_found(format!("Emote number '{}'", identifier)),
        }
    }

    fn route_repeat(&self, rest: &str, args: &[&str]) -> Route {
        const USAGE: &str = "Usage: !repeat [seconds] <message>";

        let (interval, message) = match args {
            [secs, _, ..] if is_number(secs) => {
                let message = rest[secs.len()..].trim();
                match secs.parse::<u64>() {
                    Ok(secs) => (Some(Duration::from_secs(secs)), message),
                    Err(_) => return Route::malformed(USAGE),
                }
            }
            _ => (None, rest),
        };

        if message.is_empty() {
            return Route::malformed(USAGE);
        }
        if let Some(interval) = interval {
            if interval < self.min_broadcast_interval {
                return Route::malformed(format!(
                    "Interval must be at least {} seconds",
                    self.min_broadcast_interval.as_secs()
                ));
            }
        }

        Route::Action(Action::Repeat {
            message: message.to_string(),
            interval,
        })
    }

    fn route_spam(&self, rest: &str) -> Route {
        let Some((message, count)) = rest.rsplit_once(char::is_whitespace) else {
            return Route::malformed("Usage: !spam <message> <count>");
        };
        let message = message.trim();
        if message.is_empty() {
            return Route::malformed("Usage: !spam <message> <count>");
        }
        match count.parse::<u32>() {
            Ok(count) if (1..=self.spam_limit).contains(&count) => Route::Action(Action::Spam {
                message: message.to_string(),
                count,
            }),
            _ => Route::malformed(format!("Count must be between 1 and {}", self.spam_limit)),
        }
    }

    fn emote_by_number(&self, digits: &str) -> Option<(usize, Emote)> {
        let emote = self.emotes.by_number_str(digits)?;
        let number = digits.parse().ok()?;
        Some((number, emote.clone()))
    }
}

fn is_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Strip the leading `@` from a username token.
fn parse_target(token: &str) -> Option<String> {
    let name = token.trim_start_matches('@');
    (!name.is_empty()).then(|| name.to_string())
}

fn optional_target(args: &[&str]) -> Option<String> {
    args.first().and_then(|t| parse_target(t))
}

/// Route to `build` only when `role` is at least `needed`.
fn require(role: Role, needed: Role, build: impl FnOnce() -> Route) -> Route {
    if role >= needed {
        return build();
    }
    let reason = if needed.is_super_admin() {
        SUPER_ADMIN_ONLY
    } else {
        MODERATOR_ONLY
    };
    Route::Unauthorized(reason.to_string())
}

fn with_target(args: &[&str], usage: &str, build: impl FnOnce(String) -> Action) -> Route {
    match optional_target(args) {
        Some(target) => Route::Action(build(target)),
        None => Route::malformed(usage),
    }
}

fn route_tele(args: &[&str]) -> Route {
    const USAGE: &str = "Usage: !tele @user <f1-f10|vip>";
    match args {
        [target, slot, ..] => match (parse_target(target), TeleportSlot::parse(slot)) {
            (Some(target), Some(slot)) => Route::Action(Action::Tele { target, slot }),
            _ => Route::malformed(USAGE),
        },
        _ => Route::malformed(USAGE),
    }
}

fn route_ship(args: &[&str]) -> Route {
    let targets: Vec<String> = args.iter().filter_map(|t| parse_target(t)).collect();
    match targets.as_slice() {
        [second] => fun(FunCommand::Ship {
            first: None,
            second: second.clone(),
        }),
        [first, second, ..] => fun(FunCommand::Ship {
            first: Some(first.clone()),
            second: second.clone(),
        }),
        [] => Route::malformed("Usage: !ship @user1 @user2"),
    }
}

fn fun(command: FunCommand) -> Route {
    Route::Action(Action::Fun(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> CommandRouter {
        let emotes = Arc::new(EmoteIndex::embedded().unwrap());
        CommandRouter::new(&Config::default(), emotes)
    }

    fn action(route: Route) -> Action {
        match route {
            Route::Action(action) => action,
            other => panic!("expected an action, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_number_plays_emote() {
        let router = router();
        match action(router.route("5", Role::Member)) {
            Action::PlayEmote { number, emote } => {
                assert_eq!(number, 5);
                assert_eq!(emote.name, "tired");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_number_is_ignored() {
        let router = router();
        assert_eq!(router.route("999", Role::Member), Route::NoAction);
        assert_eq!(router.route("0", Role::Member), Route::NoAction);
        assert_eq!(router.route("99999999999999999999999", Role::Member), Route::NoAction);
    }

    #[test]
    fn test_teleport_keywords() {
        let router = router();
        assert_eq!(
            router.route("F3", Role::Member),
            Route::Action(Action::Teleport(TeleportSlot::Floor(3)))
        );
        assert_eq!(
            router.route("vip", Role::Moderator),
            Route::Action(Action::Teleport(TeleportSlot::Vip))
        );
        assert!(matches!(router.route("vip", Role::Member), Route::Unauthorized(_)));
        assert_eq!(router.route("f11", Role::Member), Route::NoAction);
    }

    #[test]
    fn test_mod_emote_on_target() {
        let router = router();
        match action(router.route("4 @bob", Role::Moderator)) {
            Action::ModEmoteOnTarget {
                number,
                emote,
                target,
            } => {
                assert_eq!(number, 4);
                assert_eq!(emote.name, "wave");
                assert_eq!(target, "bob");
            }
            other => panic!("unexpected {:?}", other),
        }
        // Members and unknown numbers fall through to "not a command".
        assert_eq!(router.route("4 @bob", Role::Member), Route::NoAction);
        assert_eq!(router.route("999 @bob", Role::Moderator), Route::NoAction);
    }

    #[test]
    fn test_unprefixed_text_is_ignored() {
        let router = router();
        assert_eq!(router.route("hello everyone", Role::Member), Route::NoAction);
        assert_eq!(router.route("", Role::Member), Route::NoAction);
        assert_eq!(router.route("!", Role::Member), Route::NoAction);
        assert_eq!(router.route("! help", Role::Member), Route::NoAction);
    }

    #[test]
    fn test_unknown_command() {
        let router = router();
        assert_eq!(
            router.route("!unknownthing", Role::Member),
            Route::UnknownCommand("unknownthing".to_string())
        );
    }

    #[test]
    fn test_unknown_command_falls_back_to_emote_name() {
        let router = router();
        match action(router.route("!wave", Role::Member)) {
            Action::PlayEmote { number, emote } => {
                assert_eq!(number, 4);
                assert_eq!(emote.id, "emote-wave");
            }
            other => panic!("unexpected {:?}", other),
        }
        match action(router.route("!emote-wave", Role::Member)) {
            Action::PlayEmote { emote, .. } => assert_eq!(emote.name, "wave"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let router = router();
        assert_eq!(
            router.route("!HELP", Role::Member),
            Route::UnknownCommand("HELP".to_string())
        );
        assert_eq!(router.route("!help", Role::Member), Route::Action(Action::Help));
    }

    #[test]
    fn test_loop_arguments() {
        let router = router();
        match action(router.route("!loop 3", Role::Member)) {
            Action::StartLoop { number, emote } => {
                assert_eq!(number, 3);
                assert_eq!(emote.name, "yes");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            action(router.route("!loop", Role::Member)),
            Action::Malformed { .. }
        ));
        assert!(matches!(
            action(router.route("!loop 999", Role::Member)),
            Action::NotFound { .. }
        ));
        assert!(matches!(
            action(router.route("!loop wave", Role::Member)),
            Action::NotFound { .. }
        ));
    }

    #[test]
    fn test_privileged_commands_are_denied() {
        let router = router();
        for text in ["!setf1", "!setvip", "!summon @a", "!goto @a", "!tele @a f1", "!modlist", "!repeat hi", "!off"] {
            assert_eq!(
                router.route(text, Role::Member),
                Route::Unauthorized(MODERATOR_ONLY.to_string()),
                "{}",
                text
            );
        }
        for text in ["!kick @a", "!addmod @a", "!delmod @a"] {
            assert_eq!(
                router.route(text, Role::Moderator),
                Route::Unauthorized(SUPER_ADMIN_ONLY.to_string()),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_denial_precedes_argument_checks() {
        let router = router();
        assert!(matches!(router.route("!summon", Role::Member), Route::Unauthorized(_)));
        assert!(matches!(router.route("!setf99", Role::Member), Route::Unauthorized(_)));
    }

    #[test]
    fn test_set_teleport() {
        let router = router();
        assert_eq!(
            router.route("!setf10", Role::Moderator),
            Route::Action(Action::SetTeleport(TeleportSlot::Floor(10)))
        );
        assert_eq!(
            router.route("!setvip", Role::SuperAdmin),
            Route::Action(Action::SetTeleport(TeleportSlot::Vip))
        );
        assert!(matches!(
            action(router.route("!setf11", Role::Moderator)),
            Action::Malformed { .. }
        ));
    }

    #[test]
    fn test_targets() {
        let router = router();
        assert_eq!(
            router.route("!summon @alice", Role::Moderator),
            Route::Action(Action::Summon {
                target: "alice".to_string()
            })
        );
        assert_eq!(
            router.route("!tele @alice vip", Role::Moderator),
            Route::Action(Action::Tele {
                target: "alice".to_string(),
                slot: TeleportSlot::Vip
            })
        );
        assert!(matches!(
            action(router.route("!tele @alice", Role::Moderator)),
            Action::Malformed { .. }
        ));
        assert_eq!(
            router.route("!addmod bob", Role::SuperAdmin),
            Route::Action(Action::AddModerator {
                target: "bob".to_string()
            })
        );
        assert!(matches!(
            action(router.route("!kick @", Role::SuperAdmin)),
            Action::Malformed { .. }
        ));
    }

    #[test]
    fn test_repeat() {
        let router = router();
        assert_eq!(
            router.route("!repeat 30   Hello   there", Role::Moderator),
            Route::Action(Action::Repeat {
                message: "Hello   there".to_string(),
                interval: Some(Duration::from_secs(30)),
            })
        );
        assert_eq!(
            router.route("!repeat Welcome all", Role::Moderator),
            Route::Action(Action::Repeat {
                message: "Welcome all".to_string(),
                interval: None,
            })
        );
        // A lone number is the message itself.
        assert_eq!(
            router.route("!repeat 42", Role::Moderator),
            Route::Action(Action::Repeat {
                message: "42".to_string(),
                interval: None,
            })
        );
        assert!(matches!(
            action(router.route("!repeat 2 too fast", Role::Moderator)),
            Action::Malformed { .. }
        ));
        assert!(matches!(
            action(router.route("!repeat", Role::Moderator)),
            Action::Malformed { .. }
        ));
    }

    #[test]
    fn test_spam() {
        let router = router();
        assert_eq!(
            router.route("!spam hi there 3", Role::Member),
            Route::Action(Action::Spam {
                message: "hi there".to_string(),
                count: 3
            })
        );
        for text in ["!spam hi 0", "!spam hi 11", "!spam hi lots", "!spam 3", "!spam"] {
            assert!(
                matches!(action(router.route(text, Role::Member)), Action::Malformed { .. }),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_fun_commands() {
        let router = router();
        assert_eq!(
            router.route("!rizz @amy", Role::Member),
            Route::Action(Action::Fun(FunCommand::Rizz {
                target: Some("amy".to_string())
            }))
        );
        assert_eq!(
            router.route("!iq", Role::Member),
            Route::Action(Action::Fun(FunCommand::Iq { target: None }))
        );
        assert_eq!(
            router.route("!ship @a @b", Role::Member),
            Route::Action(Action::Fun(FunCommand::Ship {
                first: Some("a".to_string()),
                second: "b".to_string()
            }))
        );
        assert!(matches!(
            action(router.route("!ship", Role::Member)),
            Action::Malformed { .. }
        ));
    }

    #[test]
    fn test_custom_prefix() {
        let mut config = Config::default();
        config.chat.command_prefix = "?".to_string();
        let router = CommandRouter::new(&config, Arc::new(EmoteIndex::embedded().unwrap()));
        assert_eq!(router.route("?help", Role::Member), Route::Action(Action::Help));
        assert_eq!(router.route("!help", Role::Member), Route::NoAction);
    }
}
