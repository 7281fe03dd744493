use crate::domain::{FeatgenCommand, PostCommand, PostUpdate, SettingsCommand};
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// -v / --verbose: ログレコードを stderr にも出す
    pub verbose: bool,
    pub command: FeatgenCommand,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            command: FeatgenCommand::Help,
        }
    }
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn post_arg() -> clap::Arg {
    clap::Arg::new("post")
        .long("post")
        .value_name("id")
        .help("Post (content item) id")
        .num_args(1)
}

fn nonce_arg() -> clap::Arg {
    clap::Arg::new("nonce")
        .long("nonce")
        .value_name("token")
        .help("Security token from `featgen nonce <action>`")
        .num_args(1)
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("featgen")
        .about("Generate an AI image from a post and stage it as the post's featured image")
        .disable_help_flag(true)
        .disable_help_subcommand(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Mirror log records to stderr (for troubleshooting)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("completion")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
        .subcommand(
            clap::Command::new("nonce")
                .about("Issue a security token for an action")
                .arg(
                    clap::Arg::new("action")
                        .index(1)
                        .value_name("action")
                        .help("generate | assign")
                        .num_args(1),
                ),
        )
        .subcommand(
            clap::Command::new("generate")
                .about("Generate an image from the post's title and content and stage it")
                .arg(post_arg())
                .arg(nonce_arg())
                .arg(
                    clap::Arg::new("preview-out")
                        .long("preview-out")
                        .value_name("path")
                        .help("Also write the generated image bytes to this file")
                        .value_parser(value_parser!(PathBuf))
                        .num_args(1),
                ),
        )
        .subcommand(
            clap::Command::new("assign")
                .about("Set an existing asset as the post's featured image")
                .arg(post_arg())
                .arg(
                    clap::Arg::new("asset")
                        .long("asset")
                        .value_name("id")
                        .help("Asset (attachment) id")
                        .num_args(1),
                )
                .arg(nonce_arg()),
        )
        .subcommand(
            clap::Command::new("save")
                .about("Save a post (optionally updating it) and run the save hook")
                .arg(post_arg())
                .arg(clap::Arg::new("title").long("title").num_args(1))
                .arg(clap::Arg::new("content").long("content").num_args(1))
                .arg(
                    clap::Arg::new("autosave")
                        .long("autosave")
                        .help("Treat this save as an automatic background save")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    clap::Arg::new("revision")
                        .long("revision")
                        .help("Treat this save as a revision")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            clap::Command::new("post")
                .about("Create or show posts")
                .subcommand(
                    clap::Command::new("new")
                        .arg(clap::Arg::new("title").long("title").num_args(1))
                        .arg(clap::Arg::new("content").long("content").num_args(1))
                        .arg(
                            clap::Arg::new("type")
                                .long("type")
                                .default_value("post")
                                .num_args(1),
                        )
                        .arg(
                            clap::Arg::new("status")
                                .long("status")
                                .default_value("draft")
                                .num_args(1),
                        ),
                )
                .subcommand(clap::Command::new("show").arg(post_arg())),
        )
        .subcommand(
            clap::Command::new("settings")
                .about("Show or change settings (API key, model, size, ...)")
                .subcommand(clap::Command::new("show"))
                .subcommand(
                    clap::Command::new("set-key")
                        .arg(clap::Arg::new("key").index(1).num_args(1)),
                )
                .subcommand(clap::Command::new("clear-key"))
                .subcommand(
                    clap::Command::new("set")
                        .arg(clap::Arg::new("name").index(1).num_args(1))
                        .arg(clap::Arg::new("value").index(2).num_args(1)),
                ),
        )
}

fn string_arg(matches: &clap::ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn matches_to_config(matches: &clap::ArgMatches) -> Result<Config, Error> {
    let verbose = matches.get_flag("verbose");
    let help = matches.get_flag("help");
    let command = if help {
        FeatgenCommand::Help
    } else {
        matches_to_command(matches)?
    };
    Ok(Config { verbose, command })
}

fn matches_to_command(matches: &clap::ArgMatches) -> Result<FeatgenCommand, Error> {
    let command = match matches.subcommand() {
        None => FeatgenCommand::Help,
        Some(("nonce", m)) => FeatgenCommand::Nonce {
            action: string_arg(m, "action"),
        },
        Some(("generate", m)) => FeatgenCommand::Generate {
            post: string_arg(m, "post"),
            nonce: string_arg(m, "nonce"),
            preview_out: m.get_one::<PathBuf>("preview-out").cloned(),
        },
        Some(("assign", m)) => FeatgenCommand::Assign {
            post: string_arg(m, "post"),
            asset: string_arg(m, "asset"),
            nonce: string_arg(m, "nonce"),
        },
        Some(("save", m)) => FeatgenCommand::Save {
            post: string_arg(m, "post"),
            update: PostUpdate {
                title: m.get_one::<String>("title").cloned(),
                content: m.get_one::<String>("content").cloned(),
            },
            autosave: m.get_flag("autosave"),
            revision: m.get_flag("revision"),
        },
        Some(("post", m)) => match m.subcommand() {
            Some(("new", n)) => FeatgenCommand::Post(PostCommand::New {
                title: string_arg(n, "title"),
                content: string_arg(n, "content"),
                post_type: string_arg(n, "type"),
                status: string_arg(n, "status"),
            }),
            Some(("show", s)) => FeatgenCommand::Post(PostCommand::Show {
                post: string_arg(s, "post"),
            }),
            _ => return Err(Error::invalid_argument("post: expected `new` or `show`")),
        },
        Some(("settings", m)) => match m.subcommand() {
            None | Some(("show", _)) => FeatgenCommand::Settings(SettingsCommand::Show),
            Some(("set-key", k)) => {
                FeatgenCommand::Settings(SettingsCommand::SetKey(string_arg(k, "key")))
            }
            Some(("clear-key", _)) => FeatgenCommand::Settings(SettingsCommand::ClearKey),
            Some(("set", s)) => {
                let name = string_arg(s, "name");
                if name.is_empty() {
                    return Err(Error::invalid_argument("settings set: <name> <value> required"));
                }
                FeatgenCommand::Settings(SettingsCommand::Set {
                    name,
                    value: string_arg(s, "value"),
                })
            }
            Some((other, _)) => {
                return Err(Error::invalid_argument(format!(
                    "settings: unknown subcommand '{}'",
                    other
                )))
            }
        },
        Some((other, _)) => {
            return Err(Error::invalid_argument(format!(
                "unknown subcommand '{}'",
                other
            )))
        }
    };
    Ok(command)
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("completion") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)?))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[&str]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    matches_to_config(&matches)
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "featgen", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.verbose);
        assert_eq!(config.command, FeatgenCommand::Help);
    }

    #[test]
    fn test_no_args_is_help() {
        let config = parse_args_from(&["featgen"]).unwrap();
        assert_eq!(config.command, FeatgenCommand::Help);
    }

    #[test]
    fn test_generate_args() {
        let config = parse_args_from(&[
            "featgen",
            "-v",
            "generate",
            "--post",
            "42",
            "--nonce",
            "abc",
            "--preview-out",
            "/tmp/p.png",
        ])
        .unwrap();
        assert!(config.verbose);
        assert_eq!(
            config.command,
            FeatgenCommand::Generate {
                post: "42".to_string(),
                nonce: "abc".to_string(),
                preview_out: Some(PathBuf::from("/tmp/p.png")),
            }
        );
    }

    #[test]
    fn test_generate_without_ids_defers_validation() {
        let config = parse_args_from(&["featgen", "generate"]).unwrap();
        assert_eq!(
            config.command,
            FeatgenCommand::Generate {
                post: String::new(),
                nonce: String::new(),
                preview_out: None,
            }
        );
    }

    #[test]
    fn test_save_flags() {
        let config =
            parse_args_from(&["featgen", "save", "--post", "3", "--autosave", "--title", "T"])
                .unwrap();
        assert_eq!(
            config.command,
            FeatgenCommand::Save {
                post: "3".to_string(),
                update: PostUpdate {
                    title: Some("T".to_string()),
                    content: None,
                },
                autosave: true,
                revision: false,
            }
        );
    }

    #[test]
    fn test_post_new_defaults() {
        let config = parse_args_from(&["featgen", "post", "new", "--title", "Sunset"]).unwrap();
        assert_eq!(
            config.command,
            FeatgenCommand::Post(PostCommand::New {
                title: "Sunset".to_string(),
                content: String::new(),
                post_type: "post".to_string(),
                status: "draft".to_string(),
            })
        );
    }

    #[test]
    fn test_settings_subcommands() {
        assert_eq!(
            parse_args_from(&["featgen", "settings"]).unwrap().command,
            FeatgenCommand::Settings(SettingsCommand::Show)
        );
        assert_eq!(
            parse_args_from(&["featgen", "settings", "set-key", "k"]).unwrap().command,
            FeatgenCommand::Settings(SettingsCommand::SetKey("k".to_string()))
        );
        assert_eq!(
            parse_args_from(&["featgen", "settings", "set", "width", "512"])
                .unwrap()
                .command,
            FeatgenCommand::Settings(SettingsCommand::Set {
                name: "width".to_string(),
                value: "512".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_flag_is_usage_error() {
        let err = parse_args_from(&["featgen", "--bogus"]).unwrap_err();
        assert!(err.is_usage());
    }
}
