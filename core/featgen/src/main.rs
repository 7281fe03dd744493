mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::process;

use cli::{parse_args, print_completion, ParseOutcome};
use common::error::Error;
use common::ports::outbound::LogRecord;
use domain::{Envelope, FeatgenCommand, NewPost, Nonce, NonceAction, PostCommand};
use ports::inbound::UseCaseRunner;
use serde_json::{json, Value};
use wiring::{wire_featgen, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl UseCaseRunner for Runner {
    fn run(&self, command: FeatgenCommand) -> Result<i32, Error> {
        let command_name = cmd_name_for_log(&command);
        let _ = self.app.logger.log(
            &LogRecord::info("command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = self.dispatch(command);

        let code = match &result {
            Ok(code) => *code,
            Err(e) => e.exit_code(),
        };
        let _ = self.app.logger.log(
            &LogRecord::info("command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self
                .app
                .logger
                .log(&LogRecord::error(e.to_string()).layer("cli").kind("error"));
        }
        result
    }
}

impl Runner {
    fn dispatch(&self, command: FeatgenCommand) -> Result<i32, Error> {
        match command {
            FeatgenCommand::Help => {
                print_help();
                Ok(0)
            }
            FeatgenCommand::Nonce { action } => {
                let action = NonceAction::parse(&action).ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "unknown nonce action '{}': expected generate or assign",
                        action
                    ))
                })?;
                let token = self.app.nonces.issue(action)?;
                println!("{}", token);
                Ok(0)
            }
            FeatgenCommand::Generate {
                post,
                nonce,
                preview_out,
            } => respond(self.generate(&post, &Nonce::new(nonce), preview_out.as_deref())),
            FeatgenCommand::Assign { post, asset, nonce } => respond(
                self.app
                    .assign
                    .handle(&post, &asset, &Nonce::new(nonce))
                    .map(|(post, asset)| json!({ "post_id": post.get(), "asset_id": asset.get() })),
            ),
            FeatgenCommand::Save {
                post,
                update,
                autosave,
                revision,
            } => respond(
                self.app
                    .posts
                    .save(&post, &update, autosave, revision)
                    .and_then(|(post, outcome)| {
                        Ok(json!({ "post": to_value(&post)?, "hook": outcome.as_str() }))
                    }),
            ),
            FeatgenCommand::Post(PostCommand::New {
                title,
                content,
                post_type,
                status,
            }) => respond(
                self.app
                    .posts
                    .create(NewPost {
                        post_type,
                        title,
                        content,
                        status,
                    })
                    .and_then(|post| to_value(&post)),
            ),
            FeatgenCommand::Post(PostCommand::Show { post }) => respond(self.show_post(&post)),
            FeatgenCommand::Settings(cmd) => respond(self.app.settings.run(&cmd)),
        }
    }

    fn generate(
        &self,
        post: &str,
        nonce: &Nonce,
        preview_out: Option<&Path>,
    ) -> Result<Value, Error> {
        let staged = self.app.generate.handle(post, nonce)?;
        if let Some(path) = preview_out {
            self.app.fs.write_bytes(path, staged.image.bytes())?;
        }
        Ok(staged.to_json())
    }

    /// 投稿と、保存待ちのアイキャッチ候補（あれば）
    fn show_post(&self, post: &str) -> Result<Value, Error> {
        let post = self.app.posts.show(post)?;
        let pending = self.app.pending.peek_pending(post.id)?;
        let mut value = to_value(&post)?;
        value["pending_featured_image"] = json!(pending.map(|id| id.get()));
        Ok(value)
    }
}

/// 結果をエンベロープにして stdout へ出す。失敗時もエンベロープを出したうえで Err を返す
fn respond(result: Result<Value, Error>) -> Result<i32, Error> {
    match result {
        Ok(data) => {
            println!("{}", Envelope::ok(data).to_json_string());
            Ok(0)
        }
        Err(e) => {
            println!("{}", Envelope::failure(&e).to_json_string());
            Err(e)
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::json(e.to_string()))
}

fn cmd_name_for_log(cmd: &FeatgenCommand) -> &'static str {
    match cmd {
        FeatgenCommand::Help => "help",
        FeatgenCommand::Nonce { .. } => "nonce",
        FeatgenCommand::Generate { .. } => "generate",
        FeatgenCommand::Assign { .. } => "assign",
        FeatgenCommand::Save { .. } => "save",
        FeatgenCommand::Post(_) => "post",
        FeatgenCommand::Settings(_) => "settings",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("featgen: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    if config.command == FeatgenCommand::Help {
        print_help();
        return Ok(0);
    }
    let app = wire_featgen(config.verbose)?;
    let runner = Runner { app };
    runner.run(config.command)
}

fn print_usage() {
    eprintln!("Usage: featgen [options] <command> [args...]");
}

fn print_help() {
    println!("Usage: featgen [options] <command> [args...]");
    println!("Options:");
    println!("  -h, --help                     Show this help message");
    println!("  -v, --verbose                  Mirror log records to stderr (for troubleshooting)");
    println!("  --generate <shell>             Generate shell completion script (bash, zsh, fish). Source the output to enable tab completion.");
    println!();
    println!("Commands:");
    println!("  nonce <generate|assign>        Issue a security token for the action and print it");
    println!("  generate --post <id> --nonce <token> [--preview-out <path>]");
    println!("                                 Generate an image from the post's title and content, store it as");
    println!("                                 an attachment and stage it as the post's featured image");
    println!("  assign --post <id> --asset <id> --nonce <token>");
    println!("                                 Set an existing asset as the post's featured image right away");
    println!("  save --post <id> [--title T] [--content C] [--autosave] [--revision]");
    println!("                                 Save the post; a staged image becomes its featured image");
    println!("  post new --title T --content C [--type post] [--status draft]");
    println!("  post show --post <id>");
    println!("  settings show | set-key <key> | clear-key | set <name> <value>");
    println!("                                 Settings names: model, endpoint, width, height, steps, timeout_secs,");
    println!("                                 eligible_post_types (comma separated)");
    println!();
    println!("Environment:");
    println!("  FEATGEN_HOME     Home directory for settings.json and logs/featgen.jsonl.");
    println!("                   If unset, $XDG_CONFIG_HOME/featgen (e.g. ~/.config/featgen) is used.");
    println!("  FEATGEN_SITE     Site directory (posts.json, media.json, postmeta.json, nonces.json, uploads/).");
    println!("                   Default: $FEATGEN_HOME/site");
    println!("  FEATGEN_API_KEY  API key for the image service; overrides the key stored in settings.json.");
    println!();
    println!("Examples:");
    println!("  featgen settings set-key <key>");
    println!("  featgen post new --title Sunset --content \"A photo of a sunset over mountains\"");
    println!("  featgen generate --post 1 --nonce \"$(featgen nonce generate)\" --preview-out preview.png");
    println!("  featgen save --post 1");
}
