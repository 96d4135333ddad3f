//! classgen CLI binary: generate lesson plans from the command line.
//!
//! Subcommands: `generate` (one plan), `prompt` (dry run), `apps`, `levels`, `session`
//! (interactive loop).

mod log_format;
mod logging;
mod repl;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use classgen::{MockLlm, RequestToken};
use classgen_cli::{
    apps_text, levels_text, plan_json, plan_text, resolve_profile, CliError, ContextOptions,
    Creator, APP_NAME, WAIT_NOTICE,
};
use tracing::Instrument;

#[derive(Parser, Debug)]
#[command(name = "classgen")]
#[command(about = "classgen - build a lesson plan for a creative application")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Creator Profile TOML (applications, levels, catalog, generation settings)
    #[arg(long, global = true, value_name = "PATH", env = "CLASSGEN_PROFILE")]
    profile: Option<PathBuf>,

    /// Resource catalog JSON (overrides the profile)
    #[arg(long, global = true, value_name = "PATH", env = "CLASSGEN_CATALOG")]
    catalog: Option<PathBuf>,

    /// Directory holding lesson_plan.yaml (overrides the profile)
    #[arg(long, global = true, value_name = "DIR", env = "PROMPTS_DIR")]
    prompts_dir: Option<PathBuf>,

    /// Completion model (overrides the profile)
    #[arg(long, global = true, value_name = "NAME", env = "OPENAI_MODEL")]
    model: Option<String>,

    /// Seed for link sampling (reproducible prompts)
    #[arg(long, global = true, value_name = "N")]
    seed: Option<u64>,

    /// Verbose: debug logs for classgen crates (written to LOG_FILE when set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one lesson plan
    Generate {
        #[arg(short, long, value_name = "APP")]
        application: String,
        #[arg(short, long, value_name = "LEVEL")]
        difficulty: String,
        /// Request token; the same token within one run is served from cache
        #[arg(long, value_name = "N")]
        token: Option<RequestToken>,
        /// Print {application, difficulty, token, title, logo, markdown} as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the prompt that would be sent, without calling the service
    Prompt {
        #[arg(short, long, value_name = "APP")]
        application: String,
        #[arg(short, long, value_name = "LEVEL")]
        difficulty: String,
    },
    /// List offered applications and their catalog coverage
    Apps,
    /// List offered difficulty levels
    Levels,
    /// Interactive session: choose, generate, repeat
    Session,
}

impl Args {
    fn context_options(&self) -> ContextOptions {
        ContextOptions {
            profile: self.profile.clone(),
            catalog: self.catalog.clone(),
            prompts_dir: self.prompts_dir.clone(),
            model: self.model.clone(),
            seed: self.seed,
        }
    }
}

/// Context for commands that never reach the completion service.
fn offline_creator(opts: &ContextOptions) -> Result<Creator, CliError> {
    let profile = resolve_profile(opts, classgen_config::load_profile_table(APP_NAME)?)?;
    Creator::build(profile, Arc::new(MockLlm::failing("offline")), opts.seed)
}

fn online_creator(opts: &ContextOptions) -> Result<Creator, CliError> {
    let profile = resolve_profile(opts, classgen_config::load_profile_table(APP_NAME)?)?;
    Creator::with_openai(profile, opts.seed)
}

async fn run(args: Args) -> Result<(), CliError> {
    let opts = args.context_options();
    match args.cmd {
        Command::Generate {
            application,
            difficulty,
            token,
            json,
        } => {
            let creator = online_creator(&opts)?;
            let request = creator.request(&application, &difficulty)?;
            let session = creator.session()?;
            let token = token.unwrap_or_else(RequestToken::mint);
            eprintln!("{}", WAIT_NOTICE);
            let span = tracing::info_span!("generate", application = %request.application, %token);
            let plan = session.fetch(&request, token).instrument(span).await?;
            let logo = creator.profile().logo_for(&plan.application);
            if json {
                println!("{}", plan_json(&plan, logo)?);
            } else {
                println!("{}", plan_text(&plan, logo));
            }
        }
        Command::Prompt {
            application,
            difficulty,
        } => {
            let creator = offline_creator(&opts)?;
            let request = creator.request(&application, &difficulty)?;
            let built = creator.requester().build_prompt(&request, &[])?;
            println!("{}", built.text);
        }
        Command::Apps => {
            let creator = offline_creator(&opts)?;
            println!("{}", apps_text(&creator.audit()?));
        }
        Command::Levels => {
            let creator = offline_creator(&opts)?;
            println!("{}", levels_text(&creator.profile().difficulties));
        }
        Command::Session => {
            let creator = online_creator(&opts)?;
            repl::run_session_loop(&creator).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    classgen_config::load_and_apply(APP_NAME, None::<&std::path::Path>).ok();
    let args = Args::parse();
    logging::init(args.verbose)?;

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}
