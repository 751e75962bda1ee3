//! AUR builder CLI entrypoint.
//!
//! Parses arguments, resolves configuration, initialises logging, and
//! dispatches to the selected subcommand. Any fatal error is printed to
//! standard error and turned into exit status 1.

use aur_builder::cli::{BuildArgs, Cli, Command};
use aur_builder::config::Settings;
use aur_builder::dirs::{BaseDirs, SystemBaseDirs, current_dir_utf8};
use aur_builder::editor::RecipeEditor;
use aur_builder::error::Result;
use aur_builder::exec::{CommandExecutor, StdioMode, SystemCommandExecutor};
use aur_builder::fetch::SourceFetcher;
use aur_builder::logging;
use aur_builder::makepkg::BuildInvoker;
use aur_builder::packages::print_installed_packages;
use aur_builder::prompt::ConfirmationPrompt;
use aur_builder::shell::spawn_shell;
use aur_builder::update::PacmanUpdater;
use aur_builder::workflow::BuildWorkflow;
use clap::Parser;
use std::io::Write;
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemBaseDirs, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let cwd = current_dir_utf8()?;
    let settings = Settings::resolve(cli.overrides(), dirs, &cwd)?;
    logging::init(settings.log_level);

    if let Some(path) = &settings.config_path {
        write_stderr_line(stderr, format!("Using config file: {path}"));
    }
    debug!(
        subcommand = cli.subcommand_name(),
        log_level = ?settings.log_level,
        base_dir = %settings.base_dir,
        "Configuration resolved"
    );

    let executor = SystemCommandExecutor;
    let result = dispatch(cli, &settings, &executor, dirs, stderr);
    if let Err(err) = &result {
        error!(subcommand = cli.subcommand_name(), error = %err, "Command failed");
    }
    result
}

fn dispatch(
    cli: &Cli,
    settings: &Settings,
    executor: &dyn CommandExecutor,
    dirs: &dyn BaseDirs,
    stderr: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Some(Command::Build(args)) => run_build(args, settings, executor, dirs, stderr),
        Some(Command::Shell) => spawn_shell(executor, stderr),
        None => print_installed_packages(executor, &mut std::io::stdout().lock()),
    }
}

fn run_build(
    args: &BuildArgs,
    settings: &Settings,
    executor: &dyn CommandExecutor,
    dirs: &dyn BaseDirs,
    stderr: &mut dyn Write,
) -> Result<()> {
    let git_output = if settings.log_level.shows_tool_output() {
        StdioMode::Inherit
    } else {
        StdioMode::Silent
    };
    let updater =
        PacmanUpdater::new(executor).with_privilege_command(settings.privilege_command.as_str());
    let workflow = BuildWorkflow::new(
        SourceFetcher::new(executor, dirs).with_git_output(git_output),
        &updater,
        RecipeEditor::from_env(executor),
        BuildInvoker::new(executor),
    );

    let mut prompt = ConfirmationPrompt::stdio()?;
    workflow
        .run(&args.package, &settings.base_dir, &mut prompt, stderr)
        .map(drop)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
