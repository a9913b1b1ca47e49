mod command;

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use command::{COMMANDS, Command, resolve_scenario};
use parley_application::{ScenarioController, TurnOutcome};
use parley_core::ParleyError;
use parley_core::scenario::ScenarioCatalog;
use parley_core::session::{MessageRole, SessionPhase};
use parley_interaction::{GeminiApiAgent, GenerationConfig};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new(catalog: &ScenarioCatalog) -> Self {
        let mut commands: Vec<String> = COMMANDS.iter().map(|c| c.to_string()).collect();
        commands.extend(catalog.names().map(|name| format!("/scenario {name}")));
        Self { commands }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

fn init_tracing() {
    // Default to warn so log lines stay out of the dialogue.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_header(controller: &ScenarioController) {
    if let Ok(scenario) = controller.current_scenario() {
        println!(
            "{}",
            format!("Scenario: {} - {}", scenario.name, scenario.description)
                .bright_magenta()
                .bold()
        );
    }
}

fn print_menu(catalog: &ScenarioCatalog, current: &str) {
    println!("{}", "Choose Scenario".bright_yellow().bold());
    for (i, scenario) in catalog.iter().enumerate() {
        let marker = if scenario.name == current { "*" } else { " " };
        println!(
            "{} {}. {}  {}",
            marker,
            i + 1,
            scenario.name.bright_white(),
            scenario.description.bright_black()
        );
    }
    println!();
}

fn print_help() {
    println!("{}", "Commands:".bright_yellow());
    println!("  /scenarios            list scenarios");
    println!("  /scenario <name|n>    switch scenario");
    println!("  /custom <text>        describe a custom scenario");
    println!("  /restart              start the current scenario over");
    println!("  /history              show the conversation so far");
    println!("  quit                  exit");
    println!();
}

fn print_assistant(content: &str) {
    println!("{}", "[coach]".bright_magenta());
    for line in content.lines() {
        println!("{}", line.bright_blue());
    }
    println!();
}

fn print_history(controller: &ScenarioController) {
    print_header(controller);
    for message in controller.state().messages() {
        match message.role {
            MessageRole::Assistant => print_assistant(&message.content),
            MessageRole::User => println!("{}\n", format!("> {}", message.content).green()),
        }
    }
}

fn render(controller: &ScenarioController, outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Started { reply } => {
            print_header(controller);
            print_assistant(&reply);
        }
        TurnOutcome::Replied { reply } => print_assistant(&reply),
        TurnOutcome::AwaitingCustomInput => {
            print_header(controller);
            println!("{}", "Describe your custom social scenario:".bright_yellow());
        }
        TurnOutcome::Unchanged => {
            println!("{}", "Scenario already running.".bright_black());
        }
    }
}

fn render_error(err: &ParleyError) {
    match err {
        ParleyError::Validation(message) => println!("{}", message.yellow()),
        ParleyError::Generation { source, .. } => {
            eprintln!("{}", format!("Generation failed: {source}").red());
            if source.is_retryable() {
                eprintln!("{}", "You can resubmit your message.".bright_black());
            }
        }
        other => eprintln!("{}", format!("Error: {other}").red()),
    }
}

/// Warning for a plain line that will start the scenario instead of being
/// sent, which happens when the session has not been seeded yet.
fn unsent_text_notice(phase: SessionPhase, command: &Command) -> Option<&'static str> {
    match (phase, command) {
        (SessionPhase::Uninitialized, Command::Text(_)) => {
            Some("The scenario has not started yet, so your message was not sent. Starting it now.")
        }
        _ => None,
    }
}

/// Runs the controller event for `command`, if it maps to one.
async fn dispatch(
    controller: &mut ScenarioController,
    command: Command,
) -> Option<Result<TurnOutcome, ParleyError>> {
    match command {
        Command::Select(arg) => {
            let name = resolve_scenario(controller.catalog(), &arg)
                .unwrap_or(arg.as_str())
                .to_string();
            Some(controller.select_scenario(&name).await)
        }
        Command::Custom(text) => Some(controller.start_custom_scenario(&text).await),
        Command::Restart => Some(controller.restart_scenario().await),
        Command::Text(text) => match controller.phase() {
            SessionPhase::AwaitingCustomInput => {
                Some(controller.submit_custom_scenario(&text).await)
            }
            SessionPhase::Active => Some(controller.submit_user_turn(&text).await),
            SessionPhase::Uninitialized => Some(controller.ensure_initialized().await),
        },
        Command::Quit
        | Command::Help
        | Command::ListScenarios
        | Command::History
        | Command::Empty
        | Command::Unknown(_) => None,
    }
}

/// The main entry point for the Parley readline REPL.
///
/// 1. Loads `.env` and the environment, failing fast without an API key
/// 2. Builds the Gemini client, the shared catalog and one session
/// 3. Seeds the default scenario
/// 4. Feeds each input line to the controller, one request at a time
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // ===== Backend Initialization =====
    let config = GenerationConfig::from_env().context("failed to read configuration")?;
    tracing::info!(?config, "Configuration loaded");
    let agent = GeminiApiAgent::from_config(&config)?;
    let catalog = Arc::new(ScenarioCatalog::builtin());
    let mut controller = ScenarioController::new(Arc::clone(&catalog), Arc::new(agent));

    // ===== REPL Setup =====
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new(&catalog)));

    println!("{}", "=== Parley: Social Skills Trainer ===".bright_magenta().bold());
    println!("{}", "Type '/help' for commands, or 'quit' to exit.".bright_black());
    println!();
    print_menu(&catalog, controller.state().current_scenario());

    match controller.ensure_initialized().await {
        Ok(outcome) => render(&controller, outcome),
        Err(err) => render_error(&err),
    }

    // ===== Main REPL Loop =====
    // Input is only read again after the previous request finished, so a
    // session never has more than one generation call in flight.
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let command = Command::parse(&line);
                if command != Command::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match &command {
                    Command::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Command::Help => print_help(),
                    Command::ListScenarios => {
                        print_menu(&catalog, controller.state().current_scenario())
                    }
                    Command::History => print_history(&controller),
                    Command::Unknown(name) => {
                        println!("{}", format!("Unknown command: {name}").bright_black())
                    }
                    _ => {}
                }

                if let Some(notice) = unsent_text_notice(controller.phase(), &command) {
                    println!("{}", notice.yellow());
                }
                if let Some(result) = dispatch(&mut controller, command).await {
                    match result {
                        Ok(outcome) => render(&controller, outcome),
                        Err(err) => render_error(&err),
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    let state = controller.into_state();
    tracing::info!(
        session_id = %state.id,
        messages = state.messages().len(),
        "Session ended"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_core::generation::{GenerationFailure, Generator};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every prompt with "reply #n".
    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Generator for CountingGenerator {
        fn label(&self) -> &str {
            "counting"
        }

        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationFailure> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("reply #{n}"))
        }
    }

    fn controller() -> ScenarioController {
        ScenarioController::new(
            Arc::new(ScenarioCatalog::builtin()),
            Arc::new(CountingGenerator::default()),
        )
    }

    async fn run(
        controller: &mut ScenarioController,
        line: &str,
    ) -> Result<TurnOutcome, ParleyError> {
        dispatch(controller, Command::parse(line))
            .await
            .expect("line should map to a controller event")
    }

    async fn active_controller() -> ScenarioController {
        let mut controller = controller();
        controller.ensure_initialized().await.unwrap();
        run(&mut controller, "Hi, I'm Alex.").await.unwrap();
        assert_eq!(controller.state().messages().len(), 3);
        controller
    }

    #[tokio::test]
    async fn test_plain_text_is_a_turn_when_active() {
        let mut controller = controller();
        controller.ensure_initialized().await.unwrap();

        let outcome = run(&mut controller, "  Nice to meet you!  ").await.unwrap();

        assert_eq!(
            outcome,
            TurnOutcome::Replied {
                reply: "reply #2".to_string()
            }
        );
        assert_eq!(
            controller.state().messages()[1].content,
            "  Nice to meet you!  "
        );
    }

    #[tokio::test]
    async fn test_plain_text_describes_custom_scenario_when_awaiting() {
        let mut controller = controller();
        run(&mut controller, "/scenario 6").await.unwrap();
        assert_eq!(controller.phase(), SessionPhase::AwaitingCustomInput);

        let outcome = run(&mut controller, "Returning a faulty kettle").await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Started { .. }));
        assert_eq!(controller.phase(), SessionPhase::Active);
        assert_eq!(
            controller.state().custom_scenario_text(),
            "Returning a faulty kettle"
        );
    }

    #[tokio::test]
    async fn test_plain_text_before_start_seeds_and_warns() {
        let mut controller = controller();
        let command = Command::parse("Hello?");
        assert!(unsent_text_notice(controller.phase(), &command).is_some());

        let outcome = dispatch(&mut controller, command).await.unwrap().unwrap();

        assert!(matches!(outcome, TurnOutcome::Started { .. }));
        assert_eq!(controller.state().messages().len(), 1);
        assert!(unsent_text_notice(controller.phase(), &Command::parse("Hello?")).is_none());
    }

    #[tokio::test]
    async fn test_scenario_selected_by_number_and_name() {
        let mut controller = controller();

        run(&mut controller, "/scenario 1").await.unwrap();
        assert_eq!(controller.state().current_scenario(), "Job Interview");

        run(&mut controller, "/scenario attending a party").await.unwrap();
        assert_eq!(controller.state().current_scenario(), "Attending a Party");

        let err = run(&mut controller, "/scenario Karaoke").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(controller.state().current_scenario(), "Attending a Party");
    }

    #[tokio::test]
    async fn test_custom_command_switches_and_seeds() {
        let mut controller = active_controller().await;

        let outcome = run(&mut controller, "/custom Meeting my neighbour").await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Started { .. }));
        assert_eq!(controller.state().current_scenario(), "Custom Scenario");
        assert_eq!(controller.state().messages().len(), 1);
        assert_eq!(
            controller.state().custom_scenario_text(),
            "Meeting my neighbour"
        );
    }

    #[tokio::test]
    async fn test_blank_custom_command_keeps_conversation() {
        let mut controller = active_controller().await;
        let before = controller.state().clone();

        let err = run(&mut controller, "/custom").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(controller.state(), &before);
        assert_eq!(controller.state().current_scenario(), "Networking Event");
    }

    #[tokio::test]
    async fn test_custom_command_replaces_running_custom_scenario() {
        let mut controller = controller();
        run(&mut controller, "/custom A first date").await.unwrap();
        run(&mut controller, "How do I look?").await.unwrap();

        run(&mut controller, "/custom A job review").await.unwrap();

        assert_eq!(controller.state().messages().len(), 1);
        assert_eq!(controller.state().custom_scenario_text(), "A job review");
    }

    #[tokio::test]
    async fn test_local_commands_do_not_reach_controller() {
        let mut controller = controller();
        for line in ["quit", "/help", "/scenarios", "/history", "", "/dance"] {
            assert!(dispatch(&mut controller, Command::parse(line)).await.is_none());
        }
        assert_eq!(controller.phase(), SessionPhase::Uninitialized);
    }
}
