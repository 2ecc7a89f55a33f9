use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use taskdeck::render::input_panel;
use taskdeck::{HttpInferenceService, RequestController, TaskMode, TaskdeckConfig};

/// Terminal client for the text generation / sentiment service
#[derive(Debug, Parser)]
#[command(name = "taskdeck", version)]
struct Cli
{   /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>
  , /// Service base URL, overrides config and environment
    #[arg(long)]
    base_url: Option<String>
  , /// Inference endpoint path
    #[arg(long)]
    endpoint: Option<String>
}

const HELP: &str = "\
commands:
  /task gen|sentiment   switch task
  /max N                max length (generation)
  /temp X               temperature (generation)
  /send                 submit the current input
  /clear                clear input and result
  /health               check the service
  /show                 show the page
  /quit                 exit
any other line replaces the input text";

/// One parsed stdin line
#[derive(Debug, PartialEq)]
enum Command
{   Task(TaskMode)
  , MaxLength(i64)
  , Temperature(f64)
  , Send
  , Clear
  , Health
  , Show
  , Help
  , Quit
  , Input(String)
  , Invalid(String)
}

fn parse_command(line: &str) -> Command
{   let Some(rest) = line.strip_prefix('/') else
    {   return Command::Input(line.to_string());
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default().trim();
    match name
    {   "task" => arg.parse()
          .map(Command::Task)
          .unwrap_or_else(|e: taskdeck::Error| Command::Invalid(e.to_string()))
      , "max" => arg.parse()
          .map(Command::MaxLength)
          .unwrap_or_else(|_| Command::Invalid(format!("not an integer: {}", arg)))
      , "temp" => arg.parse()
          .map(Command::Temperature)
          .unwrap_or_else(|_| Command::Invalid(format!("not a number: {}", arg)))
      , "send" => Command::Send
      , "clear" => Command::Clear
      , "health" => Command::Health
      , "show" => Command::Show
      , "help" => Command::Help
      , "quit" | "exit" => Command::Quit
      , other => Command::Invalid(format!("unknown command: /{}", other))
    }
}

fn load_config(cli: &Cli) -> Result<TaskdeckConfig, taskdeck::Error>
{   let config = match &cli.config
    {   Some(path) => TaskdeckConfig::from_file(path)?
      , None => TaskdeckConfig::default()
    };
    config
      .with_env_overrides()?
      .with_overrides(cli.base_url.clone(), cli.endpoint.clone())
}

/// Upper bound on `/health`, so a hung service cannot stall
/// completion delivery in the main loop.
const HEALTH_CHECK_LIMIT: Duration = Duration::from_secs(5);

/// Health and banner of the service, as printable lines
async fn check_service(
  service: &HttpInferenceService
, limit: Duration
) -> Vec<String>
{   let checks = async {
      let health = service.health().await?;
      let info = service.service_info().await.ok();
      Ok::<_, taskdeck::InferenceError>((health, info))
    };
    match tokio::time::timeout(limit, checks).await
    {   Err(_) => {
          error!("Health check timed out after {:?}", limit);
          vec![format!("service did not answer within {:?}", limit)]
        }
      , Ok(Err(err)) => {
          error!("Health check failed: {}", err);
          vec![format!("service unreachable: {}", err)]
        }
      , Ok(Ok((health, info))) => {
          let mut lines = vec![format!("service: {}", health.status)];
          if let Some(info) = info
          {   lines.push(format!("tasks: {}", info.available_tasks.join(", ")));
              for (task, model) in &info.models
              {   lines.push(format!("  {}: {}", task, model));
              }
          }
          lines
        }
    }
}

fn show(controller: &RequestController)
{   print!("{}", input_panel(controller.session()));
    print!("{}", controller.view());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!("Using endpoint {}", config.service.endpoint_url());

    let service = Arc::new(HttpInferenceService::new(config.service)?);
    let mut controller = RequestController::new(service.clone());

    println!("{}", HELP);
    show(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop
    { tokio::select!
      { Some(completion) = controller.next_completion() => {
          debug!("Completion for epoch {}", completion.epoch);
          controller.apply(completion);
          print!("{}", controller.view());
        }
      , line = lines.next_line() => {
          let line = match line?
          {   Some(line) => line
            , None => break
          };
          let command = parse_command(&line);
          let gated = matches!(
            command,
            Command::Task(_) | Command::Send | Command::Clear
              | Command::MaxLength(_) | Command::Temperature(_)
              | Command::Input(_)
          );
          if gated && controller.loading()
          {   println!("busy: wait for the current request");
              continue;
          }
          match command
          {   Command::Task(task) => {
                controller.select_task(task);
                show(&controller);
              }
            , Command::MaxLength(v) => controller.set_max_length(v)
            , Command::Temperature(v) => controller.set_temperature(v)
            , Command::Send => {
                match controller.submit()
                {   Ok(_) => print!("{}", controller.view())
                  , Err(err) => println!("! {}", err)
                }
              }
            , Command::Clear => {
                controller.clear();
                show(&controller);
              }
            , Command::Health => {
                for line in check_service(&service, HEALTH_CHECK_LIMIT).await
                {   println!("{}", line);
                }
              }
            , Command::Show => show(&controller)
            , Command::Help => println!("{}", HELP)
            , Command::Quit => break
            , Command::Input(text) => controller.set_input(text)
            , Command::Invalid(msg) => println!("! {}", msg)
          }
        }
      }
    }

    info!("taskdeck exiting");
    Ok(())
}
