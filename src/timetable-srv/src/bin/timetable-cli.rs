#![deny(unsafe_code)]

//! Command line access to the timetable: list the reference data, or search a staff member's or a
//! department's day.

use clap::{Parser, Subcommand};
use std::io;
use timetable::{
  config::Configuration,
  rendering,
  resolver::SearchMode,
  schema::{Day, PeriodSelector},
  session::Session,
  store::PostgrestStore,
};

#[derive(Parser)]
#[command(author, version = option_env!("TIMETABLE_VERSION").unwrap_or("dev"), about, long_about = None)]
struct CommandLineArguments {
  #[clap(short, long, default_value = "env.toml")]
  config: String,

  #[command(subcommand)]
  command: CommandLineCommand,
}

#[derive(Subcommand)]
enum CommandLineCommand {
  /// Lists every department.
  Departments,

  /// Lists every staff member.
  Staff,

  /// Searches the timetable of a staff member or a department.
  Search {
    /// The id or name of a staff member.
    #[clap(long, conflicts_with = "department")]
    staff: Option<String>,

    /// The id or name of a department.
    #[clap(long)]
    department: Option<String>,

    /// Monday through Saturday; defaults to today.
    #[clap(long)]
    day: Option<Day>,

    /// 1 through 8, or 0 for the whole day.
    #[clap(long, default_value = "0", value_parser = parse_period)]
    period: PeriodSelector,
  },
}

fn parse_period(input: &str) -> Result<PeriodSelector, String> {
  let value = input
    .trim()
    .parse::<u8>()
    .map_err(|error| format!("'{input}' is not a period - {error}"))?;
  PeriodSelector::try_from(value)
}

async fn run(args: CommandLineArguments) -> io::Result<()> {
  let config = Configuration::load(&args.config).await?;
  let mut session = Session::new(PostgrestStore::new(config.store.clone()), config.policy());
  session.initialize().await;

  print!("{}", rendering::header());

  match args.command {
    CommandLineCommand::Departments => print!("{}", rendering::departments(session.departments())),
    CommandLineCommand::Staff => print!("{}", rendering::staff(session.staff())),
    CommandLineCommand::Search {
      staff,
      department,
      day,
      period,
    } => {
      // Names are accepted too; anything not found in the reference lists is used as a raw id.
      let staff_id = staff.map(|needle| {
        session
          .reference()
          .find_staff(&needle)
          .map(|member| member.id.to_string())
          .unwrap_or(needle)
      });
      let department_id = department.map(|needle| {
        session
          .reference()
          .find_department(&needle)
          .map(|department| department.id.to_string())
          .unwrap_or(needle)
      });

      let mode = match department_id {
        Some(_) => SearchMode::Department,
        None => SearchMode::Staff,
      };

      session.set_mode(mode);
      session.set_day(day.unwrap_or_else(Day::today));
      session.set_period(period);
      session.select_staff(staff_id);
      session.select_department(department_id);

      let outcome = session.search().await;
      print!("\n{}", rendering::outcome(outcome));
    }
  }

  Ok(())
}

fn main() -> io::Result<()> {
  dotenv::dotenv().ok();
  env_logger::init();

  log::info!("environment + logger ready.");

  let args = CommandLineArguments::parse();
  async_std::task::block_on(run(args))
}
