#![deny(unsafe_code)]

use clap::Parser;
use std::io;

#[derive(Parser)]
#[command(author, version = option_env!("TIMETABLE_VERSION").unwrap_or("dev"), about, long_about = None)]
struct CommandLineArguments {
  #[clap(short, long, default_value = "env.toml")]
  config: String,
}

async fn run(args: CommandLineArguments) -> io::Result<()> {
  let config = timetable::config::Configuration::load(&args.config).await?;
  let worker = timetable::api::Worker::from_configuration(&config).await;
  let addr = config.web_addr().to_string();

  log::info!("listening on '{addr}'");
  timetable::api::new(worker).listen(addr).await
}

fn main() -> io::Result<()> {
  dotenv::dotenv().ok();
  env_logger::init();

  log::info!("environment + logger ready.");

  let args = CommandLineArguments::parse();
  async_std::task::block_on(run(args))
}
