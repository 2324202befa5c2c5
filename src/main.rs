use clap::Parser;
use slotwatch::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use slotwatch::adapter::inbound::cli::{config, run, scrapers};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match cli.command {
        None => run::execute(&cli.run).await,
        Some(Commands::Run(args)) => run::execute(&args).await,
        Some(Commands::Seed(args)) => run::execute_seed(&args).await,
        Some(Commands::Scrapers) => {
            scrapers::execute();
            Ok(())
        }
        Some(Commands::Config(ConfigCommand::Validate(arg))) => {
            config::execute_validate(&arg.config)
        }
        Some(Commands::Config(ConfigCommand::Show(arg))) => config::execute_show(&arg.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
