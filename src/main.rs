use clap::Parser;
use launchflow::adapter::inbound::cli::command::{Cli, Commands};
use launchflow::adapter::inbound::cli::output::{self, OutputConfig};
use launchflow::adapter::inbound::cli::{allowance, modal, run};
use launchflow::error::Result;
use launchflow::infrastructure::config::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet));

    let result = match &cli.command {
        Commands::Modal(args) => modal::execute(args),
        Commands::Run(args) => match load_config(&cli) {
            Ok(config) => run::execute(&config, args).await,
            Err(e) => Err(e),
        },
        Commands::Allowance => match load_config(&cli) {
            Ok(config) => allowance::execute(&config).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config)?;
    config.logging = config.logging.with_verbosity(cli.verbose);
    config.init_logging();
    Ok(config)
}
