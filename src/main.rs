use clap::Parser;

use stow_scanner::cli::{Cli, Commands};
use stow_scanner::commands::{
    run_cleanup, run_config, run_dirty, run_refresh, run_scan, run_search, run_show, run_stats,
};
use stow_scanner::logging;

fn main() {
    // Local overrides first; dotenvy never replaces variables already set.
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let exit_code = match &cli.command {
        Commands::Scan(args) => run_scan(args, &cli),
        Commands::Cleanup(args) => run_cleanup(args, &cli),
        Commands::Refresh(args) => run_refresh(args, &cli),
        Commands::Search(args) => run_search(args, &cli),
        Commands::Show(args) => run_show(args, &cli),
        Commands::Dirty(args) => run_dirty(args, &cli),
        Commands::Stats(args) => run_stats(args, &cli),
        Commands::Config(args) => run_config(args, &cli),
    };

    std::process::exit(exit_code);
}
