use anyhow::Context;
use clap::Parser;
use css_purge::{collect_classes, handle_pipe_command, run_purge, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Purge(args) => args.verbose,
        Commands::Classes(args) => args.verbose,
        Commands::Pipe(_) => false,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    match cli.command {
        Commands::Purge(args) => {
            let dry_run = args.dry_run;
            match run_purge(args).await {
                Ok(outcome) => {
                    let stats = &outcome.report.statistics;
                    if dry_run {
                        print!("{}", outcome.css_content);
                    } else {
                        println!("Purge successful!");
                        println!("  - Scanned {} HTML files", outcome.html_files_scanned);
                        println!("  - Whitelisted {} classes", outcome.whitelist.len());
                        println!(
                            "  - Kept {} of {} rules ({:.1}% smaller)",
                            stats.rules_retained,
                            stats.rules_total,
                            outcome.report.reduction_ratio() * 100.0
                        );
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Classes(args) => {
            let json = args.json;
            let whitelist = collect_classes(args).await.context("Failed to collect classes")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&whitelist)?);
            } else {
                for class in whitelist.sorted() {
                    println!("{}", class);
                }
            }
            Ok(())
        }
        Commands::Pipe(args) => {
            handle_pipe_command(args).await.context("Failed to purge stdin")?;
            Ok(())
        }
    }
}
