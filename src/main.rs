use clap::Parser;
use forms_client::cli::commands::{cmd_fetch, cmd_method, cmd_run};
use forms_client::cli::config::{
    BASE_URL_ENV, Cli, Commands, load_config, resolve_base_url, resolve_log_filter,
    resolve_trace_path,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(resolve_log_filter(cli.verbose, &config)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Resolve base URL: CLI > config > env > default
    let env_url = std::env::var(BASE_URL_ENV).ok();
    let base_url = resolve_base_url(cli.base_url.as_deref(), &config, env_url.as_deref());

    match cli.command {
        Commands::Run => {
            let trace_path = resolve_trace_path(cli.trace.as_deref(), &config);
            let stdin = std::io::stdin();
            cmd_run(&base_url, &config, trace_path, stdin.lock(), std::io::stdout())?;
        }
        Commands::Fetch { form, token } => {
            cmd_fetch(&base_url, &config, &form, token.as_deref())?;
        }
        Commands::Method { name } => cmd_method(&name),
    }

    Ok(())
}
