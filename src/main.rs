mod cmd;
mod fallback;
mod logs;
mod ng;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ng-start",
    version,
    about = "Run `ng serve --hmr`, falling back to a one-off `ng build` when the environment forbids binding a port"
)]
struct Cli {
    /// Extra arguments forwarded verbatim to both `ng serve` and `ng build`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ng_start=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let ng_bin = ng::resolve_bin(&std::env::current_dir()?);
    tracing::debug!(ng = %ng_bin.display(), "resolved Angular CLI binary");

    let primary = ng::NgCommand::serve(&ng_bin, &cli.args);
    let build = ng::NgCommand::build(&ng_bin, &cli.args);

    let code =
        fallback::run_with_fallback(primary, build, fallback::log_window(), |_code, output| {
            ng::is_sandbox_denied(output)
        })
        .await?;

    // The only place the wrapper terminates itself — everything above
    // returns its outcome and stays host-callable.
    std::process::exit(code);
}
