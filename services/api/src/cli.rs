use crate::demo::{run_demo, run_report, DemoArgs, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ecm_insights::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "ECM Insights",
    about = "Turn extracted building-audit measures into portfolio economics",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Build a portfolio report from an extracted record batch
    Report(ReportArgs),
    /// Render the report for the bundled four-measure sample audit
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_subcommand_parses_flags() {
        let cli = Cli::try_parse_from([
            "ecm-insights-api",
            "report",
            "--input",
            "audit.json",
            "--strict",
            "--csv",
            "rows.csv",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Report(args)) => {
                assert_eq!(args.input.to_str(), Some("audit.json"));
                assert!(args.strict);
                assert!(!args.llm_response);
                assert!(!args.json);
                assert_eq!(
                    args.csv.as_deref().and_then(|path| path.to_str()),
                    Some("rows.csv")
                );
            }
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["ecm-insights-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
