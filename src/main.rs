use clap::Parser;

use qrlinker::cli::{Cli, Commands};
use qrlinker::config::{get_config, init_config};
use qrlinker::runtime::modes::{run_cli, run_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());

    match cli.command {
        None | Some(Commands::Serve) => {
            let config = get_config();
            // guard 需要存活到进程结束，否则缓冲的日志会丢失
            let _guard = qrlinker::system::logging::init_logging(&config.logging)?;
            run_server().await
        }
        Some(cmd) => {
            if let Err(e) = run_cli(cmd).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
