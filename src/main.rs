// src/main.rs

use buildwatch::{cli, logging, run, RunEnd};

#[tokio::main]
async fn main() {
    let end = match run_main().await {
        Ok(end) => end,
        Err(err) => {
            eprintln!("buildwatch error: {err:?}");
            std::process::exit(1);
        }
    };
    // Exit explicitly: tokio's stdin reader sits in a blocking read that
    // runtime shutdown would otherwise wait on.
    std::process::exit(end.exit_code());
}

async fn run_main() -> anyhow::Result<RunEnd> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    Ok(run(args).await?)
}
