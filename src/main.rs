// src/main.rs

use blocktask::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run_main().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("blocktask error: {err:?}");
            1
        }
    };
    // The stdin reader may still be parked on a blocking read; exiting here
    // skips waiting for it during runtime shutdown.
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
