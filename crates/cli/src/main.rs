use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    bidwatch_cli::run().await
}
