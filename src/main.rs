// Entrypoint for the CLI application.
// - Collect configuration once, then hand off to the session loop.
// - Returns `anyhow::Result` so capture or GUI failures end the process
//   with their context printed.

use screen_ask::api::{AnswerClient, HttpTransport};
use screen_ask::session::{ScreenPipeline, Session};
use screen_ask::ui::{collect_config, TerminalConsole};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    let config = collect_config()?;
    let session = Session::new(config.label());
    let client = AnswerClient::new(HttpTransport::new()?);
    let mut pipeline = ScreenPipeline::new(config, client);

    // Blocks until the user types "stop".
    session.run(&mut TerminalConsole, &mut pipeline, &mut std::io::stdout())?;
    Ok(())
}
