use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use instigpt::client::ChatView;
use instigpt::client::proxy::{DEFAULT_SERVER_URL, HttpProxyClient};
use instigpt::client::render;

fn prompt() -> std::io::Result<()> {
    print!("{} > ", render::INPUT_PLACEHOLDER);
    std::io::stdout().flush()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let server = std::env::var("CHAT_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    let client = HttpProxyClient::new(&server);
    tracing::info!(endpoint = client.endpoint(), "chat client ready");

    let mut view = ChatView::new();
    let mut printed = 0;

    print!("{}", render::render(&view));
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        view.set_draft(line);
        // Input is read only after the previous submit resolved, so one request is in flight at most.
        if view.submit(&client).await {
            if let Some(scroll) = view.take_scroll_request() {
                print!("{}", render::render_range(view.messages(), printed..=scroll.index));
                printed = scroll.index + 1;
            }
        }
        prompt()?;
    }

    println!();
    Ok(())
}
