//! Offline check: reads an already generated answer from stdin and prints the analysis.
//!
//! Usage: `analyze_text <brand> [prompt] < answer.txt`

use std::io::Read;

use brand_mention_analyzer::analyze_response;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let mut args = std::env::args().skip(1);
    let Some(brand) = args.next() else {
        anyhow::bail!("usage: analyze_text <brand> [prompt] < answer.txt");
    };
    let prompt = args.collect::<Vec<_>>().join(" ");

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    tracing::debug!(bytes = text.len(), "read answer from stdin");

    let analysis = analyze_response(&text, &brand, &prompt);
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
