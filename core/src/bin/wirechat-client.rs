//! Wirechat Client
//!
//! Headless chat client: sends one prompt to the remote endpoint and
//! streams the reply to stdout. Exercises the full library without any UI
//! framework.
//!
//! # Usage
//!
//! ```bash
//! # Against the default endpoint (ws://127.0.0.1:8765)
//! wirechat-client "What is the airspeed velocity of an unladen swallow?"
//!
//! # Custom endpoint and language
//! WIRECHAT_ENDPOINT=wss://chat.example.com/ws WIRECHAT_LANGUAGE=de \
//!     wirechat-client "Hallo"
//!
//! # With verbose logging
//! RUST_LOG=debug wirechat-client "Hello"
//! ```
//!
//! # Environment Variables
//!
//! - `WIRECHAT_ENDPOINT`: WebSocket URL of the remote endpoint
//! - `WIRECHAT_LANGUAGE`: language tag sent with the request
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

use std::io::Write;
use std::time::Duration;

use tracing::info;

use wirechat_core::{ChatConfig, ChatSession};

/// How long to wait for the reply before giving up. The core itself has no
/// timeout (a stalled stream stays in flight); this is a client-side guard.
const REPLY_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("wirechat_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    anyhow::ensure!(
        !prompt.trim().is_empty(),
        "usage: wirechat-client <prompt>"
    );

    let config = ChatConfig::from_env();
    info!(endpoint = %config.endpoint, language = %config.language, "starting turn");

    let mut session = ChatSession::new(config);
    session.send_user_message(&prompt)?;

    let mut printed = String::new();
    let wait = tokio::time::timeout(REPLY_TIMEOUT, async {
        while session.is_processing() {
            session.poll_events();
            if let Some(chunk) = render_progress(&mut printed, session.live_text()) {
                print!("{chunk}");
                std::io::stdout().flush().ok();
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    })
    .await;

    anyhow::ensure!(wait.is_ok(), "no end-of-turn frame within {REPLY_TIMEOUT:?}");

    // The final poll may have applied trailing deltas and the promotion in
    // one pass; catch up to the finished block's text.
    if let Some(block) = session.messages().last() {
        if let Some(chunk) = render_progress(&mut printed, &block.message) {
            print!("{chunk}");
        }
    }
    println!();

    Ok(())
}

/// Compute what to emit so stdout matches `live`, recording what has been
/// printed so far.
///
/// Tracking the printed text (not a byte offset) keeps this safe when the
/// reply restarts mid-turn: text that no longer extends what was printed is
/// re-emitted from scratch on a fresh line instead of sliced at a stale
/// offset.
fn render_progress(printed: &mut String, live: &str) -> Option<String> {
    if live == printed.as_str() {
        return None;
    }
    let chunk = if let Some(tail) = live.strip_prefix(printed.as_str()) {
        tail.to_string()
    } else {
        format!("\n{live}")
    };
    printed.clear();
    printed.push_str(live);
    Some(chunk)
}

#[cfg(test)]
mod tests {
    use super::render_progress;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_growth_emits_only_the_tail() {
        let mut printed = String::new();
        assert_eq!(render_progress(&mut printed, "Hi"), Some("Hi".to_string()));
        assert_eq!(
            render_progress(&mut printed, "Hi there"),
            Some(" there".to_string())
        );
        assert_eq!(render_progress(&mut printed, "Hi there"), None);
    }

    #[test]
    fn test_restarted_reply_is_reprinted_whole() {
        let mut printed = String::new();
        render_progress(&mut printed, "stale");
        assert_eq!(
            render_progress(&mut printed, "fresh"),
            Some("\nfresh".to_string())
        );
        assert_eq!(printed, "fresh");
    }

    #[test]
    fn test_restart_across_multibyte_text_does_not_slice() {
        // A restarted reply can regrow past the old printed length with the
        // boundary landing inside a multibyte character; the prefix check
        // must re-emit instead of slicing by offset.
        let mut printed = String::new();
        render_progress(&mut printed, "ééé");
        assert_eq!(
            render_progress(&mut printed, "aaaaaé"),
            Some("\naaaaaé".to_string())
        );
        assert_eq!(
            render_progress(&mut printed, "aaaaaéz"),
            Some("z".to_string())
        );
    }

    #[test]
    fn test_cleared_text_resets_tracking() {
        let mut printed = String::new();
        render_progress(&mut printed, "partial");
        render_progress(&mut printed, "");
        assert_eq!(
            render_progress(&mut printed, "final"),
            Some("final".to_string())
        );
    }
}
