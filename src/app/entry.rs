//! Application entry orchestration for the twitch-client CLI.

use crate::cli::Command;
use twitch_client::auth::StdinInput;
use twitch_client::bootstrap::{needs_bootstrap, Bootstrap};
use twitch_client::context::AppContext;
use twitch_client::runner::run_polling;
use twitch_client::ui::{RenderSink, Renderer};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;

/// Resolve the context and dispatch `command`; returns the process exit code.
pub(crate) async fn run(command: Option<Command>) -> i32 {
    let renderer = Renderer::for_stderr();

    let ctx = match AppContext::from_process_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            renderer.error(&e.to_string());
            return EXIT_FAILURE;
        }
    };
    tracing::debug!(config_dir = %ctx.config_dir().path().display(), "config resolved");

    match command {
        Some(Command::Bootstrap) => bootstrap(&ctx, &renderer).await,
        Some(Command::Run) => poll(&ctx, &renderer).await,
        None => {
            if needs_bootstrap(&ctx.store) {
                renderer.warn("Missing credentials or refresh token. Running bootstrap...");
                let code = bootstrap(&ctx, &renderer).await;
                if code != EXIT_OK {
                    return code;
                }
            }
            poll(&ctx, &renderer).await
        }
    }
}

async fn bootstrap(ctx: &AppContext, sink: &dyn RenderSink) -> i32 {
    let mut input = StdinInput;
    match Bootstrap::new(ctx, &mut input, sink).run().await {
        Ok(_) => EXIT_OK,
        Err(e) => {
            sink.error(&format!("bootstrap aborted: {e}"));
            EXIT_FAILURE
        }
    }
}

async fn poll(ctx: &AppContext, sink: &dyn RenderSink) -> i32 {
    match run_polling(ctx, sink).await {
        Ok(()) => EXIT_OK,
        Err(e) => {
            sink.error(&e.to_string());
            EXIT_FAILURE
        }
    }
}
