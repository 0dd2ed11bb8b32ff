//! `chatsync send`: one send cycle against a live server.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, SendOutcome, StreamData};
use crate::models::Message;
use crate::store::{ConversationStore, StoreState};

use super::args::SendArgs;
use super::render::ReplyPrinter;

/// Cancel `token` on Ctrl+C.
fn setup_interrupt_handler(token: CancellationToken) {
    // Install the handler - ignore errors if already set
    let _ = ctrlc::set_handler(move || {
        token.cancel();
    });
}

/// Handle the `send` command.
pub async fn run_send(args: SendArgs) -> Result<()> {
    let config = ClientConfig::load(args.config.as_deref())
        .wrap_err("Failed to load configuration")?;
    let config = args.apply_to(config);
    tracing::debug!("Using {:?}", config);

    let store = ConversationStore::with_active_conversation(args.conversation.as_str());
    let dispatcher = Dispatcher::from_config(ReqwestHttpClient::new(), store.clone(), &config);

    let cancel = CancellationToken::new();
    setup_interrupt_handler(cancel.clone());

    let finished = CancellationToken::new();
    let send = async {
        let outcome = dispatcher
            .send_message_with_cancel(
                Message::user(args.message.as_str()),
                StreamData::from(&config),
                cancel,
            )
            .await;
        finished.cancel();
        outcome
    };
    let render = print_reply(store.subscribe(), finished.clone());

    let (outcome, printed) = tokio::join!(send, render);
    printed.wrap_err("Failed to write reply")?;

    match outcome {
        SendOutcome::Completed { .. } | SendOutcome::Streamed { .. } => {
            println!();
            Ok(())
        }
        SendOutcome::Cancelled => {
            eprintln!("\nCancelled.");
            Ok(())
        }
        SendOutcome::Failed { error } => Err(eyre!(error)),
    }
}

/// Print the reply as the store changes, until `finished` fires.
async fn print_reply(
    mut rx: watch::Receiver<StoreState>,
    finished: CancellationToken,
) -> std::io::Result<()> {
    let mut printer = ReplyPrinter::new();
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                printer.write_delta(&state, &mut stdout)?;
            }
            _ = finished.cancelled() => break,
        }
    }

    // Whatever landed after the last wake-up
    let state = rx.borrow().clone();
    printer.write_delta(&state, &mut stdout)
}
