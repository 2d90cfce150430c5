//! Main TUI runner - entry point and event loop

use tokio::sync::mpsc;

use funcport_core::prelude::*;
use funcport_api::{HostApi, InsightsApi, ManagementApi, ResourceIds};
use funcport_app::actions::TaskContext;
use funcport_app::handler::update;
use funcport_app::message::{Message, UpdateAction};
use funcport_app::state::AppState;

use super::{event, terminal, view};

/// Run the TUI against an API client and a target function.
pub async fn run<C>(client: C, ids: ResourceIds) -> Result<()>
where
    C: ManagementApi + HostApi + InsightsApi + Clone + Send + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    let mut state = AppState::new(ids.clone());
    let (msg_tx, mut msg_rx) = mpsc::channel::<Message>(256);
    let ctx = TaskContext::new(client, ids, msg_tx);

    // Initial load kicks off before the first frame
    ctx.dispatch(UpdateAction::LoadEditor);

    let result = run_loop(&mut term, &mut state, &mut msg_rx, &ctx);

    ratatui::restore();
    result
}

/// Main event loop: drain loader completions, render, poll the terminal.
fn run_loop<C>(
    terminal: &mut ratatui::DefaultTerminal,
    state: &mut AppState,
    msg_rx: &mut mpsc::Receiver<Message>,
    ctx: &TaskContext<C>,
) -> Result<()>
where
    C: ManagementApi + HostApi + InsightsApi + Clone + Send + Sync + 'static,
{
    while !state.should_quit() {
        // Process loader completions (non-blocking)
        while let Ok(message) = msg_rx.try_recv() {
            process_message(state, message, ctx);
        }

        // Render
        terminal.draw(|frame| view::render(frame, state))?;

        // Handle terminal events
        if let Some(message) = event::poll()? {
            process_message(state, message, ctx);
        }
    }

    Ok(())
}

/// Run a message through update(), dispatching actions and chaining
/// follow-up messages until the turn settles.
pub fn process_message<C>(state: &mut AppState, message: Message, ctx: &TaskContext<C>)
where
    C: ManagementApi + HostApi + InsightsApi + Clone + Send + Sync + 'static,
{
    let mut next = Some(message);
    while let Some(message) = next.take() {
        let result = update(state, message);
        if let Some(action) = result.action {
            ctx.dispatch(action);
        }
        next = result.message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funcport_app::testing::{FakeApi, FAKE_SITE_ID};

    #[tokio::test]
    async fn test_process_message_chains_follow_ups() {
        let api = FakeApi::healthy();
        let ids = ResourceIds::new(FAKE_SITE_ID, "httpping");
        let (tx, mut rx) = mpsc::channel::<Message>(64);
        let ctx = TaskContext::new(api, ids.clone(), tx);
        let mut state = AppState::new(ids);

        // A full load lands: snapshot application chains into the token
        // check and the default-file fetch, both dispatched as tasks.
        ctx.dispatch(UpdateAction::LoadEditor);
        let snapshot = rx.recv().await.expect("snapshot");
        process_message(&mut state, snapshot, &ctx);

        assert!(!state.initial_loading);
        assert!(state.editor.selected_file.is_some());

        // Both background tasks report back
        let mut got_content = false;
        let mut got_token = false;
        for _ in 0..2 {
            match rx.recv().await.expect("completion") {
                Message::FileContentLoaded { .. } => got_content = true,
                Message::InsightsTokenLoaded { .. } => got_token = true,
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert!(got_content && got_token);
    }
}
