//! Glue code tying the game client, commands and terminal output together.
use std::io::{self, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};

use client_frontend_core::{
    EventConsumer, FrontendConfig, GameView, StatusLogConsumer, frontend::Frontend,
    leaderboard_rows,
};
use runtime::{Event, GameClient, SessionEvent, SnapshotEvent, Topic};

use crate::command::Command;
use crate::config::CliConfig;
use crate::presentation::{render_leaderboard, render_message, render_view};

/// Runs one [`Command`] against a [`GameClient`].
pub struct CliFrontend {
    command: Command,
    frontend_config: FrontendConfig,
    cli_config: CliConfig,
    out: Box<dyn Write + Send>,
}

impl CliFrontend {
    pub fn new(command: Command, frontend_config: FrontendConfig, cli_config: CliConfig) -> Self {
        Self {
            command,
            frontend_config,
            cli_config,
            out: Box::new(io::stdout()),
        }
    }

    /// Redirect output, mostly for tests.
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub async fn execute(&mut self, client: &GameClient) -> Result<()> {
        let mut consumer = StatusLogConsumer::new(&self.frontend_config.messages);
        let mut status = client.subscribe(Topic::Status);

        let result = self.dispatch(client, &mut consumer, &mut status).await;

        // Whatever the runtime reported while the command ran
        self.drain(&mut consumer, &mut status)?;
        client.disconnect().await;
        self.out.flush()?;
        result
    }

    async fn dispatch(
        &mut self,
        client: &GameClient,
        consumer: &mut StatusLogConsumer,
        status: &mut broadcast::Receiver<Event>,
    ) -> Result<()> {
        if self.command.needs_session() {
            client.connect().await.context("Failed to connect wallet")?;
        }

        match self.command.clone() {
            Command::Status => self.print_status(client),
            Command::Watch { updates } => self.watch(client, consumer, status, updates).await,
            Command::Leaderboard => {
                let entries = client.leaderboard().await.context("Failed to load leaderboard")?;
                write!(self.out, "{}", render_leaderboard(&leaderboard_rows(&entries)))?;
                Ok(())
            }
            Command::Guess { number } => {
                client.submit_guess(&number).await.context("Guess failed")?;
                Ok(())
            }
            Command::Claim { round } => {
                client.claim_prize(&round).await.context("Claim failed")?;
                Ok(())
            }
            Command::AddFunds { amount } => {
                client
                    .add_funds_to_pool(&amount)
                    .await
                    .context("Adding funds failed")?;
                Ok(())
            }
            Command::Collect { round } => {
                client
                    .collect_unclaimed_pool(&round)
                    .await
                    .context("Collecting the pool failed")?;
                Ok(())
            }
        }
    }

    fn print_status(&mut self, client: &GameClient) -> Result<()> {
        let snapshot = client
            .snapshot()
            .context("Game state could not be loaded")?;
        let address = client.address();
        let view = GameView::from_snapshot(
            &snapshot,
            address.as_ref(),
            &client.chain_info().stake_currency,
        );
        write!(self.out, "{}", render_view(&view, &self.cli_config.ui))?;
        Ok(())
    }

    /// Print each refresh until Ctrl-C, the session ends, or `updates` refreshes
    /// have been shown.
    async fn watch(
        &mut self,
        client: &GameClient,
        consumer: &mut StatusLogConsumer,
        status: &mut broadcast::Receiver<Event>,
        updates: Option<u64>,
    ) -> Result<()> {
        let mut snapshots = client.subscribe(Topic::Snapshot);
        let mut sessions = client.subscribe(Topic::Session);
        let mut shown = 0u64;

        self.print_status(client)?;

        loop {
            if updates.is_some_and(|limit| shown >= limit) {
                break;
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, stopping watch");
                    break;
                }
                event = status.recv() => {
                    match event {
                        Ok(event) => self.show(consumer, &event)?,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Status lines dropped");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                event = snapshots.recv() => {
                    match event {
                        Ok(event @ Event::Snapshot(SnapshotEvent::Refreshed { .. })) => {
                            consumer.on_event(&event);
                            shown += 1;
                            writeln!(self.out)?;
                            self.print_status(client)?;
                        }
                        Ok(event) => {
                            consumer.on_event(&event);
                        }
                        Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    }
                }
                event = sessions.recv() => {
                    match event {
                        Ok(Event::Session(SessionEvent::Disconnected { reason, .. })) => {
                            // The matching status line is still queued
                            self.drain(consumer, status)?;
                            anyhow::bail!("Session ended: {reason}");
                        }
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    }
                }
            }
        }

        Ok(())
    }

    fn show(&mut self, consumer: &mut StatusLogConsumer, event: &Event) -> Result<()> {
        let impact = consumer.on_event(event);
        // Status events only ask for a redraw when a line was logged
        if impact.requires_redraw && matches!(event, Event::Status(_)) {
            if let Some(entry) = consumer.message_log().recent(1).next() {
                writeln!(self.out, "{}", render_message(entry))?;
            }
        }
        Ok(())
    }

    fn drain(
        &mut self,
        consumer: &mut StatusLogConsumer,
        status: &mut broadcast::Receiver<Event>,
    ) -> Result<()> {
        loop {
            match status.try_recv() {
                Ok(event) => self.show(consumer, &event)?,
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return Ok(()),
            }
        }
    }
}

#[async_trait]
impl Frontend for CliFrontend {
    async fn run(&mut self, client: GameClient) -> Result<()> {
        tracing::info!(command = ?self.command, "CLI client starting");
        let result = self.execute(&client).await;
        tracing::info!("CLI client exiting");
        result
    }
}
