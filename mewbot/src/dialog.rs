//! # Interaction Dialog
//!
//! Question bloquante posée à un utilisateur au milieu de la boucle
//! principale. Le dialogue attend par pas courts (1 s par défaut) un message
//! de l'utilisateur interrogé ; les messages des autres utilisateurs sont
//! perdus pendant l'attente.

use std::time::Duration;

use mewquery::{EventSource, Scope};
use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::Result;
use crate::session::Sender;

pub const DEFAULT_DIALOG_STEP: Duration = Duration::from_secs(1);
pub const NO_ANSWER: &str = "未执行操作。";
pub const CONFIRM_SUFFIX: &str = "[是/否]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    WaitingForSender,
    Answered(String),
    TimedOut,
}

/// Ce dont un dialogue a besoin pour parler et écouter
pub struct DialogContext<'a> {
    pub source: &'a mut dyn EventSource,
    pub clock: &'a dyn Clock,
    pub ignore: &'a [String],
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionDialog {
    step: Duration,
}

impl Default for InteractionDialog {
    fn default() -> Self {
        Self::new(DEFAULT_DIALOG_STEP)
    }
}

impl InteractionDialog {
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
        }
    }

    /// Pose `prompt` et renvoie la réponse de `sender`, `""` à l'expiration
    pub fn ask(
        &self,
        ctx: &mut DialogContext<'_>,
        sender: &Sender,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String> {
        info!(sender = %sender.display_name, "Ask sender");
        ctx.source.send(ctx.scope, &format!("{} >", prompt))?;

        let started = ctx.clock.now();
        let mut state = DialogState::WaitingForSender;
        while state == DialogState::WaitingForSender {
            state = self.step_once(ctx, sender, started, timeout)?;
        }

        match state {
            DialogState::Answered(answer) => {
                debug!(answer = %answer, "Ask answered");
                Ok(answer)
            }
            _ => {
                ctx.source.send(ctx.scope, NO_ANSWER)?;
                Ok(String::new())
            }
        }
    }

    /// Question fermée : vrai seulement si la réponse commence par `是`
    pub fn confirm(
        &self,
        ctx: &mut DialogContext<'_>,
        sender: &Sender,
        prompt: &str,
        timeout: Duration,
    ) -> Result<bool> {
        let answer = self.ask(ctx, sender, &format!("{}{}", prompt, CONFIRM_SUFFIX), timeout)?;
        Ok(answer.starts_with('是'))
    }

    fn step_once(
        &self,
        ctx: &mut DialogContext<'_>,
        sender: &Sender,
        started: std::time::Instant,
        timeout: Duration,
    ) -> Result<DialogState> {
        let elapsed = ctx.clock.now().saturating_duration_since(started);
        if elapsed >= timeout {
            return Ok(DialogState::TimedOut);
        }
        let wait = self.step.min(timeout - elapsed);
        Ok(match ctx.source.wait_for_event(wait)? {
            Some(event)
                if event.sender_uid == sender.stable_uid
                    && !ctx.ignore.contains(&event.sender_uid) =>
            {
                DialogState::Answered(event.body.trim().to_string())
            }
            Some(event) => {
                debug!(from = %event.sender_uid, "Message dropped during dialog");
                DialogState::WaitingForSender
            }
            None => DialogState::WaitingForSender,
        })
    }
}
