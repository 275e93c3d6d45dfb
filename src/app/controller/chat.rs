//! Chat turns with the companion
//!
//! A turn appends the user's message and an empty model reply, then feeds
//! streamed chunks into that reply. Tool calls are executed here, never by
//! the delegate. Only one turn may be open at a time.

use crate::assistant::{ChatChunk, Delegate, Persona, ToolCall, ToolCommand, ToolOutcome, ADD_GOAL};
use crate::domain::{ChatMessage, ChatRole, Goal};
use crate::error::{LumenError, Result};
use crate::store::StorageKey;

use super::{required, Changed, Controller};

/// An open reply. Pass it back to [`Controller::apply_chunk`] and
/// [`Controller::finish_chat`].
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Id of the model message being filled in
    pub reply_id: String,
    /// Conversation before the message being answered
    pub history: Vec<ChatMessage>,
    pub message: String,
    pub persona: Persona,
}

impl Controller {
    pub fn is_chat_busy(&self) -> bool {
        self.chat_in_flight
    }

    /// Post a user message and open a reply to it
    pub fn begin_chat(&mut self, text: &str) -> Result<ChatTurn> {
        self.ensure_chat_ready()?;
        let text = required(text, "Message")?;

        let history = self.state.chat.clone();
        self.state.chat.push(ChatMessage::user(text.clone()));
        self.open_reply(history, text)
    }

    /// Open a reply to a user message already at the end of the chat, such
    /// as the one queued by a goal breakdown
    pub fn begin_pending_reply(&mut self) -> Result<ChatTurn> {
        self.ensure_chat_ready()?;

        let (last, earlier) = match self.state.chat.split_last() {
            Some((last, earlier)) if last.role == ChatRole::User => (last, earlier),
            _ => return Err(LumenError::invalid("No message is waiting for a reply")),
        };
        let message = last.text.clone();
        let history = earlier.to_vec();
        self.open_reply(history, message)
    }

    fn ensure_chat_ready(&self) -> Result<()> {
        if self.locked {
            return Err(LumenError::Locked);
        }
        if self.chat_in_flight {
            return Err(LumenError::ChatBusy);
        }
        Ok(())
    }

    fn open_reply(&mut self, history: Vec<ChatMessage>, message: String) -> Result<ChatTurn> {
        let reply = ChatMessage::model("");
        let reply_id = reply.id.clone();
        self.state.chat.push(reply);
        self.chat_in_flight = true;
        self.persist(&Changed::from([StorageKey::Chat]))?;

        tracing::debug!(%reply_id, history = history.len(), "Chat turn opened");
        Ok(ChatTurn {
            reply_id,
            history,
            message,
            persona: Persona::from_settings(&self.state.settings),
        })
    }

    /// Fold one streamed chunk into the open reply
    pub fn apply_chunk(&mut self, turn: &ChatTurn, chunk: ChatChunk) -> Result<()> {
        let mut changed = Changed::from([StorageKey::Chat]);
        match chunk {
            ChatChunk::Text(text) => {
                let idx = self.state.message_index(&turn.reply_id)?;
                self.state.chat[idx].text.push_str(&text);
            }
            ChatChunk::ToolCall(call) => self.run_tool(turn, &call, &mut changed)?,
        }
        self.persist(&changed)
    }

    fn run_tool(&mut self, turn: &ChatTurn, call: &ToolCall, changed: &mut Changed) -> Result<()> {
        let outcome = match ToolCommand::try_from(call) {
            Ok(ToolCommand::ProposePlan(plan)) => {
                let idx = self.state.message_index(&turn.reply_id)?;
                self.state.chat[idx].plan_proposal = Some(plan.clone());
                tracing::debug!(title = %plan.title, tasks = plan.tasks.len(), "Plan proposed");
                ToolOutcome::Plan(plan)
            }
            Ok(ToolCommand::AddGoal { title }) => {
                let goal = Goal::new(title, self.now());
                let goal_id = goal.id.clone();
                self.state.goals.insert(0, goal);
                changed.insert(StorageKey::Goals);
                ToolOutcome::GoalAdded { goal_id }
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call rejected");
                ToolOutcome::from(e)
            }
        };

        // The plan card itself is the visible result of a proposal
        if matches!(outcome, ToolOutcome::Plan(_)) {
            return Ok(());
        }

        let mut notice = ChatMessage::model(tool_notice(&call.name, &outcome));
        notice.tool_response = Some(outcome.to_json().to_string());
        self.state.chat.push(notice);
        Ok(())
    }

    /// Close the turn. A reply that produced neither text nor a plan is
    /// removed.
    pub fn finish_chat(&mut self, turn: ChatTurn) -> Result<()> {
        self.chat_in_flight = false;
        if let Ok(idx) = self.state.message_index(&turn.reply_id) {
            let reply = &self.state.chat[idx];
            if reply.text.trim().is_empty() && reply.plan_proposal.is_none() {
                self.state.chat.remove(idx);
            }
        }
        tracing::debug!(reply_id = %turn.reply_id, "Chat turn closed");
        self.persist(&Changed::from([StorageKey::Chat]))
    }

    /// Run a whole turn against `delegate`, blocking until the stream ends
    pub fn send_chat(&mut self, text: &str, delegate: &dyn Delegate) -> Result<()> {
        let turn = self.begin_chat(text)?;
        self.stream_turn(turn, delegate)
    }

    /// Answer a queued user message, see [`Controller::begin_pending_reply`]
    pub fn reply_pending(&mut self, delegate: &dyn Delegate) -> Result<()> {
        let turn = self.begin_pending_reply()?;
        self.stream_turn(turn, delegate)
    }

    fn stream_turn(&mut self, turn: ChatTurn, delegate: &dyn Delegate) -> Result<()> {
        let streamed = delegate
            .stream_chat(&turn.history, &turn.message, &turn.persona)
            .try_for_each(|chunk| self.apply_chunk(&turn, chunk));
        let finished = self.finish_chat(turn);
        streamed?;
        finished
    }
}

/// System line shown in the chat after a tool ran
fn tool_notice(name: &str, outcome: &ToolOutcome) -> String {
    match outcome {
        ToolOutcome::Error { message } => format!("[SYSTEM] Executing {name}... {message}"),
        _ if name == ADD_GOAL => format!("[SYSTEM] Executing {name}... Goal added to profile."),
        _ => format!("[SYSTEM] Executing {name}... Action completed."),
    }
}
