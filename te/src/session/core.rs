//! ReconciliationSession - one editing conversation over one itinerary

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SessionError;
use crate::apply::apply_patch;
use crate::domain::{ChatMessage, Day, FieldPath, Itinerary, MessageId, PatchProposal};
use crate::extract::extract;
use crate::generation::{EditProposalRequest, GenerationClient, GenerationError, ProposalReply};
use crate::intent::{IntentClassifier, IntentSet};
use crate::prompts::{EditPromptContext, PromptLoader};

/// Assistant text for a turn the service could not answer
pub const APOLOGY: &str = "Sorry, I couldn't process that request. Please try again.";

/// Where the session is within a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for a new request
    Idle,
    /// Exactly one request is outstanding
    AwaitingResponse { turn: u64 },
}

/// Result of confirming a proposed patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The patch was merged into the day and is now consumed
    Applied { day_index: usize, fields: Vec<FieldPath> },
    /// The patch was consumed earlier; nothing changed
    AlreadyApplied,
    /// The patch is empty; nothing changed and it stays unconsumed
    NothingToApply,
}

/// Handle for the one outstanding request, returned by [`ReconciliationSession::begin_turn`]
#[derive(Debug)]
pub struct TurnTicket {
    turn: u64,
    day_index: usize,
    intent: IntentSet,
    request: EditProposalRequest,
}

impl TurnTicket {
    /// The request to send to the generation service
    pub fn request(&self) -> &EditProposalRequest {
        &self.request
    }

    /// Fields the user asked about
    pub fn intent(&self) -> &IntentSet {
        &self.intent
    }

    pub fn day_index(&self) -> usize {
        self.day_index
    }
}

/// Abandons the turn it guards unless completed first
struct TurnGuard<'a> {
    session: &'a mut ReconciliationSession,
    turn: Option<u64>,
}

impl TurnGuard<'_> {
    fn complete(mut self, ticket: TurnTicket, result: Result<Value, GenerationError>) -> Result<MessageId, SessionError> {
        self.turn = None;
        self.session.complete_turn(ticket, result)
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if let Some(turn) = self.turn.take() {
            self.session.end_abandoned(turn);
        }
    }
}

/// An itinerary plus the chat transcript that edits it
pub struct ReconciliationSession {
    /// Session id, used in log fields
    id: Uuid,

    itinerary: Itinerary,

    classifier: IntentClassifier,

    prompts: PromptLoader,

    /// Append-only, ordered by submission and response
    transcript: Vec<ChatMessage>,

    next_message_id: MessageId,

    /// Index of the day new requests are about
    active_day: usize,

    state: SessionState,

    /// Turns started so far
    turn_count: u64,
}

impl ReconciliationSession {
    /// Create a new session over `itinerary`, with day 0 active
    pub fn new(itinerary: Itinerary, classifier: IntentClassifier, prompts: PromptLoader) -> Self {
        let id = Uuid::now_v7();
        info!(session_id = %id, destination = %itinerary.destination, day_count = itinerary.day_count(), "Starting reconciliation session");
        Self {
            id,
            itinerary,
            classifier,
            prompts,
            transcript: Vec::new(),
            next_message_id: MessageId::new(1),
            active_day: 0,
            state: SessionState::Idle,
            turn_count: 0,
        }
    }

    /// Session with built-in keywords and embedded prompts
    pub fn with_defaults(itinerary: Itinerary) -> Result<Self, SessionError> {
        Ok(Self::new(itinerary, IntentClassifier::default(), PromptLoader::embedded_only()?))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    /// Mutable access for persistence (assigning the stored id)
    pub fn itinerary_mut(&mut self) -> &mut Itinerary {
        &mut self.itinerary
    }

    pub fn into_itinerary(self) -> Itinerary {
        self.itinerary
    }

    pub fn days(&self) -> &[Day] {
        self.itinerary.days()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn message(&self, id: MessageId) -> Option<&ChatMessage> {
        self.transcript.iter().find(|m| m.id() == id)
    }

    pub fn active_day(&self) -> usize {
        self.active_day
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { .. })
    }

    /// Most recent assistant message whose patch is non-empty and unconsumed
    pub fn latest_pending(&self) -> Option<MessageId> {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.proposal().is_some_and(|p| !p.is_applied() && !p.patch().is_empty()))
            .map(ChatMessage::id)
    }

    /// Select the day new requests will edit
    pub fn set_active_day(&mut self, index: usize) -> Result<(), SessionError> {
        debug!(session_id = %self.id, index, "set_active_day: called");
        if self.is_awaiting() {
            debug!("set_active_day: request outstanding, rejecting");
            return Err(SessionError::Busy);
        }
        self.itinerary.check_index(index)?;
        self.active_day = index;
        Ok(())
    }

    /// Manual edit of one field, bypassing the chat
    pub fn edit_field(&mut self, index: usize, path: FieldPath, value: impl Into<String>) -> Result<(), SessionError> {
        debug!(session_id = %self.id, index, %path, "edit_field: called");
        self.itinerary.set_field(index, path, value)?;
        Ok(())
    }

    /// Move the trip start; every day's date is re-derived
    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        debug!(session_id = %self.id, %start_date, "set_start_date: called");
        self.itinerary.set_start_date(start_date);
    }

    /// Start a turn: record the user's message and build the service request
    ///
    /// Fails without touching the transcript when a request is already
    /// outstanding, the text is blank, or the prompt cannot be rendered.
    pub fn begin_turn(&mut self, text: &str) -> Result<TurnTicket, SessionError> {
        debug!(session_id = %self.id, "begin_turn: called");
        if let SessionState::AwaitingResponse { turn } = self.state {
            info!(session_id = %self.id, turn, "Ignoring request while turn {} is outstanding", turn);
            return Err(SessionError::ConcurrentRequestRejected);
        }

        let text = text.trim();
        if text.is_empty() {
            debug!("begin_turn: empty request");
            return Err(SessionError::EmptyRequest);
        }

        let day_index = self.active_day;
        self.itinerary.check_index(day_index)?;
        let day = &self.itinerary.days()[day_index];

        let intent = self.classifier.classify(text);
        let prompt_text = self
            .prompts
            .render_edit(&EditPromptContext::new(&self.itinerary, day, text))?;

        let request = EditProposalRequest {
            destination: self.itinerary.destination.clone(),
            start_date: self.itinerary.start_date(),
            end_date: self.itinerary.end_date,
            preferences: self.itinerary.preferences.clone(),
            prompt_text,
            is_draft: true,
        };

        self.push_message(|id| ChatMessage::user(id, text));
        self.turn_count += 1;
        let turn = self.turn_count;
        self.state = SessionState::AwaitingResponse { turn };
        info!(session_id = %self.id, turn, day_index, %intent, "Turn started");

        Ok(TurnTicket {
            turn,
            day_index,
            intent,
            request,
        })
    }

    /// Finish the outstanding turn with the service's result
    ///
    /// A usable reply becomes an assistant message carrying the extracted
    /// patch, which may be empty. A failed call or an unusable reply becomes
    /// the fixed apology with no patch. Either way the session returns to
    /// `Idle` and the new message id is returned.
    pub fn complete_turn(
        &mut self,
        ticket: TurnTicket,
        result: Result<Value, GenerationError>,
    ) -> Result<MessageId, SessionError> {
        debug!(session_id = %self.id, turn = ticket.turn, "complete_turn: called");
        match self.state {
            SessionState::AwaitingResponse { turn } if turn == ticket.turn => {}
            _ => {
                warn!(session_id = %self.id, turn = ticket.turn, state = ?self.state, "complete_turn: ticket does not match outstanding turn");
                return Err(SessionError::NoOutstandingRequest(ticket.turn));
            }
        }

        let reply = result.and_then(|response| ProposalReply::from_response(&response));
        let id = match reply {
            Ok(reply) => {
                let extraction = extract(&reply.entry, &ticket.intent);
                info!(
                    session_id = %self.id,
                    turn = ticket.turn,
                    source = %extraction.source,
                    field_count = extraction.patch.len(),
                    "Proposal received"
                );
                let proposal = PatchProposal::new(ticket.day_index, extraction.into_patch());
                self.push_message(|id| ChatMessage::assistant(id, reply.message, Some(proposal)))
            }
            Err(e) => {
                warn!(session_id = %self.id, turn = ticket.turn, error = %e, "Edit request failed");
                self.push_message(|id| ChatMessage::assistant(id, APOLOGY, None))
            }
        };

        self.state = SessionState::Idle;
        Ok(id)
    }

    /// Give up on the outstanding turn without a reply
    ///
    /// The turn ends like a failed call: the apology is appended and the
    /// session returns to `Idle`.
    pub fn abandon_turn(&mut self, ticket: TurnTicket) -> Result<MessageId, SessionError> {
        debug!(session_id = %self.id, turn = ticket.turn, "abandon_turn: called");
        self.end_abandoned(ticket.turn)
            .ok_or(SessionError::NoOutstandingRequest(ticket.turn))
    }

    fn end_abandoned(&mut self, turn: u64) -> Option<MessageId> {
        if self.state != (SessionState::AwaitingResponse { turn }) {
            return None;
        }
        warn!(session_id = %self.id, turn, "Turn abandoned");
        let id = self.push_message(|id| ChatMessage::assistant(id, APOLOGY, None));
        self.state = SessionState::Idle;
        Some(id)
    }

    /// Run one full turn against `client`
    ///
    /// No retry happens here; a failed turn ends in the apology message and
    /// the user resubmits. Dropping the returned future abandons the turn.
    pub async fn submit(&mut self, client: &dyn GenerationClient, text: &str) -> Result<MessageId, SessionError> {
        debug!(session_id = %self.id, "submit: called");
        let ticket = self.begin_turn(text)?;
        let request = ticket.request().clone();
        let guard = TurnGuard {
            session: self,
            turn: Some(ticket.turn),
        };
        let result = client.propose(request).await;
        guard.complete(ticket, result)
    }

    /// Apply the patch carried by message `id` to the day it was proposed for
    pub fn apply(&mut self, id: MessageId) -> Result<ApplyOutcome, SessionError> {
        debug!(session_id = %self.id, %id, "apply: called");
        let message = self
            .transcript
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(SessionError::UnknownMessage(id))?;
        let proposal = message.proposal_mut().ok_or(SessionError::NoPendingPatch(id))?;

        if proposal.is_applied() {
            debug!(%id, "apply: already applied");
            return Ok(ApplyOutcome::AlreadyApplied);
        }
        if proposal.patch().is_empty() {
            debug!(%id, "apply: empty patch");
            return Ok(ApplyOutcome::NothingToApply);
        }

        let day_index = proposal.day_index();
        apply_patch(&mut self.itinerary, day_index, proposal.patch())?;
        let fields = proposal.patch().fields().into_iter().map(|(path, _)| path).collect();
        proposal.mark_applied();

        info!(session_id = %self.id, %id, day_index, "Patch applied");
        Ok(ApplyOutcome::Applied { day_index, fields })
    }

    fn push_message(&mut self, build: impl FnOnce(MessageId) -> ChatMessage) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id = id.next();
        self.transcript.push(build(id));
        id
    }
}
