//! Resolution workflow service - core business logic
//!
//! Drives the check → route → suggest decision process as an explicit state
//! machine and owns the only side-effecting operation, booking. The service
//! is stateless between calls; any multi-turn memory belongs to the caller.
//!
//! Failure semantics: request validation happens before any repository call
//! (`InvalidRequest`), repository reads surface as `RepositoryUnavailable`
//! without internal retries, and a cancellation signal is checked before
//! every repository boundary.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use slotwise_domain::{
    AlternativeSlot, AvailabilityResult, BookingResult, CalendarEvent, ResolutionDecision, Result,
    SchedulerConfig, SlotRequest, SlotwiseError, TimeInterval,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::availability;
use super::ports::EventRepository;
use super::slots::{self, SlotSearchOptions};
use crate::time::{day_bounds, envelope, resolve_relative, Clock, SystemClock};

/// Typed states of one resolution invocation.
///
/// `Start` is the validated entry (no variant needed: validation happens
/// before the machine runs) and `Done` carries the terminal decision.
#[derive(Debug)]
enum WorkflowState {
    /// Fetch the day-widened window and run the availability checker.
    Checking { target: TimeInterval },
    /// The target is busy; search the horizon for alternatives.
    Suggesting { target: TimeInterval },
    /// Terminal state with the decision to return.
    Done(ResolutionDecision),
}

/// Availability-resolution service
///
/// `check_slot` and `find_alternatives` are read-only; `resolve` composes
/// them into the Start → Checking → {Confirming | Suggesting} → Done
/// machine; `book` is the sole write path and re-validates availability
/// immediately before insertion.
pub struct SchedulingService {
    repository: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    cancellation: CancellationToken,
    /// Serializes check-then-insert against this service's calendar.
    booking_lock: Mutex<()>,
}

impl SchedulingService {
    /// Create a new scheduling service for one calendar.
    pub fn new(repository: Arc<dyn EventRepository>, config: SchedulerConfig) -> Self {
        Self {
            repository,
            clock: Arc::new(SystemClock),
            config,
            cancellation: CancellationToken::new(),
            booking_lock: Mutex::new(()),
        }
    }

    /// Substitute the time source (tests use a mock clock).
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a cancellation token checked before each repository call.
    #[must_use]
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Check whether a concrete interval is free.
    ///
    /// The fetch window is widened to the local day boundary so callers get
    /// consistent context for follow-up questions.
    #[instrument(skip(self))]
    pub async fn check_slot(&self, interval: &TimeInterval) -> Result<AvailabilityResult> {
        let window = self.day_widened_window(interval)?;
        let events = self.fetch_events(&window).await?;
        Ok(availability::check(interval, &events))
    }

    /// Find free slots near the requested one, nearest first.
    #[instrument(skip(self))]
    pub async fn find_alternatives(&self, request: &SlotRequest) -> Result<Vec<AlternativeSlot>> {
        let duration = request.validate()?;
        let window = TimeInterval::new(request.earliest, request.latest)?;
        slots::ensure_bounded(&window, self.max_horizon())?;

        let events = self.fetch_events(&window).await?;
        let target = self.target_from(request, duration, &events)?;

        slots::find_alternatives(
            &target,
            duration,
            &window,
            &events,
            self.config.search.max_suggestions,
            &self.search_options(),
        )
    }

    /// Run the full resolution workflow for one request.
    ///
    /// Emits `Confirmed` when the target slot is free, `Suggested` with
    /// ranked alternatives when it is busy, and `NoneFound` when no free
    /// slot of the requested duration exists within the (possibly widened)
    /// horizon.
    #[instrument(skip(self))]
    pub async fn resolve(&self, request: &SlotRequest) -> Result<ResolutionDecision> {
        // Start: reject malformed requests before any repository call.
        let duration = request.validate()?;
        let window = TimeInterval::new(request.earliest, request.latest)?;
        slots::ensure_bounded(&window, self.max_horizon())?;

        let target = self.resolve_target(request, duration, &window).await?;

        let mut state = WorkflowState::Checking { target };
        loop {
            state = match state {
                WorkflowState::Checking { target } => match self.check_slot(&target).await? {
                    AvailabilityResult::Available { interval } => {
                        debug!(start = %interval.start, "slot is free, confirming");
                        WorkflowState::Done(ResolutionDecision::Confirmed { interval })
                    }
                    AvailabilityResult::Busy { conflicting } => {
                        debug!(conflicts = conflicting.len(), "slot is busy, suggesting");
                        WorkflowState::Suggesting { target }
                    }
                },
                WorkflowState::Suggesting { target } => {
                    let alternatives = self.suggest(&target, duration, &window).await?;
                    if alternatives.is_empty() {
                        WorkflowState::Done(ResolutionDecision::NoneFound)
                    } else {
                        WorkflowState::Done(ResolutionDecision::Suggested { alternatives })
                    }
                }
                WorkflowState::Done(decision) => return Ok(decision),
            };
        }
    }

    /// Book a slot, re-validating availability immediately before insertion.
    ///
    /// Closes the time-of-check/time-of-use gap against concurrent callers
    /// of this service; a lost race against an external writer still
    /// surfaces as `Conflict` on the next resolution. Errors raised before
    /// the insert mean nothing was written and the whole call may be
    /// retried; an insert failure is ambiguous and callers must re-check
    /// rather than blind-retry.
    #[instrument(skip(self))]
    pub async fn book(&self, interval: &TimeInterval, title: &str) -> Result<BookingResult> {
        let _guard = self.booking_lock.lock().await;

        match self.check_slot(interval).await? {
            AvailabilityResult::Busy { conflicting } => {
                warn!(conflicts = conflicting.len(), "booking aborted, slot no longer free");
                return Err(SlotwiseError::Conflict(format!(
                    "slot is no longer free ({} conflicting event(s))",
                    conflicting.len()
                )));
            }
            AvailabilityResult::Available { .. } => {}
        }

        self.ensure_not_cancelled("insert_event")?;
        let event_id = self
            .with_timeout("insert_event", self.repository.insert_event(*interval, title))
            .await?;

        debug!(%event_id, start = %interval.start, "slot booked");
        Ok(BookingResult { event_id, interval: *interval })
    }

    /// List the next events from "now" within the configured lookahead.
    #[instrument(skip(self))]
    pub async fn upcoming_events(&self, max_results: usize) -> Result<Vec<CalendarEvent>> {
        let now = self.clock.now_utc();
        let window = TimeInterval::new(
            now,
            now + Duration::hours(self.config.repository.upcoming_lookahead_hours),
        )?;

        let mut events = self.fetch_events(&window).await?;
        events.sort_by(|a, b| {
            a.interval.start.cmp(&b.interval.start).then_with(|| a.id.cmp(&b.id))
        });
        events.truncate(max_results);
        Ok(events)
    }

    /// Resolve the concrete target interval, looking up the anchor event
    /// when the request is relative.
    async fn resolve_target(
        &self,
        request: &SlotRequest,
        duration: Duration,
        window: &TimeInterval,
    ) -> Result<TimeInterval> {
        if request.anchor.is_none() {
            return TimeInterval::with_duration(request.earliest, duration);
        }
        let events = self.fetch_events(window).await?;
        self.target_from(request, duration, &events)
    }

    /// Same as [`Self::resolve_target`] but against already-fetched events.
    fn target_from(
        &self,
        request: &SlotRequest,
        duration: Duration,
        events: &[CalendarEvent],
    ) -> Result<TimeInterval> {
        match &request.anchor {
            None => TimeInterval::with_duration(request.earliest, duration),
            Some(anchor) => {
                let offset = Duration::try_seconds(anchor.offset_seconds).ok_or_else(|| {
                    SlotwiseError::InvalidRequest(format!(
                        "anchor offset of {}s is out of range",
                        anchor.offset_seconds
                    ))
                })?;
                let anchor_event = events.iter().find(|e| e.id == anchor.event_id);
                resolve_relative(anchor_event, anchor.mode, offset, duration)
            }
        }
    }

    /// Search the default horizon around the target, widening once to the
    /// extended horizon when nothing fits.
    async fn suggest(
        &self,
        target: &TimeInterval,
        duration: Duration,
        caller_window: &TimeInterval,
    ) -> Result<Vec<AlternativeSlot>> {
        let options = self.search_options();
        let max = self.config.search.max_suggestions;

        let primary =
            self.clamped_horizon(target, self.config.search.horizon_hours, caller_window);
        let events = self.fetch_events(&primary).await?;
        let found =
            slots::find_alternatives(target, duration, &primary, &events, max, &options)?;
        if !found.is_empty() {
            return Ok(found);
        }

        let extended = self.clamped_horizon(
            target,
            self.config.search.extended_horizon_hours,
            caller_window,
        );
        if extended == primary {
            return Ok(found);
        }

        debug!("no candidates in the default horizon, widening search");
        let events = self.fetch_events(&extended).await?;
        slots::find_alternatives(target, duration, &extended, &events, max, &options)
    }

    /// Horizon of ±`hours` around the target, clamped to the caller's
    /// `[earliest, latest]` window. Falls back to the caller window when
    /// clamping leaves nothing.
    fn clamped_horizon(
        &self,
        target: &TimeInterval,
        hours: i64,
        caller_window: &TimeInterval,
    ) -> TimeInterval {
        let span = Duration::hours(hours);
        let start = target
            .start
            .checked_sub_signed(span)
            .map_or(caller_window.start, |s| s.max(caller_window.start));
        let end = target
            .end
            .checked_add_signed(span)
            .map_or(caller_window.end, |e| e.min(caller_window.end));
        TimeInterval::new(start, end).unwrap_or(*caller_window)
    }

    async fn fetch_events(&self, window: &TimeInterval) -> Result<Vec<CalendarEvent>> {
        self.ensure_not_cancelled("list_events")?;
        debug!(start = %window.start, end = %window.end, "fetching events");
        self.with_timeout("list_events", self.repository.list_events(window.start, window.end))
            .await
    }

    /// Wrap a repository call in the configured timeout so no operation
    /// blocks indefinitely.
    async fn with_timeout<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let timeout = StdDuration::from_secs(self.config.repository.call_timeout_secs);
        match tokio::time::timeout(timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SlotwiseError::RepositoryUnavailable(format!(
                "{operation} timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    fn ensure_not_cancelled(&self, operation: &str) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(SlotwiseError::Cancelled(format!("cancelled before {operation}")));
        }
        Ok(())
    }

    fn day_widened_window(&self, interval: &TimeInterval) -> Result<TimeInterval> {
        let day = day_bounds(interval.start, self.config.timezone)?;
        envelope(&day, interval)
    }

    fn search_options(&self) -> SlotSearchOptions {
        SlotSearchOptions::from_config(&self.config.search, self.config.timezone)
    }

    fn max_horizon(&self) -> Duration {
        Duration::hours(self.config.search.max_horizon_hours)
    }
}
