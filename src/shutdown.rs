use tokio::sync::watch;

/// Why a run was told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every expected worker reported completion.
    AllWorkersCompleted,
    /// The schedule ran out and no live worker was left working.
    ScheduleDrained,
    /// A signal or supervisory timeout ended the run early.
    Aborted,
}

impl StopReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StopReason::AllWorkersCompleted => "all-workers-completed",
            StopReason::ScheduleDrained => "schedule-drained",
            StopReason::Aborted => "aborted",
        }
    }
}

/// Run-wide stop broadcast.
///
/// Backed by a `watch` channel so a listener that subscribes after the stop
/// fired still observes it. Only the first [`StopSignal::trigger`] takes
/// effect.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: watch::Sender<Option<StopReason>>,
}

/// Receiving side of [`StopSignal`], held by every worker.
#[derive(Debug, Clone)]
pub struct StopListener {
    rx: watch::Receiver<Option<StopReason>>,
}

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    /// Fires the stop. Returns `true` only for the call that actually fired.
    pub fn trigger(&self, reason: StopReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    #[must_use]
    pub fn reason(&self) -> Option<StopReason> {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.reason().is_some()
    }

    #[must_use]
    pub fn listener(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopListener {
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Waits until the stop fires and returns its reason.
    ///
    /// Resolves to [`StopReason::Aborted`] if the signal was dropped without
    /// firing, so a parked worker never outlives its controller.
    pub async fn stopped(&mut self) -> StopReason {
        match self.rx.wait_for(Option::is_some).await {
            Ok(reason) => (*reason).unwrap_or(StopReason::Aborted),
            Err(_) => StopReason::Aborted,
        }
    }
}
