//! [`Recorder`] notifier.

use std::sync::{Arc, Mutex, PoisonError};

use common::operations::Notify;
use tracerr::Traced;

use super::{Error, Event, Notifier};

/// [`Notifier`] keeping delivered [`Event`]s in memory.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    /// Delivered [`Event`]s.
    events: Arc<Mutex<Vec<Event>>>,

    /// Indicator whether this [`Recorder`] rejects every [`Event`].
    failing: bool,
}

impl Recorder {
    /// Creates a new [`Recorder`] rejecting every [`Event`].
    #[must_use]
    pub fn failing() -> Self {
        Self {
            events: Arc::default(),
            failing: true,
        }
    }

    /// Returns all the delivered [`Event`]s.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier<Notify<Event>> for Recorder {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Notify(event): Notify<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.failing {
            return Err(tracerr::new!(Error::Undelivered(
                "recorder is failing".into(),
            )));
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
