// portal.rs - view controller
//
// Applies [`transition`] results to the history and the pending store.
// Every route change, including a fresh start, goes through the same
// guard so a reload on `#payment` behaves like clicking through.

use crate::adapter::ApplicantRecord;
use crate::client::PortalClient;
use crate::error::{PortalError, Result};
use crate::history::History;
use crate::machine::{transition, Event};
use crate::pending::{PendingApplicant, PendingStore};
use crate::route::Route;
use tracing::{debug, info, warn};
use url::Url;

pub struct Portal<S, H> {
    store: S,
    history: H,
    view: Route,
    applicant: Option<PendingApplicant>,
}

impl<S: PendingStore, H: History> Portal<S, H> {
    /// Starts the portal: recovers any pending applicant first, then
    /// resolves the route the history is on.
    pub fn boot(store: S, history: H) -> Self {
        let applicant = match store.load() {
            Ok(applicant) => applicant,
            Err(e) => {
                warn!("Discarding unreadable pending applicant: {}", e);
                None
            }
        };
        if let Some(applicant) = &applicant {
            info!("Recovered pending applicant {}", applicant.id);
        }

        let mut portal = Portal {
            store,
            history,
            view: Route::Home,
            applicant,
        };
        portal.sync_with_history();
        portal
    }

    /// Drops in-memory state and boots again from the same store and history.
    pub fn reload(self) -> Self {
        Self::boot(self.store, self.history)
    }

    pub fn view(&self) -> Route {
        self.view
    }

    pub fn applicant(&self) -> Option<&PendingApplicant> {
        self.applicant.as_ref()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply(&mut self, event: Event) -> crate::machine::Transition {
        let t = transition(self.view, event, self.applicant.is_some());
        if t.redirected {
            debug!("{:?} refused, showing {}", event, t.view);
        }
        self.view = t.view;
        t
    }

    // Re-resolves the entry the history already points at
    fn sync_with_history(&mut self) {
        let requested = self.history.current();
        let t = self.apply(Event::Navigate(requested));
        if t.view != requested {
            self.history.replace(t.view);
        }
    }

    pub fn navigate(&mut self, route: Route) -> Route {
        let t = self.apply(Event::Navigate(route));
        if t.redirected && self.history.current() == t.view {
            // Already on the redirect target
            return t.view;
        }
        self.history.push(route);
        if t.redirected {
            self.history.replace(t.view);
        }
        t.view
    }

    pub fn back(&mut self) -> Route {
        if self.history.back() {
            self.sync_with_history();
        }
        self.view
    }

    pub fn forward(&mut self) -> Route {
        if self.history.forward() {
            self.sync_with_history();
        }
        self.view
    }

    /// Records the accepted applicant. The record is durable before the
    /// view changes.
    pub fn application_accepted(&mut self, record: ApplicantRecord) -> Result<Route> {
        let applicant = PendingApplicant::from(record);
        self.store.persist(&applicant)?;
        info!("Applicant {} pending payment", applicant.id);
        self.applicant = Some(applicant);

        let t = self.apply(Event::ApplicationAccepted);
        self.history.push(t.view);
        Ok(t.view)
    }

    /// Fetches the checkout URL for the pending applicant. The caller
    /// leaves the portal for that URL, so the record is flushed again first.
    pub async fn begin_payment(&mut self, client: &PortalClient) -> Result<Url> {
        let applicant = match (&self.view, &self.applicant) {
            (Route::Payment, Some(applicant)) => applicant.clone(),
            _ => return Err(PortalError::NoPendingApplicant),
        };
        let url = client.create_payment(applicant.id).await?;
        self.store.persist(&applicant)?;
        info!("Sending applicant {} to checkout", applicant.id);
        Ok(url)
    }

    /// The only path that forgets the pending applicant.
    pub fn return_home(&mut self) -> Result<Route> {
        // Nothing changes unless the record is really gone
        let t = transition(self.view, Event::ReturnHome, self.applicant.is_some());
        if t.clear_pending {
            self.store.clear()?;
            self.applicant = None;
        }
        self.view = t.view;
        self.history.push(t.view);
        Ok(t.view)
    }
}
