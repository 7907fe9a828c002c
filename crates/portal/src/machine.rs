// machine.rs - routing state machine
//
// Transitions are a pure function of the current view, the event and
// whether an applicant is pending. Side effects (history, storage) are
// applied by [`crate::Portal`].

use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The route changed: a link, back/forward, a reload or the gateway callback.
    Navigate(Route),
    /// The backend accepted the application form.
    ApplicationAccepted,
    /// The user explicitly went back to the landing page.
    ReturnHome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub view: Route,
    /// The requested route was refused by a guard and `view` was shown instead.
    pub redirected: bool,
    pub clear_pending: bool,
}

impl Transition {
    fn to(view: Route) -> Self {
        Transition {
            view,
            redirected: false,
            clear_pending: false,
        }
    }
}

pub fn transition(current: Route, event: Event, has_applicant: bool) -> Transition {
    match event {
        Event::Navigate(Route::Payment) if !has_applicant => Transition {
            view: Route::Application,
            redirected: true,
            clear_pending: false,
        },
        Event::Navigate(route) => Transition::to(route),
        Event::ApplicationAccepted if current == Route::Application && has_applicant => {
            Transition::to(Route::Payment)
        }
        // Accepted after the user already left the form: keep them where they are
        Event::ApplicationAccepted => Transition::to(current),
        Event::ReturnHome => Transition {
            view: Route::Home,
            redirected: false,
            clear_pending: true,
        },
    }
}
