// route.rs - views addressable by the URL fragment

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Application,
    Payment,
    Admin,
    PaymentSuccess,
    PaymentFailure,
}

impl Route {
    /// Unknown fragments fall back to the landing page.
    pub fn from_fragment(fragment: &str) -> Self {
        match fragment.trim().trim_start_matches('#') {
            "application" => Route::Application,
            "payment" => Route::Payment,
            "admin" => Route::Admin,
            "payment-success" => Route::PaymentSuccess,
            "payment-failure" => Route::PaymentFailure,
            _ => Route::Home,
        }
    }

    pub fn fragment(&self) -> &'static str {
        match self {
            Route::Home => "",
            Route::Application => "application",
            Route::Payment => "payment",
            Route::Admin => "admin",
            Route::PaymentSuccess => "payment-success",
            Route::PaymentFailure => "payment-failure",
        }
    }

    /// Notification views the gateway sends the browser back to.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Route::PaymentSuccess | Route::PaymentFailure)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_parse_to_routes() {
        assert_eq!(Route::from_fragment("#payment"), Route::Payment);
        assert_eq!(Route::from_fragment("application"), Route::Application);
        assert_eq!(Route::from_fragment("#payment-success"), Route::PaymentSuccess);
        assert_eq!(Route::from_fragment(""), Route::Home);
        assert_eq!(Route::from_fragment("#home"), Route::Home);
        assert_eq!(Route::from_fragment("#nowhere"), Route::Home);
    }

    #[test]
    fn every_route_survives_its_own_fragment() {
        for route in [
            Route::Home,
            Route::Application,
            Route::Payment,
            Route::Admin,
            Route::PaymentSuccess,
            Route::PaymentFailure,
        ] {
            assert_eq!(Route::from_fragment(route.fragment()), route);
        }
    }
}
