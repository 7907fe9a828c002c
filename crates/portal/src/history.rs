// history.rs - navigable history of views

use crate::route::Route;

/// The browser history as the portal sees it.
pub trait History {
    fn current(&self) -> Route;
    fn push(&mut self, route: Route);
    fn replace(&mut self, route: Route);
    /// Returns false when there is nothing to go back to.
    fn back(&mut self) -> bool;
    fn forward(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<Route>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: Route) -> Self {
        MemoryHistory {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn entries(&self) -> &[Route] {
        &self.entries
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl History for MemoryHistory {
    fn current(&self) -> Route {
        self.entries[self.index]
    }

    fn push(&mut self, route: Route) {
        if self.current() == route {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(route);
        self.index += 1;
    }

    fn replace(&mut self, route: Route) {
        self.entries[self.index] = route;
    }

    fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}
