use crate::domain::models::Route;

/// Route history for the window. Always holds at least one entry.
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
        }
    }

    pub fn current(&self) -> &Route {
        // history is never empty
        &self.history[self.history.len() - 1]
    }

    pub fn push(&mut self, route: Route) {
        log::debug!("Navigating to {:?}", route);
        self.history.push(route);
    }

    /// Moves `steps` entries back, stopping at the first entry.
    pub fn back(&mut self, steps: usize) -> &Route {
        let keep = self.history.len().saturating_sub(steps).max(1);
        self.history.truncate(keep);
        self.current()
    }

    /// Drops all history and starts over at `route`.
    pub fn replace_all(&mut self, route: Route) {
        self.history.clear();
        self.history.push(route);
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::trailer_service::BACK_STEPS;

    fn player(id: &str) -> Route {
        Route::Player { id: id.to_string() }
    }

    #[test]
    fn player_back_arrow_skips_two_entries() {
        let mut nav = Navigator::new(Route::Home);
        nav.push(player("550"));
        nav.push(player("603"));

        assert_eq!(nav.back(BACK_STEPS), &Route::Home);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn back_never_empties_history() {
        let mut nav = Navigator::new(Route::Home);
        nav.push(player("550"));

        assert_eq!(nav.back(BACK_STEPS), &Route::Home);
        assert_eq!(nav.back(5), &Route::Home);
    }

    #[test]
    fn replace_all_resets_history() {
        let mut nav = Navigator::new(Route::Login);
        nav.push(Route::Home);
        nav.push(player("1"));

        nav.replace_all(Route::Login);
        assert_eq!(nav.current(), &Route::Login);
        assert_eq!(nav.depth(), 1);
    }
}
