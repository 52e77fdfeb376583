/// Top-level view of the single-page experience.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Curtain/balloon intro.
    #[default]
    Opening,
    /// Card hub linking to the two features.
    Main,
    /// Tribute gallery with voting.
    Fighters,
    /// Greeting card generator.
    Generator,
}

/// Feature reachable from the hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Destination {
    Fighters,
    Generator,
}

/// Input to [`Page::transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavEvent {
    /// The intro animation finished.
    OpeningComplete,
    /// The platform asked for reduced motion; the intro is skipped.
    ReducedMotionDetected,
    /// A hub card was chosen.
    Open(Destination),
    /// The back button of a feature view.
    Back,
}

impl Page {
    /// Pure transition function. Events that make no sense for the current page leave it
    /// unchanged.
    pub fn transition(self, event: NavEvent) -> Page {
        match (self, event) {
            (Page::Opening, NavEvent::OpeningComplete | NavEvent::ReducedMotionDetected) => {
                Page::Main
            }
            (Page::Main, NavEvent::Open(Destination::Fighters)) => Page::Fighters,
            (Page::Main, NavEvent::Open(Destination::Generator)) => Page::Generator,
            (Page::Fighters | Page::Generator, NavEvent::Back) => Page::Main,
            (page, _) => page,
        }
    }

    /// Initial page given the platform's motion preference.
    pub fn initial(prefers_reduced_motion: bool) -> Page {
        if prefers_reduced_motion {
            Page::Main
        } else {
            Page::Opening
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/router.rs"]
mod tests;
