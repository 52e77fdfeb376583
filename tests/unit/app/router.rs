use super::*;

#[test]
fn intro_leads_to_hub() {
    assert_eq!(Page::Opening.transition(NavEvent::OpeningComplete), Page::Main);
    assert_eq!(
        Page::Opening.transition(NavEvent::ReducedMotionDetected),
        Page::Main
    );
    assert_eq!(Page::initial(true), Page::Main);
    assert_eq!(Page::initial(false), Page::Opening);
}

#[test]
fn hub_opens_features_and_back_returns() {
    let p = Page::Main.transition(NavEvent::Open(Destination::Fighters));
    assert_eq!(p, Page::Fighters);
    assert_eq!(p.transition(NavEvent::Back), Page::Main);

    let p = Page::Main.transition(NavEvent::Open(Destination::Generator));
    assert_eq!(p, Page::Generator);
    assert_eq!(p.transition(NavEvent::Back), Page::Main);
}

#[test]
fn irrelevant_events_are_ignored() {
    assert_eq!(Page::Opening.transition(NavEvent::Back), Page::Opening);
    assert_eq!(
        Page::Opening.transition(NavEvent::Open(Destination::Generator)),
        Page::Opening
    );
    assert_eq!(Page::Main.transition(NavEvent::Back), Page::Main);
    assert_eq!(
        Page::Fighters.transition(NavEvent::Open(Destination::Generator)),
        Page::Fighters
    );
    assert_eq!(Page::Generator.transition(NavEvent::OpeningComplete), Page::Generator);
}
