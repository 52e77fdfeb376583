use super::*;

#[test]
fn eight_unique_templates() {
    let all = templates();
    assert_eq!(all.len(), 8);
    for (i, t) in all.iter().enumerate() {
        assert!(all[i + 1..].iter().all(|o| o.id != t.id), "duplicate {}", t.id);
        t.text_position.validate(t.id).unwrap();
    }
    assert_eq!(template_by_id("unity-circle").unwrap().name, "Unity Circle");
    assert!(template_by_id("independence-1").is_none());
}

#[test]
fn tricolor_css_gets_three_exact_stops() {
    let p = template_by_id("flag-wave").unwrap().palette();
    assert_eq!(
        p.stops,
        vec![
            (0.0, Color::SAFFRON),
            (0.5, Color::WHITE),
            (1.0, Color::GREEN)
        ]
    );
    assert_eq!(p.sample(0.5), Color::WHITE);
    assert_eq!(p.sample(-1.0), Color::SAFFRON);
    assert_eq!(p.sample(2.0), Color::GREEN);
}

#[test]
fn other_css_gets_first_to_last_gradient() {
    let p = template_by_id("independence-day").unwrap().palette();
    assert_eq!(p.stops, vec![(0.0, Color::SAFFRON), (1.0, Color::GREEN)]);

    let p = template_by_id("ashoka-chakra").unwrap().palette();
    assert_eq!(p.stops, vec![(0.0, Color::NAVY), (1.0, Color::SAFFRON)]);

    let p = template_by_id("modern-tricolor").unwrap().palette();
    assert_eq!(p.stops, vec![(0.0, Color::SAFFRON), (1.0, Color::GREEN)]);
}

#[test]
fn only_the_chakra_template_draws_the_wheel() {
    let with: Vec<_> = templates().iter().filter(|t| t.draws_chakra()).collect();
    assert_eq!(with.len(), 1);
    assert_eq!(with[0].id, "ashoka-chakra");
    assert_eq!(CHAKRA.spokes, 24);
}
