use term_desk::geometry::{Position, Size};
use term_desk::window::{RegistryEvent, WindowId, WindowRegistry, WindowSpec};

fn spec(id: &str, x: f64) -> WindowSpec<u8> {
    WindowSpec::new(id, id, 0)
        .at(Position::new(x, 40.0))
        .sized(Size::new(400.0, 300.0))
}

fn open_all(ids: &[&str]) -> WindowRegistry<u8> {
    let mut registry = WindowRegistry::new();
    for (i, id) in ids.iter().enumerate() {
        registry.open(spec(id, 20.0 * i as f64));
    }
    registry
}

fn focused(registry: &WindowRegistry<u8>) -> Option<&str> {
    registry.focused_window_id().map(WindowId::as_str)
}

#[test]
fn exactly_one_window_is_focused_after_any_command() {
    let mut registry = open_all(&["a", "b", "c"]);
    registry.focus("a");
    registry.minimize("c");
    registry.maximize("b");
    registry.cycle_focus();
    registry.close("a");
    let flagged = registry.windows().iter().filter(|w| w.is_focused).count();
    assert_eq!(flagged, 1);
    assert!(registry.check_invariants().is_ok());
}

#[test]
fn z_indices_stay_unique_and_grow() {
    let mut registry = open_all(&["a", "b"]);
    let before = registry.highest_z_index();
    registry.focus("a");
    let a = registry.get("a").unwrap().z_index;
    assert!(a > before);
    assert_eq!(registry.highest_z_index(), a);
    assert_eq!(registry.stacking_order(), vec![WindowId::new("b"), WindowId::new("a")]);
}

#[test]
fn maximize_then_restore_round_trips_geometry() {
    let mut registry = open_all(&["a"]);
    registry.move_window("a", Position::new(64.0, 80.0));
    registry.resize("a", Size::new(320.0, 240.0));
    registry.maximize("a");
    registry.maximize("a");
    registry.restore("a");
    let window = registry.get("a").unwrap();
    assert_eq!(window.position, Position::new(64.0, 80.0));
    assert_eq!(window.size, Size::new(320.0, 240.0));
    assert!(window.previous_position.is_none() && window.previous_size.is_none());
}

#[test]
fn minimizing_the_focused_window_hands_focus_down() {
    let mut registry = open_all(&["a", "b", "c"]);
    registry.minimize("c");
    assert_eq!(focused(&registry), Some("b"));
    assert!(!registry.get("c").unwrap().is_focused);
    registry.focus("c");
    assert!(!registry.get("c").unwrap().is_minimized);
    assert_eq!(focused(&registry), Some("c"));
}

#[test]
fn closing_the_last_window_clears_focus() {
    let mut registry = open_all(&["a", "b"]);
    registry.close("b");
    assert_eq!(focused(&registry), Some("a"));
    registry.close("a");
    assert_eq!(focused(&registry), None);
    assert!(registry.is_empty());
}

#[test]
fn unknown_ids_change_nothing() {
    let mut registry = open_all(&["a"]);
    registry.take_events();
    assert!(!registry.focus("ghost"));
    assert!(!registry.close("ghost"));
    assert!(!registry.minimize("ghost"));
    assert!(!registry.toggle_maximize("ghost"));
    assert!(!registry.move_window("ghost", Position::ZERO));
    assert!(registry.take_events().is_empty());
    assert_eq!(focused(&registry), Some("a"));
}

#[test]
fn reopening_an_id_replaces_the_record() {
    let mut registry = open_all(&["a", "b"]);
    registry.take_events();
    registry.open(spec("a", 200.0));
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get("a").unwrap().position.x, 200.0);
    assert_eq!(
        registry.take_events(),
        vec![RegistryEvent::Opened {
            id: WindowId::new("a"),
            replaced: true
        }]
    );
}

/// Deterministic LCG so failures reproduce from the seed alone.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}

#[test]
fn random_command_sequences_keep_invariants() {
    const IDS: [&str; 5] = ["a", "b", "c", "d", "e"];
    for seed in [1_u64, 7, 42, 0xdec0, 9001] {
        let mut rng = Lcg(seed);
        let mut registry: WindowRegistry<u8> = WindowRegistry::new();
        let mut high_water = 0;
        for step in 0..2000 {
            let id = IDS[rng.below(IDS.len() as u32) as usize];
            let before: Vec<(WindowId, u64)> = registry
                .windows()
                .iter()
                .map(|w| (w.id.clone(), w.z_index))
                .collect();
            let op = rng.below(8);
            match op {
                0 => registry.open(spec(id, f64::from(rng.below(600)))),
                1 => {
                    registry.close(id);
                }
                2 => {
                    registry.focus(id);
                }
                3 => {
                    registry.minimize(id);
                }
                4 => {
                    registry.maximize(id);
                }
                5 => {
                    registry.restore(id);
                }
                6 => {
                    registry.toggle_maximize(id);
                }
                _ => {
                    registry.cycle_focus();
                }
            }
            registry.take_events();

            if let Err(violation) = registry.check_invariants() {
                panic!("seed {seed} step {step} op {op} on {id}: {violation:?}");
            }
            assert!(registry.highest_z_index() >= high_water);
            for window in registry.windows() {
                let old = before.iter().find(|(prior, _)| *prior == window.id).map(|(_, z)| *z);
                if old != Some(window.z_index) {
                    assert!(
                        window.z_index > high_water,
                        "seed {seed} step {step}: {} got z {} not above {high_water}",
                        window.id.as_str(),
                        window.z_index
                    );
                }
            }
            high_water = registry.highest_z_index();
        }
    }
}
