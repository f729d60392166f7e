//! Registry-wide properties of the reference system.

use std::collections::HashMap;

use clts_system::{FeatureSet, Sound, SoundType, TranscriptionSystem, bipa};

fn system() -> TranscriptionSystem {
    // Parser and loader trace output shows up with `--nocapture`.
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    bipa::bipa().unwrap_or_else(|e| panic!("reference system does not load: {e}"))
}

/// Inputs that exercise generation, compounding and failure.
const SAMPLES: &[&str] = &[
    "a", "\u{00E4}", "\u{02C8}a", "a\u{02D0}", "a\u{0303}\u{0301}", "t\u{02B0}", "d\u{02B1}\u{02B7}",
    "\u{207F}d", "\u{1D50}b", "k\u{02B7}\u{02B0}", "t\u{02BC}\u{02D0}", "ts\u{02B0}", "\u{02A6}\u{02B7}",
    "ao", "\u{02C8}ai", "tk", "nd", "pf\u{02B0}", "\u{01C3}x", "\u{02E5}\u{02E9}", "\u{2075}",
    "_", "#", "*", "", "/", "b/p", "g", "\u{03B5}", "AA\u{00C0}\u{00EA}", "lka", "\u{025A}\u{02D0}",
];

#[test]
fn canonical_feature_sets_are_unique() {
    let ts = system();
    let mut seen: HashMap<FeatureSet, &str> = HashMap::new();
    for sound in ts.sounds().iter().filter(|s| !s.is_alias()) {
        let features = sound.featureset().expect("registered sounds have features");
        if let Some(previous) = seen.insert(features, sound.grapheme()) {
            panic!("{previous:?} and {:?} share a feature set", sound.grapheme());
        }
    }
}

#[test]
fn aliases_spell_like_their_canonical_sound() {
    let ts = system();
    let mut aliases = 0;
    for alias in ts.sounds().iter().filter(|s| s.is_alias()) {
        aliases += 1;
        let features = alias.featureset().expect("aliases have features");
        let canonical = ts
            .canonical_sound(&features)
            .unwrap_or_else(|| panic!("{:?} is an orphaned alias", alias.grapheme()));
        assert!(!canonical.is_alias());
        assert_eq!(ts.canonical(alias), ts.canonical(canonical), "{:?}", alias.grapheme());
        assert_ne!(ts.canonical(alias), alias.grapheme());
    }
    assert!(aliases > 0);
}

#[test]
fn canonical_spellings_round_trip() {
    let ts = system();
    for sound in ts.sounds() {
        let spelled = ts.canonical(sound);
        let parsed = ts.resolve(&spelled);
        assert_eq!(parsed.featureset(), sound.featureset(), "{spelled:?}");
        assert_eq!(parsed, *sound, "{spelled:?}");
    }
}

#[test]
fn registry_names_parse_back() {
    let ts = system();
    for sound in ts.sounds().iter().filter(|s| !s.is_alias()) {
        let Some(name) = sound.name() else { continue };
        if sound.sound_type() == SoundType::Marker {
            let by_name = ts.from_name(&format!("{name} marker")).expect("marker name");
            assert_eq!(by_name.grapheme(), sound.grapheme());
            continue;
        }
        let by_name = ts.from_name(&name).unwrap_or_else(|e| panic!("{name:?}: {e}"));
        assert!(!by_name.is_generated(), "{name:?}");
        assert_eq!(by_name.grapheme(), sound.grapheme(), "{name:?}");
    }
}

#[test]
fn normalization_is_idempotent() {
    let ts = system();
    for &input in SAMPLES {
        let first = ts.resolve(input);
        let second = ts.resolve(&ts.canonical(&first));
        assert_eq!(first.featureset(), second.featureset(), "{input:?}");
        assert_eq!(first.sound_type(), second.sound_type(), "{input:?}");
    }
}

#[test]
fn generated_sounds_are_valid() {
    let ts = system();
    for &input in SAMPLES {
        let sound = ts.resolve(input);
        if sound.segment().is_some() {
            assert!(ts.is_valid(&sound), "{input:?}");
        }
    }
}

#[test]
fn similarity_bounds() {
    let ts = system();
    let sounds: Vec<Sound> = SAMPLES.iter().map(|s| ts.resolve(s)).collect();
    for a in &sounds {
        assert_eq!(a.similarity(a), 1.0, "{:?}", a.grapheme());
        for b in &sounds {
            let ab = a.similarity(b);
            assert!((0.0..=1.0).contains(&ab));
            assert_eq!(ab, b.similarity(a));
        }
    }

    let unknown_a = ts.resolve("*");
    let unknown_a2 = ts.resolve("*");
    let unknown_b = ts.resolve("**");
    assert_eq!(unknown_a.similarity(&unknown_a2), 1.0);
    assert_eq!(unknown_a.similarity(&unknown_b), 0.0);
}

#[test]
fn similar_sounds_score_higher() {
    let ts = system();
    let t = ts.resolve("t");
    let d = ts.resolve("d");
    let a = ts.resolve("a");
    assert!(t.similarity(&d) > t.similarity(&a));
    assert_eq!(t.similarity(&a), 0.0);
}

#[test]
fn enumeration_and_membership() {
    let ts = system();
    assert_eq!(ts.graphemes().count(), ts.len());
    for g in ts.graphemes() {
        assert!(ts.contains_grapheme(g));
    }
    assert!(ts.contains_grapheme("\u{00E7}"));
    assert!(!ts.contains_grapheme("tk"));
    assert!(ts.contains_sound(&ts.resolve("\u{02A6}")));
    assert!(!ts.contains_sound(&ts.resolve("t\u{02B0}\u{02D0}")));
    assert!(!ts.contains_sound(&ts.resolve("*")));
}

#[test]
fn resolve_is_shareable_across_threads() {
    let ts = system();
    std::thread::scope(|scope| {
        let handles: Vec<_> = SAMPLES
            .iter()
            .map(|&input| {
                let ts = &ts;
                scope.spawn(move || ts.canonical(&ts.resolve(input)))
            })
            .collect();
        for (handle, &input) in handles.into_iter().zip(SAMPLES) {
            let spelled = handle.join().expect("thread");
            assert_eq!(spelled, ts.canonical(&ts.resolve(input)));
        }
    });
}
