use rand::seq::SliceRandom;
use rand::Rng;

use crate::scenarios::store::Scenario;

/// Colour for a new scenario: the first palette entry no held scenario uses.
///
/// Once every entry is taken the colour is drawn uniformly at random from
/// the whole palette, so it may repeat a colour already on screen. The
/// colour is chosen before the oldest scenario is evicted, so a full store
/// of ten always hits this path.
pub fn assign_color<R: Rng + ?Sized>(palette: &[String], existing: &[Scenario], rng: &mut R) -> String {
    palette
        .iter()
        .find(|color| !existing.iter().any(|s| &s.color == *color))
        .or_else(|| palette.choose(rng))
        .cloned()
        .unwrap_or_default()
}
