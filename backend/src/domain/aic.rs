//! Roster of past international champion quartets.
//!
//! Groups on this roster are always reconciled with status
//! [`GroupStatus::Aic`](super::GroupStatus::Aic) and the roster's display
//! name, regardless of what the source record says.

/// `(bhs_id, display name)` for every champion quartet.
pub const AIC_ROSTER: &[(i32, &str)] = &[
    (503061, "Signature"),
    (500983, "After Hours"),
    (501972, "Main Street"),
    (501329, "Forefront"),
    (500922, "Instant Classic"),
    (304772, "Musical Island Boys"),
    (500000, "Masterpiece"),
    (501150, "Ringmasters"),
    (317293, "Old School"),
    (286100, "Storm Front"),
    (500035, "Crossroads"),
    (297201, "OC Times"),
    (299233, "Max Q"),
    (302244, "Vocal Spectrum"),
    (299608, "Realtime"),
    (6158, "Gotcha!"),
    (2496, "Power Play"),
    (276016, "Four Voices"),
    (5619, "Michigan Jake"),
    (6738, "Platinum"),
    (3525, "FRED"),
    (5721, "Revival"),
    (2079, "Yesteryear"),
    (2163, "Nightlife"),
    (4745, "Marquis"),
    (3040, "Joker's Wild"),
    (1259, "Gas House Gang"),
    (2850, "Keepsake"),
    (1623, "The Ritz"),
    (3165, "Acoustix"),
    (1686, "Second Edition"),
    (492, "Chiefs of Staff"),
    (1596, "Interstate Rivals"),
    (1654, "Rural Route 4"),
    (406, "The New Tradition"),
    (1411, "Rapscallions"),
    (1727, "Side Street Ramblers"),
    (545, "Classic Collection"),
    (490, "Chicago News"),
    (329, "Boston Common"),
    (4034, "Grandma's Boys"),
    (318, "Bluegrass Student Union"),
    (362, "Most Happy Fellows"),
    (1590, "Innsiders"),
    (1440, "Happiness Emporium"),
    (1427, "Regents"),
    (627, "Dealer's Choice"),
    (1288, "Golden Staters"),
    (1275, "Gentlemen's Agreement"),
    (709, "Oriole Four"),
    (711, "Mark IV"),
    (2047, "Western Continentals"),
    (1110, "Four Statesmen"),
    (713, "Auto Towners"),
    (715, "Four Renegades"),
    (1729, "Sidewinders"),
    (718, "Town and Country 4"),
    (719, "Gala Lads"),
    (1871, "The Suntones"),
    (722, "Evans Quartet"),
    (724, "Four Pitchikers"),
    (726, "Gaynotes"),
    (729, "Lads of Enchantment"),
    (731, "Confederates"),
    (732, "Four Hearsemen"),
    (736, "The Orphans"),
    (739, "Vikings"),
    (743, "Four Teens"),
    (746, "Schmitt Brothers"),
    (748, "Buffalo Bills"),
    (750, "Mid-States Four"),
    (753, "Pittsburghers"),
    (756, "Doctors of Harmony"),
    (759, "Garden State Quartet"),
    (761, "Misfits"),
    (764, "Harmony Halls"),
    (766, "Four Harmonizers"),
    (770, "Elastic Four"),
    (773, "Chord Busters"),
    (775, "Flat Foot Four"),
    (776, "Bartlsesville Barflies"),
];

/// Display name of the champion quartet with this external id.
///
/// # Examples
/// ```
/// use roster_backend::domain::aic_name;
///
/// assert_eq!(aic_name(1259), Some("Gas House Gang"));
/// assert_eq!(aic_name(1), None);
/// ```
pub fn aic_name(bhs_id: i32) -> Option<&'static str> {
    AIC_ROSTER
        .iter()
        .find(|(candidate, _)| *candidate == bhs_id)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn roster_ids_are_unique() {
        let ids: HashSet<i32> = AIC_ROSTER.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids.len(), AIC_ROSTER.len());
    }

    #[rstest]
    #[case(503061, "Signature")]
    #[case(6158, "Gotcha!")]
    #[case(776, "Bartlsesville Barflies")]
    fn resolves_roster_names(#[case] bhs_id: i32, #[case] expected: &str) {
        assert_eq!(aic_name(bhs_id), Some(expected));
    }
}
