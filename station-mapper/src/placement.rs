//! Offset placement of dependent markers around their station.
//!
//! Dependents are laid out on rings centred on the station: eight slots per
//! ring at 45° spacing, each further group of eight moving one ring outward.
//! The slot depends only on how many siblings are visible at the moment of
//! placement, so hiding and re-showing dependents in a different order can
//! move a given dependent to a different slot.

use crate::domain::{Coordinates, DependentKind};

/// Radius of the innermost ring, in degrees.
pub const BASE_RADIUS: f64 = 0.0005;

/// Number of slots on each ring.
pub const RING_SLOTS: usize = 8;

/// Angular spacing between consecutive slots, in degrees.
pub const SLOT_ANGLE_DEG: usize = 45;

/// Latitude/longitude offset for the slot taken when `visible` siblings are
/// already on the map.
pub fn slot_offset(visible: usize) -> (f64, f64) {
    let ring = visible / RING_SLOTS;
    let radius = BASE_RADIUS * (1 + ring) as f64;
    let angle = ((visible * SLOT_ANGLE_DEG) % 360) as f64;
    let angle = angle.to_radians();
    (radius * angle.cos(), radius * angle.sin())
}

/// Position for a dependent of a station at `station`, given the number of
/// its siblings already shown.
pub fn dependent_position(station: Coordinates, visible: usize) -> Coordinates {
    let (d_lat, d_lon) = slot_offset(visible);
    station.offset(d_lat, d_lon)
}

/// Marker label for a dependent: the kind tag, then the name on its own line.
pub fn dependent_label(kind: DependentKind, name: &str) -> String {
    format!("{}:\n{}", kind.tag(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn station() -> Coordinates {
        Coordinates::new(52.0, 21.0)
    }

    fn assert_close(actual: Coordinates, lat: f64, lon: f64) {
        assert!(
            (actual.latitude - lat).abs() < EPS && (actual.longitude - lon).abs() < EPS,
            "expected ({lat}, {lon}), got {actual:?}"
        );
    }

    #[test]
    fn first_dependent_north_of_station() {
        assert_close(dependent_position(station(), 0), 52.0005, 21.0);
    }

    #[test]
    fn fifth_dependent_opposite_side() {
        assert_close(dependent_position(station(), 4), 51.9995, 21.0);
    }

    #[test]
    fn third_dependent_at_ninety_degrees() {
        assert_close(dependent_position(station(), 2), 52.0, 21.0005);
    }

    #[test]
    fn ninth_dependent_starts_second_ring() {
        assert_close(dependent_position(station(), 8), 52.0010, 21.0);
    }

    #[test]
    fn seventeenth_dependent_starts_third_ring() {
        assert_close(dependent_position(station(), 16), 52.0015, 21.0);
    }

    #[test]
    fn first_ring_slots_are_distinct() {
        let slots: Vec<_> = (0..RING_SLOTS).map(slot_offset).collect();
        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                let d = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
                assert!(d > BASE_RADIUS / 2.0);
            }
        }
    }

    #[test]
    fn labels() {
        assert_eq!(
            dependent_label(DependentKind::Employee, "Anna Nowak"),
            "Employee:\nAnna Nowak"
        );
        assert_eq!(
            dependent_label(DependentKind::Carrier, "Koleje Mazowieckie"),
            "Carrier:\nKoleje Mazowieckie"
        );
    }
}
