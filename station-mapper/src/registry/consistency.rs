//! Cross-collection invariant check.

use crate::domain::DependentKind;

use super::error::ReferentialViolation;
use super::store::Registry;

impl Registry {
    /// Verify that stations and dependents agree with each other.
    ///
    /// Holds after every public operation: each dependent's station exists
    /// and lists it exactly once, each station lists only dependents that
    /// point back at it, and every station is on the map.
    pub fn check_consistency(&self) -> Result<(), ReferentialViolation> {
        for (key, station) in &self.stations {
            if *key != station.id {
                return Err(ReferentialViolation::MisfiledStation(station.id));
            }
            if !station.entity().is_placed() {
                return Err(ReferentialViolation::StationUnplaced(station.id));
            }
        }

        for kind in DependentKind::ALL {
            for (key, dependent) in self.dependents.of(kind) {
                if *key != dependent.id || dependent.kind() != kind {
                    return Err(ReferentialViolation::Misfiled(dependent.id));
                }
                let station = self.stations.get(&dependent.station).ok_or(
                    ReferentialViolation::DanglingStation {
                        dependent: dependent.id,
                        station: dependent.station,
                    },
                )?;
                let listed = station
                    .dependents(kind)
                    .iter()
                    .filter(|id| **id == dependent.id)
                    .count();
                match listed {
                    0 => {
                        return Err(ReferentialViolation::MissingFromStation {
                            dependent: dependent.id,
                            station: station.id,
                        });
                    }
                    1 => {}
                    _ => {
                        return Err(ReferentialViolation::DuplicateInStation {
                            station: station.id,
                            dependent: dependent.id,
                        });
                    }
                }
            }

            for station in self.stations.values() {
                for id in station.dependents(kind) {
                    let belongs = self
                        .dependents
                        .of(kind)
                        .get(id)
                        .is_some_and(|d| d.station == station.id);
                    if !belongs {
                        return Err(ReferentialViolation::ForeignInStation {
                            station: station.id,
                            dependent: *id,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
