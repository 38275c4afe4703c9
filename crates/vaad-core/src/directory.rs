//! Apartment-number lookups over the active residents.

use std::collections::HashMap;

use vaad_domain::{apartment_key, Resident};

/// Outcome of resolving an apartment number to a resident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApartmentMatch<'a> {
    Missing,
    Unique(&'a Resident),
    /// More than one resident shares the apartment number. `first` is the
    /// earliest in reader order.
    Ambiguous {
        first: &'a Resident,
        candidates: usize,
    },
}

impl<'a> ApartmentMatch<'a> {
    /// First-match-wins resolution; callers decide whether to log ambiguity.
    pub fn first(&self) -> Option<&'a Resident> {
        match *self {
            ApartmentMatch::Missing => None,
            ApartmentMatch::Unique(resident) => Some(resident),
            ApartmentMatch::Ambiguous { first, .. } => Some(first),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ApartmentMatch::Ambiguous { .. })
    }
}

/// Index of residents by trimmed apartment number.
#[derive(Debug)]
pub struct ResidentDirectory<'a> {
    by_apartment: HashMap<&'a str, Vec<&'a Resident>>,
}

impl<'a> ResidentDirectory<'a> {
    pub fn new(residents: &'a [Resident]) -> Self {
        let mut by_apartment: HashMap<&'a str, Vec<&'a Resident>> = HashMap::new();
        for resident in residents {
            by_apartment
                .entry(resident.apartment_key())
                .or_default()
                .push(resident);
        }
        Self { by_apartment }
    }

    pub fn lookup(&self, apartment_number: &str) -> ApartmentMatch<'a> {
        match self.by_apartment.get(apartment_key(apartment_number)) {
            None => ApartmentMatch::Missing,
            Some(matches) => match matches.as_slice() {
                [] => ApartmentMatch::Missing,
                [only] => ApartmentMatch::Unique(*only),
                [first, ..] => ApartmentMatch::Ambiguous {
                    first: *first,
                    candidates: matches.len(),
                },
            },
        }
    }

    /// Apartment numbers held by more than one resident, sorted.
    pub fn shared_apartments(&self) -> Vec<&'a str> {
        let mut shared: Vec<&'a str> = self
            .by_apartment
            .iter()
            .filter(|(_, residents)| residents.len() > 1)
            .map(|(apartment, _)| *apartment)
            .collect();
        shared.sort_unstable();
        shared
    }
}
