//! Shared seat bookkeeping for concurrent callers.
//!
//! A [`RideLedger`] serialises check-then-add on each ride behind its own
//! lock, so concurrent reservations can never overbook. Different rides do
//! not contend with one another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use log::{debug, info};

use crate::{EntryRequest, Passenger, PassengerId, Ride, RideId, SeatError};

type SharedRide = Arc<Mutex<Ride>>;

/// Registry of rides whose seats may be reserved from several threads.
///
/// # Examples
/// ```
/// use carpool_core::{Coordinate, Passenger, Ride, RideLedger};
///
/// let ledger = RideLedger::default();
/// ledger.register(Ride::new(1, Coordinate::new(0.0, 0.0), Coordinate::new(0.1, 0.1), 2));
///
/// assert_eq!(ledger.reserve_seat(1, Passenger::new(5, "Ana"))?, 1);
/// # Ok::<(), carpool_core::SeatError>(())
/// ```
#[derive(Debug, Default)]
pub struct RideLedger {
    rides: RwLock<HashMap<RideId, SharedRide>>,
}

// `Ride` mutations either complete or leave the ride untouched, so a lock
// poisoned by a panicking holder still guards consistent data.
fn recover<T>(guard: Result<T, PoisonError<T>>) -> T {
    guard.unwrap_or_else(PoisonError::into_inner)
}

impl RideLedger {
    /// Add or replace a ride, returning the ride it replaced.
    pub fn register(&self, ride: Ride) -> Option<Ride> {
        let id = ride.id;
        let previous = recover(self.rides.write()).insert(id, Arc::new(Mutex::new(ride)));
        debug!("ride {id} registered");
        previous.map(|shared| recover(shared.lock()).clone())
    }

    /// Number of registered rides.
    pub fn len(&self) -> usize {
        recover(self.rides.read()).len()
    }

    /// Whether no rides are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the ride as it stands now.
    pub fn snapshot(&self, ride_id: RideId) -> Option<Ride> {
        self.shared(ride_id)
            .ok()
            .map(|shared| recover(shared.lock()).clone())
    }

    /// Board `passenger` on the ride, returning the seats left afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::UnknownRide`] when the ride is not registered
    /// and [`SeatError::NoSeatsAvailable`] when it is full.
    pub fn reserve_seat(&self, ride_id: RideId, passenger: Passenger) -> Result<usize, SeatError> {
        let shared = self.shared(ride_id)?;
        let mut ride = lock(&shared);
        let passenger_id = passenger.id;
        ride.add_passenger(passenger)?;
        let remaining = ride.available_seats();
        info!("ride {ride_id}: seat reserved for passenger {passenger_id}, {remaining} left");
        Ok(remaining)
    }

    /// Remove a passenger and their entry request from the ride.
    ///
    /// # Errors
    ///
    /// Returns [`SeatError::UnknownRide`] for an unregistered ride, or the
    /// error from [`Ride::remove_passenger`].
    pub fn release_seat(
        &self,
        ride_id: RideId,
        passenger_id: PassengerId,
    ) -> Result<(Passenger, EntryRequest), SeatError> {
        let shared = self.shared(ride_id)?;
        let released = lock(&shared).remove_passenger(passenger_id)?;
        info!("ride {ride_id}: seat released by passenger {passenger_id}");
        Ok(released)
    }

    fn shared(&self, ride_id: RideId) -> Result<SharedRide, SeatError> {
        recover(self.rides.read())
            .get(&ride_id)
            .cloned()
            .ok_or(SeatError::UnknownRide { ride_id })
    }
}

fn lock(shared: &SharedRide) -> MutexGuard<'_, Ride> {
    recover(shared.lock())
}
