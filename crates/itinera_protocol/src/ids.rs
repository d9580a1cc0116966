//! Identifier newtypes.
//!
//! Every identifier the synchronizer passes around is a UUID wrapped in its
//! own type, so an event id can never be handed to an operation expecting a
//! day id. All of them serialize transparently as the underlying UUID string.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Identifies one itinerary (the aggregate root a room collaborates on).
    ItineraryId
);

id_newtype!(
    /// Identifies one day within an itinerary.
    DayId
);

id_newtype!(
    /// Identifies one event within a day.
    EventId
);

id_newtype!(
    /// Identifies one client connection for the lifetime of a join/leave pair.
    ConnectionId
);
