pub mod aircraft;
pub mod sbs;

pub use aircraft::{
    Aircraft, Patrol, PatrolEvent, ALTITUDE_CEILING_FT, ALTITUDE_FLOOR_FT, ARRIVAL_THRESHOLD_DEG,
    EXCURSION_LIMIT_DEG,
};
pub use sbs::{MessageKind, SbsError, SbsMessage, FIELD_COUNT};
