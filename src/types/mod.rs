//! Value types for wire attributes.

mod dimmer;
mod mireds;
mod percent;
mod power_source;
mod switch;
mod timestamp;
mod transition;

pub use dimmer::Dimmer;
pub use mireds::Mireds;
pub use percent::Percent;
pub use power_source::PowerSource;
pub use switch::{OnOff, YesNo};
pub use timestamp::Timestamp;
pub use transition::Transition;
