// SPDX-License-Identifier: MIT

mod attribute;
mod header;
mod message;
mod options;
mod stats;
mod xstats;

pub mod psched;
pub mod rtab;

mod filters;
mod qdiscs;

#[cfg(test)]
mod tests;

pub use self::attribute::TcAttribute;
pub use self::filters::{
    TcFilterFw, TcFilterFwOption, TcFilterU32, TcFilterU32Option, TcPolice,
    TcPoliceOption, TcU32Key, TcU32Mark, TcU32Pcnt, TcU32Selector,
};
pub use self::header::{TcHeader, TcMessageBuffer};
pub use self::message::TcMessage;
pub use self::options::TcOptions;
pub use self::qdiscs::{
    TcHtbGlob, TcHtbOpt, TcHtbXstats, TcQdiscHtb, TcQdiscHtbOption,
    TcQdiscIngress, TcQdiscPfifoFast, TcQdiscSfq, TcQdiscSfqV0, TcQdiscSfqV1,
    TcQdiscTbf, TcQdiscTbfOption, TcTbfQopt,
};
pub use self::stats::{
    TcStats, TcStats2, TcStatsBasic, TcStatsQueue, TcStatsRateEst,
};
pub use self::xstats::TcXstats;
