// SPDX-License-Identifier: MIT

mod htb;
mod ingress;
mod pfifo_fast;
mod sfq;
mod tbf;

pub use self::htb::{
    TcHtbGlob, TcHtbOpt, TcHtbXstats, TcQdiscHtb, TcQdiscHtbOption,
};
pub use self::ingress::TcQdiscIngress;
pub use self::pfifo_fast::TcQdiscPfifoFast;
pub use self::sfq::{TcQdiscSfq, TcQdiscSfqV0, TcQdiscSfqV1};
pub use self::tbf::{TcQdiscTbf, TcQdiscTbfOption, TcTbfQopt};

pub(crate) use self::htb::TcHtbXstatsBuffer;
pub(crate) use self::pfifo_fast::TcPrioQoptBuffer;
