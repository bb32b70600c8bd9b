// SPDX-License-Identifier: MIT

mod cls_u32;
mod fw;
mod police;

pub use self::cls_u32::{
    TcFilterU32, TcFilterU32Option, TcU32Key, TcU32Mark, TcU32Pcnt,
    TcU32Selector,
};
pub use self::fw::{TcFilterFw, TcFilterFwOption};
pub use self::police::{TcPolice, TcPoliceOption};
