// SPDX-License-Identifier: MIT

mod filter_u32;
mod qdisc_htb;
mod qdisc_pfifo_fast;
mod qdisc_sfq;
mod qdisc_tbf;
