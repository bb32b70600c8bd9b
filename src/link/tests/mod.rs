// SPDX-License-Identifier: MIT

mod af_spec;
mod link_info;
mod message;
