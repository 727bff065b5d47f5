#![allow(clippy::needless_pass_by_value)]

pub mod list;
pub mod run;
