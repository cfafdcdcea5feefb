mod dry_run;
mod fake;
mod http;

pub use self::{dry_run::*, fake::*, http::*};
