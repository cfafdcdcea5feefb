mod api_error;
mod connection;
mod credentials;
mod driver;
mod error;
mod models;
mod response;
mod transport;
mod transports;

pub use self::{
    api_error::*, connection::*, credentials::*, driver::*, error::*, models::*, response::*,
    transport::*, transports::*,
};
